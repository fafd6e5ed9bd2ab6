//! Terminal-level and session-toggle commands: `/clear`, `/exit`,
//! `/think`, `/no_think`.

use std::io;

use futures_util::future::LocalBoxFuture;

use crate::context::SessionContext;
use crate::input::Flags;
use crate::registry::Command;
use crate::sink::Io;

pub struct Clear;

impl Command for Clear {
    fn name(&self) -> &str {
        "clear"
    }

    fn aliases(&self) -> &[&str] {
        &["cls"]
    }

    fn summary(&self) -> &str {
        "Clear the terminal"
    }

    fn usage(&self) -> Option<&str> {
        Some("/clear")
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        _ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            io.clear_screen();
            Ok(())
        })
    }
}

pub struct Exit;

impl Command for Exit {
    fn name(&self) -> &str {
        "exit"
    }

    fn summary(&self) -> &str {
        "End the session and lock input"
    }

    fn usage(&self) -> Option<&str> {
        Some("/exit")
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        _ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            io.println("closing session. goodbye.");
            // No unlock path: the session is done taking input.
            io.lock_input();
            Ok(())
        })
    }
}

pub struct Think;

impl Command for Think {
    fn name(&self) -> &str {
        "think"
    }

    fn summary(&self) -> &str {
        "Enable model thinking output for future prompts"
    }

    fn usage(&self) -> Option<&str> {
        Some("/think")
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            if ctx.snapshot().thinking {
                io.println("thinking is already enabled.");
                return Ok(());
            }
            ctx.set_thinking(true);
            io.println("thinking enabled. future prompts will include /think.");
            Ok(())
        })
    }
}

pub struct NoThink;

impl Command for NoThink {
    fn name(&self) -> &str {
        "no_think"
    }

    fn aliases(&self) -> &[&str] {
        &["nothink"]
    }

    fn summary(&self) -> &str {
        "Disable model thinking output for future prompts"
    }

    fn usage(&self) -> Option<&str> {
        Some("/no_think")
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            if !ctx.snapshot().thinking {
                io.println("thinking is already disabled.");
                return Ok(());
            }
            ctx.set_thinking(false);
            io.println("thinking disabled. future prompts will include /no_think.");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::create_router;
    use crate::registry::Router;
    use crate::sink::{CollectingIo, Io};
    use crate::test_support::FakeSession;
    use std::sync::Arc;

    fn router_with(session: FakeSession) -> (Router, Arc<FakeSession>) {
        let session = Arc::new(session);
        let mut router = create_router();
        router.set_context(Arc::clone(&session) as Arc<dyn crate::context::SessionContext>);
        (router, session)
    }

    #[tokio::test]
    async fn clear_clears_and_is_idempotent() {
        let (router, _session) = router_with(FakeSession::new());

        let mut io = CollectingIo::new();
        io.println("old output");
        router.dispatch("/clear", &mut io).await;
        assert!(io.lines.is_empty());
        assert!(io.cleared);

        // Clearing an already-empty screen must not error.
        assert!(router.dispatch("/clear", &mut io).await);
        assert!(io.lines.is_empty());
    }

    #[tokio::test]
    async fn cls_alias_clears_too() {
        let (router, _session) = router_with(FakeSession::new());
        let mut io = CollectingIo::new();
        router.dispatch("/cls", &mut io).await;
        assert!(io.cleared);
    }

    #[tokio::test]
    async fn exit_prints_farewell_then_locks_input() {
        let (router, _session) = router_with(FakeSession::new());
        let mut io = CollectingIo::new();
        router.dispatch("/exit", &mut io).await;
        assert_eq!(io.lines, vec!["closing session. goodbye."]);
        assert!(io.locked);
    }

    #[tokio::test]
    async fn think_toggles_once_and_reports_idempotence() {
        let (router, session) = router_with(FakeSession::new());

        let mut io = CollectingIo::new();
        router.dispatch("/think", &mut io).await;
        assert!(session.state.borrow().thinking);
        assert!(io.lines[0].contains("thinking enabled"));

        let mut io = CollectingIo::new();
        router.dispatch("/think", &mut io).await;
        assert_eq!(io.lines, vec!["thinking is already enabled."]);
    }

    #[tokio::test]
    async fn no_think_and_alias_disable_thinking() {
        let (router, session) = router_with(FakeSession::new());
        session.state.borrow_mut().thinking = true;

        let mut io = CollectingIo::new();
        router.dispatch("/nothink", &mut io).await;
        assert!(!session.state.borrow().thinking);
        assert!(io.lines[0].contains("thinking disabled"));

        let mut io = CollectingIo::new();
        router.dispatch("/no_think", &mut io).await;
        assert_eq!(io.lines, vec!["thinking is already disabled."]);
    }
}

//! `/chat` — send a prompt to the loaded model, streaming deltas as they land.

use std::io;

use futures_util::future::LocalBoxFuture;

use crate::context::SessionContext;
use crate::input::Flags;
use crate::registry::Command;
use crate::sink::Io;

pub struct Chat;

impl Command for Chat {
    fn name(&self) -> &str {
        "chat"
    }

    fn summary(&self) -> &str {
        "Send a message to the model"
    }

    fn usage(&self) -> Option<&str> {
        Some("/chat <message>")
    }

    fn examples(&self) -> &[&str] {
        &["/chat hello there"]
    }

    fn run<'a>(
        &'a self,
        args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            if !ctx.snapshot().loaded {
                io.println("no model loaded\n  run /load first");
                return Ok(());
            }

            let prompt = args.join(" ");
            if prompt.trim().is_empty() {
                io.println("usage: /chat <message>");
                return Ok(());
            }

            let mut last_len = 0usize;
            let mut streamed = false;
            let reply = {
                let mut on_stream = |text: &str| {
                    streamed = true;
                    // The callback carries the cumulative text; emit only the
                    // suffix that is new since the previous call.
                    let delta = text.get(last_len..).unwrap_or_default();
                    if !delta.is_empty() {
                        io.println(delta);
                    }
                    last_len = text.len();
                };
                ctx.chat(&prompt, Some(&mut on_stream)).await?
            };

            // Non-streaming action implementations never call the callback;
            // fall back to printing the final result once.
            if !streamed {
                io.println(&reply);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::create_router;
    use crate::registry::Router;
    use crate::sink::CollectingIo;
    use crate::test_support::FakeSession;
    use std::sync::Arc;

    fn router_with(session: FakeSession) -> (Router, Arc<FakeSession>) {
        let session = Arc::new(session);
        let mut router = create_router();
        router.set_context(Arc::clone(&session) as Arc<dyn crate::context::SessionContext>);
        (router, session)
    }

    fn loaded_session() -> FakeSession {
        let session = FakeSession::new();
        {
            let mut state = session.state.borrow_mut();
            state.downloaded = true;
            state.loaded = true;
        }
        session
    }

    #[tokio::test]
    async fn chat_requires_a_loaded_model() {
        let (router, session) = router_with(FakeSession::new());
        let mut io = CollectingIo::new();
        router.dispatch("/chat hello", &mut io).await;
        assert!(io.lines[0].contains("run /load first"));
        assert_eq!(session.chat_calls.get(), 0);
    }

    #[tokio::test]
    async fn chat_without_message_prints_usage() {
        let (router, session) = router_with(loaded_session());
        let mut io = CollectingIo::new();
        router.dispatch("/chat", &mut io).await;
        assert_eq!(io.lines, vec!["usage: /chat <message>"]);
        assert_eq!(session.chat_calls.get(), 0);
    }

    #[tokio::test]
    async fn streaming_emits_only_deltas() {
        let session = loaded_session();
        *session.stream.borrow_mut() = vec![
            "a".to_string(),
            "ab".to_string(),
            "abc".to_string(),
        ];
        session.reply.borrow_mut().push_str("abc");
        let (router, _session) = router_with(session);

        let mut io = CollectingIo::new();
        router.dispatch("/chat hi", &mut io).await;
        assert_eq!(io.lines, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn repeated_cumulative_text_emits_nothing_new() {
        let session = loaded_session();
        *session.stream.borrow_mut() = vec!["ab".to_string(), "ab".to_string()];
        session.reply.borrow_mut().push_str("ab");
        let (router, _session) = router_with(session);

        let mut io = CollectingIo::new();
        router.dispatch("/chat hi", &mut io).await;
        assert_eq!(io.lines, vec!["ab"]);
    }

    #[tokio::test]
    async fn non_streaming_action_falls_back_to_full_reply() {
        let session = loaded_session();
        session.reply.borrow_mut().push_str("full reply");
        let (router, session) = router_with(session);

        let mut io = CollectingIo::new();
        router.dispatch("/chat hi there", &mut io).await;
        assert_eq!(io.lines, vec!["full reply"]);
        assert_eq!(session.chat_calls.get(), 1);
    }

    #[tokio::test]
    async fn multi_word_prompt_is_joined() {
        let session = loaded_session();
        session.reply.borrow_mut().push_str("ok");
        let (router, session) = router_with(session);

        let mut io = CollectingIo::new();
        router.dispatch("/chat tell me a story", &mut io).await;
        assert_eq!(
            session.last_prompt.borrow().as_deref(),
            Some("tell me a story")
        );
    }

    #[tokio::test]
    async fn chat_failure_surfaces_as_error_line() {
        let session = loaded_session();
        *session.fail.borrow_mut() = Some("completion failed");
        let (router, _session) = router_with(session);

        let mut io = CollectingIo::new();
        assert!(router.dispatch("/chat hi", &mut io).await);
        assert_eq!(io.lines, vec!["Error: completion failed"]);
    }
}

//! `/status` — model and session status report.

use std::io;

use futures_util::future::LocalBoxFuture;
use serde::Serialize;

use crate::context::{ModelStatus, SessionContext};
use crate::input::{Flags, flag_enabled};
use crate::registry::Command;
use crate::sink::Io;

/// Structured status payload; `--json` prints it verbatim.
#[derive(Debug, Serialize)]
struct StatusPayload {
    model: String,
    #[serde(rename = "sizeMB")]
    size_mb: Option<f64>,
    downloaded: bool,
    loaded: bool,
    chats: u64,
    status: ModelStatus,
}

pub struct Status;

impl Command for Status {
    fn name(&self) -> &str {
        "status"
    }

    fn summary(&self) -> &str {
        "Show model and session status"
    }

    fn usage(&self) -> Option<&str> {
        Some("/status [--json] [--quiet|-q]")
    }

    fn examples(&self) -> &[&str] {
        &["/status", "/status --json"]
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            let snap = ctx.snapshot();
            let payload = StatusPayload {
                model: snap
                    .model_name
                    .clone()
                    .unwrap_or_else(|| "not installed".to_string()),
                size_mb: snap.model_size_mb,
                downloaded: snap.downloaded,
                loaded: snap.loaded,
                chats: snap.chats,
                status: snap.status(),
            };

            // JSON output takes precedence; quiet is ignored here.
            if flag_enabled(flags, "json") {
                io.println(&serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            if flag_enabled(flags, "quiet") || flag_enabled(flags, "q") {
                return Ok(());
            }

            let size = payload
                .size_mb
                .map(|mb| format!("{}MB", mb))
                .unwrap_or_else(|| "-".to_string());
            let check = if payload.loaded { " ✓" } else { "" };
            let lines = vec![
                format!("model:        {}", payload.model),
                format!("size:         {}", size),
                format!("status:       {}{}", payload.status, check),
                format!("memory:       {}", if payload.loaded { "loaded" } else { "-" }),
                format!("chats:        {}", payload.chats),
                "privacy:      local / offline".to_string(),
            ];
            io.print_lines(&lines);
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

    fn router_with(session: FakeSession) -> Router {
        let mut router = create_router();
        router.set_context(Arc::new(session));
        router
    }

    #[tokio::test]
    async fn human_readable_block_is_six_lines() {
        let session = FakeSession::new();
        session.state.borrow_mut().model_name = Some("starter.gguf".to_string());
        session.state.borrow_mut().model_size_mb = Some(639.0);
        let router = router_with(session);

        let mut io = CollectingIo::new();
        router.dispatch("/status", &mut io).await;

        assert_eq!(io.lines.len(), 6);
        assert_eq!(io.lines[0], "model:        starter.gguf");
        assert_eq!(io.lines[1], "size:         639MB");
        assert_eq!(io.lines[2], "status:       offline");
    }

    #[tokio::test]
    async fn quiet_prints_nothing() {
        let router = router_with(FakeSession::new());
        for line in ["/status --quiet", "/status -q"] {
            let mut io = CollectingIo::new();
            router.dispatch(line, &mut io).await;
            assert!(io.lines.is_empty());
        }
    }

    #[tokio::test]
    async fn json_overrides_quiet() {
        let router = router_with(FakeSession::new());
        let mut io = CollectingIo::new();
        router.dispatch("/status --json --quiet", &mut io).await;
        assert_eq!(io.lines.len(), 1);
        assert!(io.lines[0].contains("\"status\""));
    }

    #[tokio::test]
    async fn json_payload_has_exact_keys_and_consistent_status() {
        let session = FakeSession::new();
        {
            let mut state = session.state.borrow_mut();
            state.downloaded = true;
            state.loaded = true;
            state.chats = 4;
            state.model_name = Some("starter.gguf".to_string());
            state.model_size_mb = Some(639.0);
        }
        let router = router_with(session);

        let mut io = CollectingIo::new();
        router.dispatch("/status --json", &mut io).await;

        let value: serde_json::Value = serde_json::from_str(&io.lines[0]).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["chats", "downloaded", "loaded", "model", "sizeMB", "status"]
        );
        assert_eq!(object["status"], "active");
        assert_eq!(object["chats"], 4);
    }

    #[tokio::test]
    async fn status_reflects_downloaded_but_not_loaded() {
        let session = FakeSession::new();
        session.state.borrow_mut().downloaded = true;
        let router = router_with(session);

        let mut io = CollectingIo::new();
        router.dispatch("/status --json", &mut io).await;

        let value: serde_json::Value = serde_json::from_str(&io.lines[0]).unwrap();
        assert_eq!(value["status"], "downloaded");
    }
}

//! Host session: state, transcript, and the `SessionContext` the router sees.
//!
//! The session owns everything the command core treats as external: the
//! loaded/chats/thinking state, the running conversation transcript, and the
//! injected model runtime. The chat action appends the user turn before
//! calling the runtime and removes it again on failure, so a failed
//! completion leaves the transcript exactly as it was.

use futures_util::future::LocalBoxFuture;
use std::cell::RefCell;
use std::io;
use std::sync::Arc;

use wisp_core::{ProgressFn, SessionContext, SessionSnapshot, StreamFn};

use crate::config::Config;
use crate::runtime::{ChatMessage, ModelRuntime};

#[derive(Default)]
struct HostState {
    loaded: bool,
    chats: u64,
    thinking: bool,
    transcript: Vec<ChatMessage>,
}

pub struct Session {
    runtime: Arc<ModelRuntime>,
    config: Config,
    state: RefCell<HostState>,
}

impl Session {
    pub fn new(config: Config, runtime: Arc<ModelRuntime>) -> Self {
        let state = HostState {
            transcript: vec![ChatMessage::system(config.system_prompt.clone())],
            ..HostState::default()
        };
        Self {
            runtime,
            config,
            state: RefCell::new(state),
        }
    }

    /// Qwen-style soft switch: the thinking toggle rides on the prompt text
    /// and the runtime passes it through untouched.
    fn prompt_with_marker(&self, prompt: &str) -> String {
        let marker = if self.state.borrow().thinking {
            "/think"
        } else {
            "/no_think"
        };
        format!("{} {}", prompt, marker)
    }
}

impl SessionContext for Session {
    fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.borrow();
        SessionSnapshot {
            downloaded: self.runtime.is_downloaded(),
            loaded: state.loaded,
            chats: state.chats,
            model_name: Some(self.config.model_name.clone()),
            model_size_mb: Some(self.config.model_size_mb),
            thinking: state.thinking,
        }
    }

    fn download<'a>(
        &'a self,
        on_progress: Option<ProgressFn<'a>>,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(self.runtime.download(on_progress))
    }

    fn load(&self) -> LocalBoxFuture<'_, io::Result<()>> {
        Box::pin(async move {
            self.runtime.load().await?;
            self.state.borrow_mut().loaded = true;
            Ok(())
        })
    }

    fn unload(&self) -> LocalBoxFuture<'_, io::Result<()>> {
        Box::pin(async move {
            self.runtime.unload().await?;
            self.state.borrow_mut().loaded = false;
            Ok(())
        })
    }

    fn chat<'a>(
        &'a self,
        prompt: &'a str,
        _on_stream: Option<StreamFn<'a>>,
    ) -> LocalBoxFuture<'a, io::Result<String>> {
        Box::pin(async move {
            let message = self.prompt_with_marker(prompt);

            // Provisional user turn; rolled back if the runtime fails.
            self.state
                .borrow_mut()
                .transcript
                .push(ChatMessage::user(message));
            let transcript = self.state.borrow().transcript.clone();

            match self.runtime.chat(&transcript).await {
                Ok(reply) => {
                    let mut state = self.state.borrow_mut();
                    state.transcript.push(ChatMessage::assistant(reply.clone()));
                    state.chats += 1;
                    Ok(reply)
                }
                Err(err) => {
                    self.state.borrow_mut().transcript.pop();
                    Err(err)
                }
            }
        })
    }

    fn clear_cache(&self) -> LocalBoxFuture<'_, io::Result<()>> {
        Box::pin(async move {
            if self.state.borrow().loaded {
                self.runtime.unload().await?;
                self.state.borrow_mut().loaded = false;
            }
            self.runtime.clear_cache().await
        })
    }

    fn set_thinking(&self, enabled: bool) {
        self.state.borrow_mut().thinking = enabled;
    }
}

//! Session context contracts: the state snapshot and the action surface.
//!
//! The context is owned by the host application, not by the router. Commands
//! read a fresh [`SessionSnapshot`] at invocation time and drive the model
//! runtime only through the [`SessionContext`] action methods — the router
//! itself never touches the actions.

use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use std::io;
use strum::Display;

/// Point-in-time view of the model session.
///
/// Snapshots are read-only and go stale at the next await point: a command
/// that suspends must call [`SessionContext::snapshot`] again rather than
/// reusing a snapshot taken before the suspension.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub downloaded: bool,
    pub loaded: bool,
    /// Completed chat turns; incremented by the host, never by the router.
    pub chats: u64,
    pub model_name: Option<String>,
    pub model_size_mb: Option<f64>,
    pub thinking: bool,
}

impl SessionSnapshot {
    /// Derived lifecycle status: offline until downloaded, active while
    /// loaded, downloaded in between.
    pub fn status(&self) -> ModelStatus {
        if !self.downloaded {
            ModelStatus::Offline
        } else if self.loaded {
            ModelStatus::Active
        } else {
            ModelStatus::Downloaded
        }
    }
}

/// Model lifecycle status as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelStatus {
    Offline,
    Active,
    Downloaded,
}

/// Download progress callback: `(loaded_mb, total_mb)` after each chunk.
pub type ProgressFn<'a> = &'a mut dyn FnMut(f64, f64);

/// Chat stream callback: receives the *cumulative* generated text on each
/// update, not the delta.
pub type StreamFn<'a> = &'a mut dyn FnMut(&str);

/// The externally owned session: a snapshot accessor plus the fixed set of
/// asynchronous model-runtime actions the command layer may invoke.
///
/// Operations return [`LocalBoxFuture`] — the core is single-threaded and
/// cooperative (one dispatch in flight at a time), so futures are not
/// required to be `Send`.
pub trait SessionContext {
    /// A fresh snapshot of session state.
    fn snapshot(&self) -> SessionSnapshot;

    /// Fetch the model into the local cache, reporting progress if asked.
    fn download<'a>(
        &'a self,
        on_progress: Option<ProgressFn<'a>>,
    ) -> LocalBoxFuture<'a, io::Result<()>>;

    /// Bring the downloaded model into memory.
    fn load(&self) -> LocalBoxFuture<'_, io::Result<()>>;

    /// Release the loaded model.
    fn unload(&self) -> LocalBoxFuture<'_, io::Result<()>>;

    /// Run one chat completion. Streaming implementations call `on_stream`
    /// with the cumulative text as it grows; non-streaming implementations
    /// may ignore the callback and only return the final text.
    fn chat<'a>(
        &'a self,
        prompt: &'a str,
        on_stream: Option<StreamFn<'a>>,
    ) -> LocalBoxFuture<'a, io::Result<String>>;

    /// Delete all cached model artifacts.
    fn clear_cache(&self) -> LocalBoxFuture<'_, io::Result<()>>;

    /// Toggle the thinking marker applied to future prompts.
    fn set_thinking(&self, enabled: bool);
}

//! The built-in command set.
//!
//! Each command is a pure policy over the session context and the `Io` sink:
//! it reads a fresh snapshot, invokes zero or more context actions, and
//! writes results through `io`. Registration order here is presentation
//! order in `/help`.

mod chat;
mod help;
mod model;
mod status;
mod terminal;

pub use chat::Chat;
pub use help::Help;
pub use model::{Download, Load, Unload, ClearCache, DEFAULT_MODEL_SIZE_MB};
pub use status::Status;
pub use terminal::{Clear, Exit, NoThink, Think};

use std::sync::{Arc, Weak};

use crate::registry::{Command, Registry, Router};

/// Render a 20-segment progress bar for a 0–100 percentage.
pub(crate) fn progress_bar(pct: f64) -> String {
    let filled = (((pct / 100.0) * 20.0).round()).clamp(0.0, 20.0) as usize;
    format!(
        "[{}{}] {:.0}%",
        "█".repeat(filled),
        "░".repeat(20 - filled),
        pct
    )
}

/// Build the registry holding every built-in command.
///
/// `help` needs to enumerate the finished registry, itself included, so the
/// registry is created cyclically and `help` holds a weak back-reference.
pub fn builtin_registry() -> Arc<Registry> {
    Arc::new_cyclic(|registry: &Weak<Registry>| {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(Help::new(registry.clone())),
            Arc::new(Status),
            Arc::new(Download),
            Arc::new(Load),
            Arc::new(Unload),
            Arc::new(ClearCache),
            Arc::new(Clear),
            Arc::new(Exit),
            Arc::new(Think),
            Arc::new(NoThink),
            Arc::new(Chat),
        ];
        Registry::build(commands)
    })
}

/// A router over the built-in command set, with no context bound yet.
pub fn create_router() -> Router {
    Router::new(builtin_registry())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0.0), format!("[{}] 0%", "░".repeat(20)));
        assert_eq!(progress_bar(100.0), format!("[{}] 100%", "█".repeat(20)));
    }

    #[test]
    fn progress_bar_midpoint() {
        let bar = progress_bar(50.0);
        assert!(bar.starts_with(&format!("[{}{}", "█".repeat(10), "░".repeat(10))));
        assert!(bar.ends_with("50%"));
    }

    #[test]
    fn builtin_registry_resolves_every_documented_name() {
        let registry = builtin_registry();
        for name in [
            "help", "h", "?", "status", "download", "load", "unload", "clear-cache",
            "clear", "cls", "exit", "think", "no_think", "nothink", "chat",
        ] {
            assert!(registry.get(name).is_some(), "missing command: {}", name);
        }
    }

    #[test]
    fn builtin_registry_lists_commands_once_in_order() {
        let registry = builtin_registry();
        let names: Vec<&str> = registry.list().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "help", "status", "download", "load", "unload", "clear-cache", "clear",
                "exit", "think", "no_think", "chat",
            ]
        );
    }
}

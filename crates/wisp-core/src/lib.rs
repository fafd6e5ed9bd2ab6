//! wisp-core: slash-command core for the wisp terminal
//!
//! Provides the tokenizer, flag parser, command registry/router, built-in
//! command set, and the `Io`/`SessionContext` contracts that connect commands
//! to a rendering surface and a model runtime. The crate knows nothing about
//! terminals or model formats — hosts supply both sides.
//!
//! # Quick Start
//!
//! ```
//! use wisp_core::{CollectingIo, create_router};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let router = create_router();
//!     let mut io = CollectingIo::new();
//!
//!     // Not a slash command: the router leaves it for the host.
//!     assert!(!router.dispatch("hello", &mut io).await);
//!
//!     // A slash command is always consumed, even when unknown.
//!     assert!(router.dispatch("/frobnicate", &mut io).await);
//!     assert_eq!(io.lines[1], "type /help for a list of commands");
//! }
//! ```

pub mod commands;
pub mod context;
pub mod input;
pub mod registry;
pub mod sink;

// Re-export commonly used types
pub use commands::{builtin_registry, create_router};
pub use context::{ModelStatus, ProgressFn, SessionContext, SessionSnapshot, StreamFn};
pub use input::{FlagValue, Flags, Parsed, ParsedLine, flag_enabled, parse_flags_and_args,
    parse_line, tokenize};
pub use registry::{Command, Registry, Router};
pub use sink::{CollectingIo, Io};

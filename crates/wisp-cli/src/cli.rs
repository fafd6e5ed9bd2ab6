//! Argument parsing for the `wisp` binary.

use clap::Parser;
use std::path::PathBuf;

/// A slash-command terminal for a local LLM session.
#[derive(Debug, Parser)]
#[command(name = "wisp", version, about)]
pub struct Cli {
    /// Path to an alternate config file (default: $WISP_HOME/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show host diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

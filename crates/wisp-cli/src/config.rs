//! Host configuration.
//!
//! Loaded from `$WISP_HOME/config.toml` (or `~/.wisp/config.toml` when the
//! environment variable is unset). A missing file means defaults; a file that
//! exists but fails to parse is an error rather than a silent fallback.

use serde::{Deserialize, Serialize};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Default starter model: a small instruct-tuned GGUF that fits in a laptop's
/// memory. The size is what `/status` and the banner report before the first
/// download has told us better.
const DEFAULT_MODEL_NAME: &str = "qwen3-0.6b-q4_k_m.gguf";
const DEFAULT_MODEL_URL: &str =
    "https://huggingface.co/Qwen/Qwen3-0.6B-GGUF/resolve/main/Qwen3-0.6B-Q4_K_M.gguf";
const DEFAULT_MODEL_SIZE_MB: f64 = 639.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File name the downloaded model is cached under.
    pub model_name: String,
    /// Where `/download` fetches the model from.
    pub model_url: String,
    /// Advertised model size; replaced by the server's content length during
    /// an actual download.
    pub model_size_mb: f64,
    /// Command spawned by `/load` to serve the model.
    pub server_command: String,
    /// Extra arguments appended to the server command line.
    pub server_args: Vec<String>,
    /// Port the model server listens on.
    pub server_port: u16,
    /// System prompt opening every conversation.
    pub system_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_url: DEFAULT_MODEL_URL.to_string(),
            model_size_mb: DEFAULT_MODEL_SIZE_MB,
            server_command: "llama-server".to_string(),
            server_args: Vec::new(),
            server_port: 8837,
            system_prompt: "You are wisp, a small model living in this terminal. \
                Reply in lower case, short lines, candid and breezy."
                .to_string(),
        }
    }
}

impl Config {
    /// Load config from `path`, falling back to defaults when the file does
    /// not exist.
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
    }
}

/// The wisp home directory: `$WISP_HOME` when set, `~/.wisp` otherwise.
pub fn wisp_dir() -> io::Result<PathBuf> {
    if let Ok(home) = std::env::var("WISP_HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs_next::home_dir()
        .map(|home| home.join(".wisp"))
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "could not determine home directory"))
}

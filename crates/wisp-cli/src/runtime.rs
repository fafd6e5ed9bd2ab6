//! Model runtime: download, llama-server lifecycle, chat completion.
//!
//! One runtime handle exists per session, injected into the session context —
//! the command core never constructs or sees this type. "Downloaded" is
//! derived from the cache file's presence on disk, so it survives restarts.
//! "Loaded" means the spawned model server answered its health check; the
//! handle keeps the child process and kills it on unload.

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Child;

use wisp_core::ProgressFn;

use crate::config::Config;

const MEGABYTE: f64 = 1024.0 * 1024.0;

/// How long `/load` waits for the model server to answer its health check.
const READY_ATTEMPTS: u32 = 120;
const READY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One conversation turn in the OpenAI-compatible wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

pub struct ModelRuntime {
    config: Config,
    cache_dir: PathBuf,
    http: reqwest::Client,
    server: Mutex<Option<Child>>,
}

impl ModelRuntime {
    pub fn new(config: Config, cache_dir: PathBuf) -> Self {
        Self {
            config,
            cache_dir,
            http: reqwest::Client::new(),
            server: Mutex::new(None),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.cache_dir.join(&self.config.model_name)
    }

    pub fn is_downloaded(&self) -> bool {
        self.model_path().exists()
    }

    fn server_slot(&self) -> MutexGuard<'_, Option<Child>> {
        self.server.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn server_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.config.server_port, path)
    }

    /// Stream the model file into the cache, reporting `(loaded_mb, total_mb)`
    /// after each chunk. The download lands in a `.part` file and is renamed
    /// only on completion, so a failed download never looks installed.
    pub async fn download(&self, mut on_progress: Option<ProgressFn<'_>>) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let response = self
            .http
            .get(&self.config.model_url)
            .send()
            .await
            .map_err(|e| io::Error::other(format!("download request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| io::Error::other(format!("download failed: {}", e)))?;

        let total_mb = response
            .content_length()
            .map(|bytes| bytes as f64 / MEGABYTE)
            .unwrap_or(self.config.model_size_mb);

        let partial = self.model_path().with_extension("part");
        let mut file = tokio::fs::File::create(&partial).await?;
        let mut stream = response.bytes_stream();
        let mut received: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| io::Error::other(format!("download stream failed: {}", e)))?;
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;
            if let Some(cb) = &mut on_progress {
                cb(received as f64 / MEGABYTE, total_mb);
            }
        }
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&partial, &self.model_path()).await?;
        Ok(())
    }

    /// Spawn the model server over the cached file and wait until its health
    /// endpoint answers.
    pub async fn load(&self) -> io::Result<()> {
        if !self.is_downloaded() {
            return Err(io::Error::new(
                ErrorKind::NotFound,
                "model file missing from cache",
            ));
        }

        let mut command = tokio::process::Command::new(&self.config.server_command);
        command
            .arg("-m")
            .arg(self.model_path())
            .arg("--port")
            .arg(self.config.server_port.to_string())
            .args(&self.config.server_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = command.spawn().map_err(|e| {
            io::Error::other(format!(
                "failed to start {}: {}",
                self.config.server_command, e
            ))
        })?;
        *self.server_slot() = Some(child);

        if let Err(err) = self.wait_ready().await {
            self.unload().await?;
            return Err(err);
        }
        Ok(())
    }

    async fn wait_ready(&self) -> io::Result<()> {
        let url = self.server_url("/health");
        for _ in 0..READY_ATTEMPTS {
            if let Ok(response) = self.http.get(&url).send().await {
                if response.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        Err(io::Error::new(
            ErrorKind::TimedOut,
            "model server did not become ready",
        ))
    }

    /// Kill the model server, if one is running.
    pub async fn unload(&self) -> io::Result<()> {
        let child = self.server_slot().take();
        if let Some(mut child) = child {
            child.kill().await.ok();
        }
        Ok(())
    }

    /// One non-streaming chat completion over the full transcript.
    pub async fn chat(&self, messages: &[ChatMessage]) -> io::Result<String> {
        let request = ChatRequest {
            model: &self.config.model_name,
            messages,
            stream: false,
        };

        let response = self
            .http
            .post(self.server_url("/v1/chat/completions"))
            .json(&request)
            .send()
            .await
            .map_err(|e| io::Error::other(format!("chat request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| io::Error::other(format!("chat failed: {}", e)))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| io::Error::other(format!("malformed chat response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| io::Error::new(ErrorKind::InvalidData, "chat response had no choices"))
    }

    /// Remove every cached model artifact.
    pub async fn clear_cache(&self) -> io::Result<()> {
        if self.cache_dir.exists() {
            tokio::fs::remove_dir_all(&self.cache_dir).await?;
        }
        Ok(())
    }
}

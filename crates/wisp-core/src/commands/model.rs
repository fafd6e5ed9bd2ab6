//! Model lifecycle commands: `/download`, `/load`, `/unload`, `/clear-cache`.

use std::io;

use futures_util::future::LocalBoxFuture;

use crate::commands::progress_bar;
use crate::context::SessionContext;
use crate::input::Flags;
use crate::registry::Command;
use crate::sink::Io;

/// Fallback size used when the session does not know the model size yet.
pub const DEFAULT_MODEL_SIZE_MB: f64 = 639.0;

fn fetch_banner(model: &str, total_mb: f64, pct: f64) -> String {
    format!(
        "→ fetching model: {} ({}MB)\n  {}",
        model,
        total_mb,
        progress_bar(pct)
    )
}

pub struct Download;

impl Command for Download {
    fn name(&self) -> &str {
        "download"
    }

    fn summary(&self) -> &str {
        "Download the starter model"
    }

    fn usage(&self) -> Option<&str> {
        Some("/download")
    }

    fn examples(&self) -> &[&str] {
        &["/download"]
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            let snap = ctx.snapshot();
            let total = snap.model_size_mb.unwrap_or(DEFAULT_MODEL_SIZE_MB);
            let model = snap
                .model_name
                .clone()
                .unwrap_or_else(|| "starter.gguf".to_string());
            let id = "download";

            io.start_live(id, &fetch_banner(&model, total, 0.0));
            {
                let mut on_progress = |loaded_mb: f64, total_mb: f64| {
                    let denom = if total_mb > 0.0 { total_mb } else { total };
                    let pct = ((loaded_mb / denom) * 100.0).min(100.0);
                    io.update_live(id, &fetch_banner(&model, total, pct));
                };
                ctx.download(Some(&mut on_progress)).await?;
            }
            io.end_live(id);
            io.println("install complete.\nrun /load to activate the model.");
            Ok(())
        })
    }
}

pub struct Load;

impl Command for Load {
    fn name(&self) -> &str {
        "load"
    }

    fn summary(&self) -> &str {
        "Load the model into memory"
    }

    fn usage(&self) -> Option<&str> {
        Some("/load")
    }

    fn examples(&self) -> &[&str] {
        &["/load"]
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            let snap = ctx.snapshot();
            if !snap.downloaded {
                io.println("no llm downloaded\n  run /download first");
                return Ok(());
            }
            if snap.loaded {
                io.println("model already active.");
                return Ok(());
            }
            io.println(&format!(
                "loading {} ...",
                snap.model_name.as_deref().unwrap_or("model")
            ));
            ctx.load().await?;
            // Presentation constants, not measured values.
            io.println(
                "✓ model loaded\nthreads: 8\ncontext: 4096 tokens\nlatency: ~11ms/token\n tip: type a message to start chatting",
            );
            Ok(())
        })
    }
}

pub struct Unload;

impl Command for Unload {
    fn name(&self) -> &str {
        "unload"
    }

    fn summary(&self) -> &str {
        "Unload the model from memory"
    }

    fn usage(&self) -> Option<&str> {
        Some("/unload")
    }

    fn examples(&self) -> &[&str] {
        &["/unload"]
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            if !ctx.snapshot().loaded {
                io.println("model already unloaded.");
                return Ok(());
            }
            ctx.unload().await?;
            io.println("model unloaded. (run /load to activate again)");
            Ok(())
        })
    }
}

pub struct ClearCache;

impl Command for ClearCache {
    fn name(&self) -> &str {
        "clear-cache"
    }

    fn summary(&self) -> &str {
        "Delete all cached models"
    }

    fn usage(&self) -> Option<&str> {
        Some("/clear-cache")
    }

    fn examples(&self) -> &[&str] {
        &["/clear-cache"]
    }

    fn run<'a>(
        &'a self,
        _args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            let snap = ctx.snapshot();
            if !snap.downloaded && !snap.loaded {
                io.println("no cached models to clear.");
                return Ok(());
            }
            if snap.loaded {
                io.println("unloading model and clearing cache...");
            } else {
                io.println("clearing cached models...");
            }
            ctx.clear_cache().await?;
            io.println("model cache cleared.");
            Ok(())
        })
    }
}

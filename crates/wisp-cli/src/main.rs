// wisp: slash-command terminal for a local LLM session
// REPL host: reads lines, routes slash input through the command core,
// treats everything else as chat.

mod cli;
mod config;
mod output;
mod runtime;
mod session;

use clap::Parser;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;

use wisp_core::{Flags, Io, Router, create_router};

use crate::cli::Cli;
use crate::config::Config;
use crate::output::TerminalIo;
use crate::runtime::ModelRuntime;
use crate::session::Session;

const PROMPT: &str = "➜ ~ ";

fn banner(config: &Config) -> String {
    let now = chrono::Local::now();
    format!(
        "Last login: {} on ttys000\n\
         no llm loaded\n    \
         run /download to install {} ({}MB)\n    \
         run /load to load it if you already downloaded it\n    \
         run /help for commands",
        now.format("%a %b %e %H:%M:%S"),
        config.model_name,
        config.model_size_mb,
    )
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("wisp: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> io::Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::wisp_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)?;
    let cache_dir = config::wisp_dir()?.join("models");

    if cli.verbose {
        eprintln!("[config: {}]", config_path.display());
        eprintln!("[model cache: {}]", cache_dir.display());
    }

    let runtime = Arc::new(ModelRuntime::new(config.clone(), cache_dir));
    let session = Arc::new(Session::new(config.clone(), runtime));
    let mut router = create_router();
    router.set_context(session.clone());

    println!("{}", banner(&config));

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        // Input submission stays disabled while a command is in flight: the
        // loop only reads the next line after this dispatch completes.
        let mut sink = TerminalIo::new(!line.starts_with('/'));
        let handled = router.dispatch(&line, &mut sink).await;
        if !handled {
            chat_line(&router, session.as_ref(), &line, &mut sink).await;
        }
        sink.finish();
        if sink.locked() {
            break;
        }
    }
    Ok(())
}

/// Route bare input through the chat command without re-tokenizing it.
async fn chat_line(router: &Router, session: &Session, line: &str, sink: &mut TerminalIo) {
    let Some(chat) = router.get("chat") else {
        return;
    };
    let args = vec![line.to_string()];
    let flags = Flags::new();
    if let Err(err) = chat.run(&args, &flags, sink, session).await {
        sink.println(&format!("Error: {}", err));
    }
}

//! `/help` — command listing and per-command detail.

use std::io;
use std::sync::Weak;

use futures_util::future::LocalBoxFuture;

use crate::context::SessionContext;
use crate::input::Flags;
use crate::registry::{Command, Registry};
use crate::sink::Io;

/// Lists every registered command, or shows detail for one name-or-alias.
///
/// Holds a weak back-reference to the registry it lives in; the registry is
/// created cyclically so help can enumerate itself alongside its peers.
pub struct Help {
    registry: Weak<Registry>,
}

impl Help {
    pub fn new(registry: Weak<Registry>) -> Self {
        Self { registry }
    }
}

fn alias_suffix(command: &dyn Command, separator: &str) -> String {
    if command.aliases().is_empty() {
        String::new()
    } else {
        format!(" ({})", command.aliases().join(separator))
    }
}

impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn aliases(&self) -> &[&str] {
        &["h", "?"]
    }

    fn summary(&self) -> &str {
        "Show available commands or help for a specific command"
    }

    fn usage(&self) -> Option<&str> {
        Some("/help [command]")
    }

    fn examples(&self) -> &[&str] {
        &["/help", "/help status"]
    }

    fn run<'a>(
        &'a self,
        args: &'a [String],
        _flags: &'a Flags,
        io: &'a mut dyn Io,
        _ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>> {
        Box::pin(async move {
            let Some(registry) = self.registry.upgrade() else {
                return Err(io::Error::other("command registry is gone"));
            };

            if let Some(name) = args.first() {
                let Some(command) = registry.get(name) else {
                    io.println(&format!("No help for: {}", name));
                    return Ok(());
                };
                io.println(&format!(
                    "{}{}",
                    command.name(),
                    alias_suffix(command.as_ref(), ", ")
                ));
                io.println(command.summary());
                if let Some(usage) = command.usage() {
                    io.println(&format!("usage: {}", usage));
                }
                for example in command.examples() {
                    io.println(&format!("  {}", example));
                }
                return Ok(());
            }

            io.println("Available commands:");
            for command in registry.list() {
                io.println(&format!(
                    "/{}{}  - {}",
                    command.name(),
                    alias_suffix(command.as_ref(), ","),
                    command.summary()
                ));
            }
            Ok(())
        })
    }
}

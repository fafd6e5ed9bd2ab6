//! Command registry and dispatch router.
//!
//! The registry is built once at session start from a fixed command list and
//! is immutable afterwards: every name and alias maps to its command, with
//! later registrations overwriting earlier ones on collision
//! (last-registered-wins is the defined tie-break). The router owns the only
//! lookup path from raw input to command execution and isolates command
//! failures behind a single reported error line — `dispatch` never rejects.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use futures_util::future::LocalBoxFuture;

use crate::context::SessionContext;
use crate::input::{Flags, parse_line};
use crate::sink::Io;

/// A named, possibly-aliased unit of behavior invoked via a leading-slash
/// input line. Commands are stateless policy objects parameterized by the
/// session context at call time.
pub trait Command {
    /// Canonical name; unique within a registry.
    fn name(&self) -> &str;

    /// Additional identity strings resolving to this command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line human-readable description.
    fn summary(&self) -> &str;

    /// Usage line shown by help, if any.
    fn usage(&self) -> Option<&str> {
        None
    }

    /// Example invocations shown by help.
    fn examples(&self) -> &[&str] {
        &[]
    }

    /// Execute against the session. Failures are reduced to an error line at
    /// the router boundary and never propagate past `dispatch`.
    fn run<'a>(
        &'a self,
        args: &'a [String],
        flags: &'a Flags,
        io: &'a mut dyn Io,
        ctx: &'a dyn SessionContext,
    ) -> LocalBoxFuture<'a, io::Result<()>>;
}

/// Immutable name/alias lookup table over a fixed command list.
pub struct Registry {
    commands: Vec<Arc<dyn Command>>,
    by_name: HashMap<String, Arc<dyn Command>>,
}

impl Registry {
    /// Build the lookup table. Every alias maps to the same command object;
    /// a later command claiming an existing name or alias wins the entry.
    pub fn build(commands: Vec<Arc<dyn Command>>) -> Self {
        let mut by_name = HashMap::new();
        for command in &commands {
            by_name.insert(command.name().to_string(), Arc::clone(command));
            for alias in command.aliases() {
                by_name.insert((*alias).to_string(), Arc::clone(command));
            }
        }

        // De-duplicate by object identity, preserving registration order.
        let mut unique: Vec<Arc<dyn Command>> = Vec::new();
        for command in commands {
            if !unique.iter().any(|c| Arc::ptr_eq(c, &command)) {
                unique.push(command);
            }
        }

        Self {
            commands: unique,
            by_name,
        }
    }

    /// Alias-aware lookup.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.by_name.get(name)
    }

    /// The de-duplicated command set in registration order.
    pub fn list(&self) -> &[Arc<dyn Command>] {
        &self.commands
    }
}

/// Dispatches raw input lines against a [`Registry`] and a bound session
/// context.
///
/// Context binding is a first-class method rather than construction state so
/// the host can swap the session without rebuilding the router. Rebinding is
/// not synchronized against an in-flight dispatch; the host contract is
/// single-threaded, one dispatch at a time.
pub struct Router {
    registry: Arc<Registry>,
    ctx: Option<Arc<dyn SessionContext>>,
}

impl Router {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            ctx: None,
        }
    }

    /// Bind or rebind the session context used by subsequent dispatches.
    pub fn set_context(&mut self, ctx: Arc<dyn SessionContext>) {
        self.ctx = Some(ctx);
    }

    /// Alias-aware command lookup, for hosts that drive a command directly.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.registry.get(name)
    }

    /// The registered command set, for help generation.
    pub fn list(&self) -> &[Arc<dyn Command>] {
        self.registry.list()
    }

    /// Interpret one raw input line.
    ///
    /// Returns `false` only when the line is not a slash command at all — the
    /// caller must then treat it as ordinary input. Everything else is
    /// consumed here: unknown names, a missing context, and command failures
    /// are all reported through `io` and return `true` so the line never
    /// falls through to another interpretation.
    pub async fn dispatch(&self, raw: &str, io: &mut dyn Io) -> bool {
        let trimmed = raw.trim();
        let Some(line) = trimmed.strip_prefix('/') else {
            return false;
        };

        let parsed = parse_line(line);
        let Some(command) = self.registry.get(&parsed.cmd) else {
            io.println(&format!("command not found: /{}", parsed.cmd));
            io.println("type /help for a list of commands");
            return true;
        };

        // Fail closed: never execute a command without a bound context.
        let Some(ctx) = &self.ctx else {
            io.println("Error: no session context bound");
            return true;
        };

        if let Err(err) = command.run(&parsed.args, &parsed.flags, io, ctx.as_ref()).await {
            io.println(&format!("Error: {}", err));
        }
        true
    }
}

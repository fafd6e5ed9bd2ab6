//! Output sink abstraction for decoupling commands from the rendering surface.
//!
//! Commands never write to a terminal directly — they emit through [`Io`],
//! and the host decides how lines, live regions, and screen-level effects are
//! rendered. The trait has a required baseline (`println`) and optional
//! enhanced capabilities expressed as default methods, so a minimal sink only
//! implements the baseline and still sees every piece of output.

use indexmap::IndexMap;

/// Session-scoped output sink.
///
/// `start_live`/`update_live`/`end_live` model a named output slot whose text
/// is replaced in place (progress bars). Ids are scoped to one command
/// invocation; at most one live region exists per id. `clear_screen` and
/// `lock_input` are terminal-level side effects outside the message stream.
pub trait Io {
    /// Append one line of output. The only required operation.
    fn println(&mut self, line: &str);

    /// Append a batch of lines. Default: one `println` per line.
    fn print_lines(&mut self, lines: &[String]) {
        for line in lines {
            self.println(line);
        }
    }

    /// Open a named live region showing `text`. Default: plain output.
    fn start_live(&mut self, _id: &str, text: &str) {
        self.println(text);
    }

    /// Replace the text of a live region in place. Default: plain output.
    fn update_live(&mut self, _id: &str, text: &str) {
        self.println(text);
    }

    /// Close a live region, leaving its final text in the scrollback.
    fn end_live(&mut self, _id: &str) {}

    /// Clear the rendering surface.
    fn clear_screen(&mut self) {}

    /// Permanently disable further input submission for the session.
    fn lock_input(&mut self) {}
}

/// A sink that records everything for programmatic use.
///
/// Useful for testing or embedding without a terminal: lines accumulate in
/// order, every live-region write is logged, and screen-level effects set
/// flags instead of touching a display.
#[derive(Debug, Default)]
pub struct CollectingIo {
    /// Appended output lines, in emission order.
    pub lines: Vec<String>,
    /// Every `start_live`/`update_live` text, in emission order.
    pub live_updates: Vec<String>,
    /// Currently open live regions by id.
    pub live: IndexMap<String, String>,
    /// Whether `clear_screen` has been called.
    pub cleared: bool,
    /// Whether `lock_input` has been called.
    pub locked: bool,
}

impl CollectingIo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Io for CollectingIo {
    fn println(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn start_live(&mut self, id: &str, text: &str) {
        self.live_updates.push(text.to_string());
        self.live.insert(id.to_string(), text.to_string());
    }

    fn update_live(&mut self, id: &str, text: &str) {
        self.live_updates.push(text.to_string());
        match self.live.get_mut(id) {
            Some(slot) => *slot = text.to_string(),
            // Updates against an unopened id degrade to plain output.
            None => self.lines.push(text.to_string()),
        }
    }

    fn end_live(&mut self, id: &str) {
        if let Some(text) = self.live.shift_remove(id) {
            self.lines.push(text);
        }
    }

    fn clear_screen(&mut self) {
        self.lines.clear();
        self.cleared = true;
    }

    fn lock_input(&mut self) {
        self.locked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_io_appends_lines() {
        let mut io = CollectingIo::new();
        io.println("one");
        io.print_lines(&["two".to_string(), "three".to_string()]);
        assert_eq!(io.lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn live_region_updates_in_place() {
        let mut io = CollectingIo::new();
        io.start_live("dl", "0%");
        io.update_live("dl", "50%");
        io.update_live("dl", "100%");
        assert_eq!(io.live.get("dl"), Some(&"100%".to_string()));
        assert_eq!(io.live_updates, vec!["0%", "50%", "100%"]);
        assert!(io.lines.is_empty());
    }

    #[test]
    fn end_live_moves_final_text_into_lines() {
        let mut io = CollectingIo::new();
        io.start_live("dl", "done");
        io.end_live("dl");
        assert!(io.live.is_empty());
        assert_eq!(io.lines, vec!["done"]);
    }

    #[test]
    fn update_without_start_degrades_to_println() {
        let mut io = CollectingIo::new();
        io.update_live("ghost", "text");
        assert_eq!(io.lines, vec!["text"]);
    }

    #[test]
    fn clear_screen_empties_lines() {
        let mut io = CollectingIo::new();
        io.println("gone");
        io.clear_screen();
        assert!(io.lines.is_empty());
        assert!(io.cleared);
    }

    #[test]
    fn minimal_sink_only_needs_println() {
        struct Minimal(Vec<String>);
        impl Io for Minimal {
            fn println(&mut self, line: &str) {
                self.0.push(line.to_string());
            }
        }

        let mut io = Minimal(Vec::new());
        io.start_live("x", "live text");
        io.update_live("x", "updated");
        io.end_live("x");
        io.clear_screen();
        io.lock_input();
        // Enhanced operations fall back to the baseline or no-op.
        assert_eq!(io.0, vec!["live text", "updated"]);
    }
}

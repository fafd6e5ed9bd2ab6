//! Terminal implementation of the core `Io` contract.
//!
//! Plain output appends lines to stdout. Live regions are rewritten in place
//! with cursor movement, so progress bars update instead of scrolling. In
//! coalescing mode (used for chat) `println` writes without a trailing
//! newline, so streamed deltas concatenate into one flowing response; the
//! host calls [`TerminalIo::finish`] after the dispatch to close the line.

use crossterm::{QueueableCommand, cursor, terminal};
use std::io::{self, Write};

use wisp_core::Io;

struct LiveRegion {
    id: String,
    height: u16,
}

pub struct TerminalIo {
    coalesce: bool,
    inline_open: bool,
    live: Option<LiveRegion>,
    locked: bool,
}

impl TerminalIo {
    /// One sink per dispatched line. `coalesce` is set for chat-style
    /// output where successive writes continue the same visual block.
    pub fn new(coalesce: bool) -> Self {
        Self {
            coalesce,
            inline_open: false,
            live: None,
            locked: false,
        }
    }

    /// Whether a command asked the host to stop reading input.
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Close any dangling inline output with a newline.
    pub fn finish(&mut self) {
        if self.inline_open {
            println!();
            self.inline_open = false;
        }
    }
}

fn rewrite_live(previous_height: u16, text: &str) -> io::Result<()> {
    let mut out = io::stdout();
    out.queue(cursor::MoveUp(previous_height.max(1)))?;
    out.queue(cursor::MoveToColumn(0))?;
    out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
    out.flush()?;
    println!("{}", text);
    Ok(())
}

fn line_height(text: &str) -> u16 {
    text.lines().count().max(1) as u16
}

impl Io for TerminalIo {
    fn println(&mut self, line: &str) {
        if self.coalesce {
            print!("{}", line);
            io::stdout().flush().ok();
            self.inline_open = true;
        } else {
            println!("{}", line);
        }
    }

    fn start_live(&mut self, id: &str, text: &str) {
        self.finish();
        println!("{}", text);
        self.live = Some(LiveRegion {
            id: id.to_string(),
            height: line_height(text),
        });
    }

    fn update_live(&mut self, id: &str, text: &str) {
        let Some(region) = self.live.as_mut().filter(|region| region.id == id) else {
            // Updates without an open region degrade to plain output.
            self.println(text);
            return;
        };
        let previous = region.height;
        region.height = line_height(text);
        if rewrite_live(previous, text).is_err() {
            // Terminal rejected cursor movement; degrade to append.
            println!("{}", text);
        }
    }

    fn end_live(&mut self, id: &str) {
        if self.live.as_ref().is_some_and(|region| region.id == id) {
            self.live = None;
        }
    }

    fn clear_screen(&mut self) {
        let mut out = io::stdout();
        if out.queue(terminal::Clear(terminal::ClearType::All)).is_ok()
            && out.queue(cursor::MoveTo(0, 0)).is_ok()
        {
            out.flush().ok();
        }
        self.inline_open = false;
        self.live = None;
    }

    fn lock_input(&mut self) {
        self.finish();
        self.locked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_input_sets_the_flag() {
        let mut io = TerminalIo::new(false);
        assert!(!io.locked());
        io.lock_input();
        assert!(io.locked());
    }

    #[test]
    fn live_region_tracks_height_across_updates() {
        let mut io = TerminalIo::new(false);
        io.start_live("dl", "banner\n  bar");
        assert_eq!(io.live.as_ref().unwrap().height, 2);
        io.update_live("dl", "banner\n  bar\n  extra");
        assert_eq!(io.live.as_ref().unwrap().height, 3);
        io.end_live("dl");
        assert!(io.live.is_none());
    }

    #[test]
    fn end_live_ignores_unrelated_ids() {
        let mut io = TerminalIo::new(false);
        io.start_live("dl", "text");
        io.end_live("other");
        assert!(io.live.is_some());
    }

    #[test]
    fn coalesced_output_stays_inline_until_finished() {
        let mut io = TerminalIo::new(true);
        io.println("a");
        io.println("b");
        assert!(io.inline_open);
        io.finish();
        assert!(!io.inline_open);
    }

    #[test]
    fn clear_screen_resets_live_and_inline_state() {
        let mut io = TerminalIo::new(true);
        io.println("partial");
        io.start_live("dl", "text");
        io.clear_screen();
        assert!(io.live.is_none());
        assert!(!io.inline_open);
    }

    #[test]
    fn line_height_counts_embedded_newlines() {
        assert_eq!(line_height(""), 1);
        assert_eq!(line_height("one"), 1);
        assert_eq!(line_height("one\ntwo"), 2);
    }
}

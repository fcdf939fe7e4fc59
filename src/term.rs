//! Terminal output.
//!
//! Thin wrapper over any `Write` target that speaks the handful of ANSI
//! sequences playback needs: clear-and-home, cursor hide/show, and styled
//! block writes. Each frame is assembled into one string and written in a
//! single call before flushing, which keeps redraws tear-free.

use crate::convert::AsciiFrame;
use crate::style::Styler;
use std::io::{self, Write};

const CLEAR_AND_HOME: &str = "\x1b[2J\x1b[H";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

/// Terminal handle for playback output.
pub struct Terminal<W: Write> {
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Hide the cursor while frames are redrawn.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        self.out.write_all(HIDE_CURSOR.as_bytes())?;
        self.out.flush()
    }

    /// Restore the cursor. Called on every playback exit path.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        self.out.write_all(SHOW_CURSOR.as_bytes())?;
        self.out.flush()
    }

    /// Clear the display and move the cursor home.
    pub fn clear(&mut self) -> io::Result<()> {
        self.out.write_all(CLEAR_AND_HOME.as_bytes())
    }

    /// Write one frame wrapped in the styler's escape pair, then flush.
    pub fn draw(&mut self, frame: &AsciiFrame, styler: &dyn Styler) -> io::Result<()> {
        let prefix = styler.prefix();
        let suffix = styler.suffix();
        let mut block =
            String::with_capacity(prefix.len() + frame.as_str().len() + suffix.len());
        block.push_str(prefix);
        block.push_str(frame.as_str());
        block.push_str(suffix);
        self.out.write_all(block.as_bytes())?;
        self.out.flush()
    }

    /// Write a line of plain text (notices) and flush.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

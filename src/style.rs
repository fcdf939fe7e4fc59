//! Block styling.
//!
//! Styling is an injected capability: the playback loop receives one
//! [`Styler`] chosen at startup and never consults globals. A styler wraps
//! the whole rendered block in a single escape pair, not per-character.

use crate::ColorMode;

/// ANSI green foreground.
const GREEN: &str = "\x1b[32m";
/// ANSI style reset.
const RESET: &str = "\x1b[0m";

/// A start/reset escape pair applied around each rendered block.
pub trait Styler {
    /// Escape written before the block; empty for unstyled output.
    fn prefix(&self) -> &str;
    /// Escape written after the block; empty for unstyled output.
    fn suffix(&self) -> &str;
}

/// No-op styler: frames pass through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl Styler for Plain {
    fn prefix(&self) -> &str {
        ""
    }

    fn suffix(&self) -> &str {
        ""
    }
}

/// Green accent: one foreground escape per block, reset right after.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreenAccent;

impl Styler for GreenAccent {
    fn prefix(&self) -> &str {
        GREEN
    }

    fn suffix(&self) -> &str {
        RESET
    }
}

/// Pick the styler for a color mode, once, at startup.
///
/// When color output is unavailable (`NO_COLOR` is set) an accent request
/// silently degrades to plain output.
pub fn for_mode(mode: ColorMode) -> Box<dyn Styler> {
    select(mode, std::env::var_os("NO_COLOR").is_none())
}

fn select(mode: ColorMode, color_available: bool) -> Box<dyn Styler> {
    match mode {
        ColorMode::Green if color_available => Box::new(GreenAccent),
        _ => Box::new(Plain),
    }
}

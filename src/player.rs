//! Playback driver.
//!
//! One synchronous loop: decode a frame, convert it, clear the terminal,
//! write the styled block, sleep. Everything happens strictly in sequence;
//! the per-frame sleep is the only suspension point. The loop is generic
//! over [`FrameSource`] and the output writer so it can be exercised in
//! tests without ffmpeg or a TTY.

use crate::convert::frame_to_ascii;
use crate::source::VideoSource;
use crate::style::{self, Styler};
use crate::term::Terminal;
use crate::{PlayError, PlaybackConfig};
use image::DynamicImage;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Frame-by-frame access to a decoded video stream.
///
/// Implemented by [`VideoSource`]; tests substitute synthetic sources.
pub trait FrameSource {
    /// Decode the next frame. `Ok(None)` is end of stream.
    fn next_frame(&mut self) -> io::Result<Option<DynamicImage>>;

    /// Frame rate reported by the container; non-positive when unknown.
    fn nominal_fps(&self) -> f64;
}

/// How a playback session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The stream ran out of frames.
    Ended,
    /// The configured frame cap was reached.
    Stopped,
    /// An interrupt was observed between frames.
    Interrupted,
}

/// Set by the Ctrl-C handler, observed by the loop between frames.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the process-wide Ctrl-C handler.
///
/// Call once at startup. The handler only raises a flag; the playback loop
/// checks it at the next frame boundary (an in-progress sleep or decode
/// finishes first).
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst))
}

/// Whether Ctrl-C has been received.
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// The rate playback is paced at: override if set, else the source's native
/// rate, else the configured fallback.
fn effective_fps(config: &PlaybackConfig, nominal: f64) -> f64 {
    if let Some(rate) = config.fps_override {
        return f64::from(rate);
    }
    if nominal > 0.0 {
        nominal
    } else {
        f64::from(config.fallback_fps)
    }
}

/// Open `path` and play it to stdout, honoring the process Ctrl-C flag.
///
/// The decoder handle is released on every exit path, including errors.
///
/// # Errors
/// `SourceNotFound` / `DecoderMissing` before any frame is rendered;
/// `ConfigInvalid` for a zero width; `Io` for terminal failures.
pub fn play_file(path: &Path, config: &PlaybackConfig) -> Result<Outcome, PlayError> {
    config.validate()?;
    let mut source = VideoSource::open(path)?;
    let styler = style::for_mode(config.color);
    let stdout = io::stdout();
    let mut term = Terminal::new(stdout.lock());
    play(&mut source, config, styler.as_ref(), &mut term, &INTERRUPTED)
}

/// Play `source` to `term` until end of stream, frame cap, or interrupt.
pub fn play<S: FrameSource, W: Write>(
    source: &mut S,
    config: &PlaybackConfig,
    styler: &dyn Styler,
    term: &mut Terminal<W>,
    stop: &AtomicBool,
) -> Result<Outcome, PlayError> {
    config.validate()?;
    term.hide_cursor()?;
    let result = run_loop(source, config, styler, term, stop);
    // Cursor restore happens whichever way the loop exits.
    let _ = term.show_cursor();
    if matches!(result, Ok(Outcome::Interrupted)) {
        let _ = term.write_line("\nPlayback interrupted.");
    }
    result
}

fn run_loop<S: FrameSource, W: Write>(
    source: &mut S,
    config: &PlaybackConfig,
    styler: &dyn Styler,
    term: &mut Terminal<W>,
    stop: &AtomicBool,
) -> Result<Outcome, PlayError> {
    let rate = effective_fps(config, source.nominal_fps());
    // Fixed pacing: the delay never subtracts decode/convert/render time,
    // so sustained playback runs slightly below the nominal rate.
    let delay = Duration::from_secs_f64(1.0 / rate);
    log::debug!("pacing playback at {:.3} fps", rate);

    let mut rendered: u64 = 0;
    loop {
        if stop.load(Ordering::SeqCst) {
            log::info!("interrupt observed after {} frames", rendered);
            return Ok(Outcome::Interrupted);
        }

        let Some(frame) = source.next_frame()? else {
            log::info!("end of stream after {} frames", rendered);
            return Ok(Outcome::Ended);
        };

        let ascii = frame_to_ascii(&frame, config.width);
        term.clear()?;
        term.draw(&ascii, styler)?;
        rendered += 1;

        if let Some(limit) = config.max_frames {
            if rendered >= limit {
                log::info!("frame cap of {} reached", limit);
                return Ok(Outcome::Stopped);
            }
        }

        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlaybackConfig {
        PlaybackConfig::default()
    }

    #[test]
    fn effective_fps_prefers_override() {
        let mut cfg = config();
        cfg.fps_override = Some(12);
        assert_eq!(effective_fps(&cfg, 24.0), 12.0);
    }

    #[test]
    fn effective_fps_uses_native_rate() {
        assert_eq!(effective_fps(&config(), 24.0), 24.0);
    }

    #[test]
    fn effective_fps_falls_back_when_rate_unusable() {
        assert_eq!(effective_fps(&config(), 0.0), 30.0);
        assert_eq!(effective_fps(&config(), -1.0), 30.0);
    }
}

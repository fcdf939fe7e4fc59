//! # playscii - ASCII Video Player Library
//!
//! `playscii` plays video files in the terminal by converting each decoded
//! frame into a brightness-mapped ASCII character grid.
//!
//! ## Features
//!
//! - Frame-to-ASCII conversion with a 9-level brightness ramp
//! - Paced playback at the source's native frame rate or an override
//! - Optional single accent color per rendered block
//! - Hard frame-count cap and clean Ctrl-C shutdown
//!
//! ## Example
//!
//! ```no_run
//! use playscii::{play_file, PlaybackConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PlaybackConfig::default();
//! let outcome = play_file(Path::new("input.mp4"), &config)?;
//! println!("playback finished: {:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! Decoding is delegated to `ffmpeg`/`ffprobe` on `PATH`; the terminal is
//! driven with plain ANSI escapes, so anything VT100-compatible works.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

pub mod convert;
pub mod player;
pub mod source;
pub mod style;
pub mod term;

pub use convert::{frame_to_ascii, AsciiFrame, RAMP};
pub use player::{install_interrupt_handler, interrupted, play, play_file, FrameSource, Outcome};
pub use source::{VideoInfo, VideoSource};
pub use style::{GreenAccent, Plain, Styler};
pub use term::Terminal;

/// Errors surfaced before or during playback.
///
/// Everything else (interactive input fallbacks, missing color support,
/// end of stream) is handled in place and never reaches the caller.
#[derive(Debug, Error)]
pub enum PlayError {
    /// The path does not resolve to a readable video container.
    #[error("video source '{}' not found or not a readable video", .0.display())]
    SourceNotFound(PathBuf),

    /// ffprobe/ffmpeg is not installed or not on PATH.
    #[error("'{0}' not found on PATH; install ffmpeg to play video")]
    DecoderMissing(&'static str),

    /// A setting that must be rejected before playback starts.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Terminal or pipe I/O failure.
    #[error("playback i/o error")]
    Io(#[from] std::io::Error),
}

/// Accent color applied to a rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Plain, uncolored output.
    #[default]
    None,
    /// Wrap each block in a single green foreground escape.
    Green,
}

/// Settings for one playback session. Immutable once playback starts.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Target character columns.
    pub width: u32,
    /// Playback rate override; `None` uses the source's native rate.
    pub fps_override: Option<u32>,
    /// Accent color for rendered blocks.
    pub color: ColorMode,
    /// Hard cap on total frames rendered; `None` is unlimited.
    pub max_frames: Option<u64>,
    /// Rate used when the container reports a non-positive frame rate.
    pub fallback_fps: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            width: AppConfig::DEFAULT_WIDTH,
            fps_override: None,
            color: ColorMode::None,
            max_frames: None,
            fallback_fps: AppConfig::DEFAULT_FALLBACK_FPS,
        }
    }
}

impl PlaybackConfig {
    /// Reject settings that must not reach the playback loop.
    pub fn validate(&self) -> Result<(), PlayError> {
        if self.width == 0 {
            return Err(PlayError::ConfigInvalid(
                "width must be at least 1 column".into(),
            ));
        }
        if self.fps_override == Some(0) {
            return Err(PlayError::ConfigInvalid(
                "fps override must be positive (omit it to use the source rate)".into(),
            ));
        }
        if self.max_frames == Some(0) {
            return Err(PlayError::ConfigInvalid(
                "frame cap must be positive (omit it for unlimited playback)".into(),
            ));
        }
        if self.fallback_fps == 0 {
            return Err(PlayError::ConfigInvalid(
                "fallback fps must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn default_width() -> u32 {
    AppConfig::DEFAULT_WIDTH
}

fn default_fallback_fps() -> u32 {
    AppConfig::DEFAULT_FALLBACK_FPS
}

/// Application defaults, optionally overridden by a `playscii.json` file.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Columns used when the user does not pick a width.
    #[serde(default = "default_width")]
    pub default_width: u32,
    /// Rate used when the container reports no usable frame rate.
    #[serde(default = "default_fallback_fps")]
    pub fallback_fps: u32,
}

impl AppConfig {
    pub const DEFAULT_WIDTH: u32 = 80;
    pub const DEFAULT_FALLBACK_FPS: u32 = 30;
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_width: Self::DEFAULT_WIDTH,
            fallback_fps: Self::DEFAULT_FALLBACK_FPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.default_width, 80);
        assert_eq!(cfg.fallback_fps, 30);
    }

    #[test]
    fn app_config_partial_json_takes_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"default_width": 120}"#).unwrap();
        assert_eq!(cfg.default_width, 120);
        assert_eq!(cfg.fallback_fps, 30);
    }

    #[test]
    fn playback_config_rejects_zero_width() {
        let config = PlaybackConfig {
            width: 0,
            ..PlaybackConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlayError::ConfigInvalid(_))));
    }

    #[test]
    fn playback_config_default_is_valid() {
        assert!(PlaybackConfig::default().validate().is_ok());
    }
}

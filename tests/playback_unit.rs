//! Playback driver tests over a synthetic frame source.
//!
//! These run the real loop (clear, styled draw, cap, interrupt) against an
//! in-memory source and writer — no ffmpeg, no TTY.

use image::DynamicImage;
use playscii::{
    play_file, player::play, FrameSource, GreenAccent, Outcome, Plain, PlayError, PlaybackConfig,
    Terminal,
};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

const CLEAR: &str = "\x1b[2J";

/// Yields a fixed number of uniform frames, then end of stream.
struct ScriptedSource {
    frames: Vec<DynamicImage>,
    cursor: usize,
    fps: f64,
}

impl ScriptedSource {
    fn uniform(count: usize, level: u8) -> Self {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([level, level, level]));
        Self {
            frames: vec![DynamicImage::ImageRgb8(img); count],
            cursor: 0,
            fps: 1000.0, // keep per-frame sleeps negligible in tests
        }
    }

    fn decoded(&self) -> usize {
        self.cursor
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> io::Result<Option<DynamicImage>> {
        match self.frames.get(self.cursor) {
            Some(frame) => {
                self.cursor += 1;
                Ok(Some(frame.clone()))
            }
            None => Ok(None),
        }
    }

    fn nominal_fps(&self) -> f64 {
        self.fps
    }
}

fn config() -> PlaybackConfig {
    PlaybackConfig {
        width: 4,
        ..PlaybackConfig::default()
    }
}

// ==================== Frame cap ====================

#[test]
fn frame_cap_renders_exactly_n_frames() {
    let mut source = ScriptedSource::uniform(10, 0);
    let mut cfg = config();
    cfg.max_frames = Some(3);

    let mut buf = Vec::new();
    let mut term = Terminal::new(&mut buf);
    let outcome = play(
        &mut source,
        &cfg,
        &Plain,
        &mut term,
        &AtomicBool::new(false),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Stopped);
    assert_eq!(source.decoded(), 3);
    let written = String::from_utf8(buf).unwrap();
    assert_eq!(written.matches(CLEAR).count(), 3);
}

#[test]
fn short_stream_ends_before_cap() {
    let mut source = ScriptedSource::uniform(2, 0);
    let mut cfg = config();
    cfg.max_frames = Some(5);

    let mut buf = Vec::new();
    let mut term = Terminal::new(&mut buf);
    let outcome = play(
        &mut source,
        &cfg,
        &Plain,
        &mut term,
        &AtomicBool::new(false),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Ended);
    let written = String::from_utf8(buf).unwrap();
    assert_eq!(written.matches(CLEAR).count(), 2);
}

// ==================== End of stream ====================

#[test]
fn uncapped_playback_runs_to_end_of_stream() {
    let mut source = ScriptedSource::uniform(4, 0);
    let mut buf = Vec::new();
    let mut term = Terminal::new(&mut buf);
    let outcome = play(
        &mut source,
        &config(),
        &Plain,
        &mut term,
        &AtomicBool::new(false),
    )
    .unwrap();

    assert_eq!(outcome, Outcome::Ended);
    assert_eq!(source.decoded(), 4);
}

// ==================== Interrupt ====================

#[test]
fn interrupt_stops_before_the_next_frame() {
    let mut source = ScriptedSource::uniform(10, 0);
    let stop = AtomicBool::new(false);
    stop.store(true, Ordering::SeqCst);

    let mut buf = Vec::new();
    let mut term = Terminal::new(&mut buf);
    let outcome = play(&mut source, &config(), &Plain, &mut term, &stop).unwrap();

    assert_eq!(outcome, Outcome::Interrupted);
    assert_eq!(source.decoded(), 0, "no frame is decoded after the signal");

    let written = String::from_utf8(buf).unwrap();
    assert_eq!(written.matches(CLEAR).count(), 0);
    assert!(written.contains("Playback interrupted."));
    assert!(
        written.contains("\x1b[?25h"),
        "cursor is restored on the interrupted path"
    );
}

// ==================== Styling ====================

#[test]
fn green_accent_wraps_each_block_once() {
    let mut source = ScriptedSource::uniform(2, 200);
    let mut buf = Vec::new();
    let mut term = Terminal::new(&mut buf);
    play(
        &mut source,
        &config(),
        &GreenAccent,
        &mut term,
        &AtomicBool::new(false),
    )
    .unwrap();

    let written = String::from_utf8(buf).unwrap();
    assert_eq!(written.matches("\x1b[32m").count(), 2);
    assert_eq!(written.matches("\x1b[0m").count(), 2);
    // Start escape comes before the block, reset right after it.
    let start = written.find("\x1b[32m").unwrap();
    let reset = written.find("\x1b[0m").unwrap();
    assert!(start < reset);
}

#[test]
fn plain_styler_emits_no_color_escapes() {
    let mut source = ScriptedSource::uniform(2, 200);
    let mut buf = Vec::new();
    let mut term = Terminal::new(&mut buf);
    play(
        &mut source,
        &config(),
        &Plain,
        &mut term,
        &AtomicBool::new(false),
    )
    .unwrap();

    let written = String::from_utf8(buf).unwrap();
    assert_eq!(written.matches("\x1b[32m").count(), 0);
    assert_eq!(written.matches("\x1b[0m").count(), 0);
}

// ==================== Rendered content ====================

#[test]
fn rendered_block_matches_converted_frame() {
    // An 8x8 black frame at width 4 converts to two rows of dots.
    let mut source = ScriptedSource::uniform(1, 0);
    let mut buf = Vec::new();
    let mut term = Terminal::new(&mut buf);
    play(
        &mut source,
        &config(),
        &Plain,
        &mut term,
        &AtomicBool::new(false),
    )
    .unwrap();

    let written = String::from_utf8(buf).unwrap();
    assert!(written.contains("....\n....\n"));
}

// ==================== Config rejection ====================

#[test]
fn zero_width_is_rejected_before_any_rendering() {
    let mut source = ScriptedSource::uniform(3, 0);
    let mut cfg = config();
    cfg.width = 0;

    let mut buf = Vec::new();
    let mut term = Terminal::new(&mut buf);
    let err = play(
        &mut source,
        &cfg,
        &Plain,
        &mut term,
        &AtomicBool::new(false),
    )
    .unwrap_err();

    assert!(matches!(err, PlayError::ConfigInvalid(_)));
    assert_eq!(source.decoded(), 0);
    assert!(buf.is_empty(), "nothing is written for a rejected config");
}

// ==================== Missing source ====================

#[test]
fn missing_file_reports_source_not_found() {
    let path = Path::new("definitely/not/a/video.mp4");
    let err = play_file(path, &PlaybackConfig::default()).unwrap_err();
    match err {
        PlayError::SourceNotFound(p) => assert_eq!(p, path),
        other => panic!("expected SourceNotFound, got {:?}", other),
    }
}

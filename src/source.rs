//! Video decoding via ffmpeg subprocesses.
//!
//! `ffprobe` supplies container metadata (dimensions, native frame rate);
//! `ffmpeg` then streams raw RGB24 frames over a pipe, read one frame at a
//! time. Both binaries must be on `PATH`. The child process is owned
//! exclusively by one [`VideoSource`] and reaped on drop, whichever way
//! playback ends.

use crate::player::FrameSource;
use crate::PlayError;
use image::{DynamicImage, RgbImage};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Metadata reported by the container's first video stream.
#[derive(Debug, Clone, Copy)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Native frame rate; non-positive when the container reports none.
    pub fps: f64,
}

/// Probe a container with ffprobe.
///
/// # Errors
/// `DecoderMissing` when ffprobe is not installed; `SourceNotFound` when the
/// path is missing or holds no decodable video stream.
pub fn probe(path: &Path) -> Result<VideoInfo, PlayError> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("stream=width,height,r_frame_rate")
        .arg("-of")
        .arg("csv=p=0")
        .arg(path)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                PlayError::DecoderMissing("ffprobe")
            } else {
                PlayError::Io(e)
            }
        })?;

    if !output.status.success() {
        return Err(PlayError::SourceNotFound(path.to_path_buf()));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let info = parse_probe_output(&text)
        .ok_or_else(|| PlayError::SourceNotFound(path.to_path_buf()))?;

    log::info!(
        "probed {}: {}x{} @ {:.3} fps",
        path.display(),
        info.width,
        info.height,
        info.fps
    );
    Ok(info)
}

/// Parse one `width,height,r_frame_rate` csv line from ffprobe.
fn parse_probe_output(text: &str) -> Option<VideoInfo> {
    let line = text.lines().find(|l| !l.trim().is_empty())?;
    let mut fields = line.trim().split(',');
    let width: u32 = fields.next()?.trim().parse().ok()?;
    let height: u32 = fields.next()?.trim().parse().ok()?;
    let fps = fields.next().map(parse_rate).unwrap_or(0.0);
    if width == 0 || height == 0 {
        return None;
    }
    Some(VideoInfo { width, height, fps })
}

/// Parse a rational frame rate such as `24/1` or `30000/1001`.
/// Returns 0.0 for malformed or zero-denominator values.
fn parse_rate(s: &str) -> f64 {
    let mut parts = s.trim().splitn(2, '/');
    let num: f64 = parts.next().and_then(|v| v.parse().ok()).unwrap_or(0.0);
    let den: f64 = parts.next().and_then(|v| v.parse().ok()).unwrap_or(1.0);
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Read exactly `buf.len()` bytes, tolerating short reads.
///
/// Returns `Ok(true)` on a complete read and `Ok(false)` on EOF. EOF in the
/// middle of a frame is also end of stream (a truncated tail frame is
/// dropped, not rendered).
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => {
                if total > 0 {
                    log::debug!("dropping truncated tail frame ({} bytes)", total);
                }
                return Ok(false);
            }
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// A playable video file: probed metadata plus a running ffmpeg decode pipe.
pub struct VideoSource {
    child: Child,
    stdout: ChildStdout,
    info: VideoInfo,
    frame_len: usize,
}

impl VideoSource {
    /// Open a container for frame-by-frame decoding.
    ///
    /// # Errors
    /// `SourceNotFound` when the path is missing or not a readable video;
    /// `DecoderMissing` when ffprobe/ffmpeg is not installed.
    pub fn open(path: &Path) -> Result<Self, PlayError> {
        if !path.is_file() {
            return Err(PlayError::SourceNotFound(path.to_path_buf()));
        }
        let info = probe(path)?;

        let mut child = Command::new("ffmpeg")
            .arg("-i")
            .arg(path)
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("-an")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("pipe:1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    PlayError::DecoderMissing("ffmpeg")
                } else {
                    PlayError::Io(e)
                }
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PlayError::Io(io::Error::other("ffmpeg stdout not captured")))?;

        Ok(Self {
            child,
            stdout,
            frame_len: info.width as usize * info.height as usize * 3,
            info,
        })
    }

    /// Probed container metadata.
    pub fn info(&self) -> VideoInfo {
        self.info
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> io::Result<Option<DynamicImage>> {
        let mut buf = vec![0u8; self.frame_len];
        if !read_exact_or_eof(&mut self.stdout, &mut buf)? {
            log::info!("decode pipe reached end of stream");
            return Ok(None);
        }
        let frame = RgbImage::from_raw(self.info.width, self.info.height, buf)
            .ok_or_else(|| io::Error::other("frame buffer does not match probed dimensions"))?;
        Ok(Some(DynamicImage::ImageRgb8(frame)))
    }

    fn nominal_fps(&self) -> f64 {
        self.info.fps
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        // The pipe may still be mid-stream; kill before reaping.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

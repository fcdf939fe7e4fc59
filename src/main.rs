use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use dialoguer::{FuzzySelect, Input};
use playscii::{
    install_interrupt_handler, play_file, AppConfig, ColorMode, Outcome, PlaybackConfig,
};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

fn load_config() -> Result<AppConfig> {
    // Look for playscii.json in app support, current dir fallback, then built-in default
    let mut tried: Vec<PathBuf> = Vec::new();
    if let Some(mut d) = dirs::data_dir() {
        d.push("playscii");
        d.push("playscii.json");
        tried.push(d);
    }
    tried.push(PathBuf::from("playscii.json"));

    for p in &tried {
        if p.exists() {
            let text =
                fs::read_to_string(p).with_context(|| format!("reading config {}", p.display()))?;
            let cfg: AppConfig = serde_json::from_str(&text).context("parsing config json")?;
            return Ok(cfg);
        }
    }

    Ok(AppConfig::default())
}

/// Accent color applied to rendered frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum ColorArg {
    #[default]
    None,
    Green,
}

impl From<ColorArg> for ColorMode {
    fn from(c: ColorArg) -> Self {
        match c {
            ColorArg::None => ColorMode::None,
            ColorArg::Green => ColorMode::Green,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Play a video in the terminal as ASCII art.")]
struct Args {
    /// Input video file
    video: Option<PathBuf>,

    /// Target character columns
    #[arg(long, short)]
    width: Option<u32>,

    /// Playback FPS override; values <= 0 use the source rate
    #[arg(long, allow_negative_numbers = true)]
    fps: Option<i32>,

    /// Accent color for rendered frames
    #[arg(long, value_enum, default_value = "none")]
    color: ColorArg,

    /// Stop after this many frames (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_frames: u64,

    /// Log filter (warn by default; playback owns the terminal)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    let cfg = load_config()?;

    // --- Interactive Prompts ---
    let video = match args.video {
        Some(p) => p,
        None => prompt_for_video()?,
    };
    let width = match args.width {
        Some(w) => w,
        None => prompt_for_width(cfg.default_width)?,
    };

    let config = PlaybackConfig {
        width,
        fps_override: args.fps.filter(|&v| v > 0).map(|v| v as u32),
        color: args.color.into(),
        max_frames: (args.max_frames > 0).then_some(args.max_frames),
        fallback_fps: cfg.fallback_fps,
    };
    config.validate()?;

    if let Err(e) = install_interrupt_handler() {
        log::warn!("could not install Ctrl-C handler: {}", e);
    }

    let outcome =
        play_file(&video, &config).with_context(|| format!("playing {}", video.display()))?;
    log::debug!("playback outcome: {:?}", outcome);
    if outcome == Outcome::Stopped {
        log::info!("stopped at the configured frame cap");
    }

    Ok(())
}

fn prompt_for_video() -> Result<PathBuf> {
    let files = find_media_files()?;
    if !files.is_empty() {
        let selection = FuzzySelect::with_theme(&dialoguer::theme::ColorfulTheme::default())
            .with_prompt("Choose a video file")
            .default(0)
            .items(&files)
            .interact()?;
        return Ok(PathBuf::from(&files[selection]));
    }

    let typed: String = Input::new()
        .with_prompt("Path to video file")
        .allow_empty(true)
        .interact_text()?;
    let typed = typed.trim();
    if typed.is_empty() {
        return Err(anyhow!("no video path provided"));
    }
    Ok(PathBuf::from(typed))
}

/// Prompt for a width; empty or non-numeric input takes the default.
fn prompt_for_width(default: u32) -> Result<u32> {
    let typed: String = Input::new()
        .with_prompt(format!("Columns (width) [{}]", default))
        .allow_empty(true)
        .interact_text()?;
    Ok(typed.trim().parse().unwrap_or(default))
}

fn find_media_files() -> Result<Vec<String>> {
    Ok(WalkDir::new(".")
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path().is_file()
                && e.path().extension().is_some_and(|ext| {
                    matches!(ext.to_str(), Some("mp4" | "mkv" | "mov" | "avi" | "webm"))
                })
        })
        .map(|e| e.path().to_str().unwrap_or("").to_string())
        .collect())
}

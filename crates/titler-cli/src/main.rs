use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use titler_core::{CueIndex, Strictness, TitlerConfig};
use titler_encode::{decode_gif, GifEncoder};
use titler_render::{CaptionRenderer, FontParams, OutlineFont};

#[derive(Parser, Debug)]
#[command(
    name = "giftitler",
    version,
    about = "Burn SubRip subtitles into an animated GIF",
    long_about = "Reads an animated GIF and a SubRip (.srt) file, works out which subtitles are on screen\nduring each frame, and draws them onto the frames as outlined white text."
)]
struct Cli {
    /// Path to the font to use
    #[arg(long)]
    font: Option<PathBuf>,

    /// Path to the subtitles file to pull text from
    #[arg(long)]
    subtitles: Option<PathBuf>,

    /// Timestamp of the subtitles the GIF starts from (e.g. 1m30s or 00:01:30,000)
    #[arg(long)]
    subtitles_offset: Option<String>,

    /// Path to the source GIF
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Path to write the result to [default: output.gif]
    #[arg(long)]
    out: Option<PathBuf>,

    /// Font size in points; 0 picks a size that fits the longest line
    #[arg(long)]
    font_size: Option<f32>,

    /// DPI to render text at [default: 72]
    #[arg(long)]
    font_dpi: Option<f32>,

    /// Weight of the text outline in pixels [default: 3]
    #[arg(long)]
    font_stroke_weight: Option<u32>,

    /// How to treat malformed subtitles: strict, lenient, skip-invalid [default: skip-invalid]
    #[arg(long)]
    strictness: Option<Strictness>,

    /// TOML file with defaults for any of the options above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resolved configuration to this path and exit
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();

    let mut config = match &cli.config {
        Some(path) => TitlerConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => TitlerConfig::default(),
    };
    apply_overrides(&mut config, &cli);
    expand_paths(&mut config);

    if let Some(path) = &cli.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("failed to write config: {}", path.display()))?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    config.validate()?;
    let offset = config.offset()?;
    let (Some(gif_path), Some(subs_path), Some(font_path)) =
        (&config.gif, &config.subtitles, &config.font)
    else {
        anyhow::bail!("gif, subtitles and font paths are required");
    };

    let mut frames = decode_gif(gif_path)
        .with_context(|| format!("failed to read GIF: {}", gif_path.display()))?;
    let cues = titler_srt::read_srt(subs_path, config.strictness)
        .with_context(|| format!("failed to read subtitles: {}", subs_path.display()))?;
    let face = OutlineFont::load(font_path)
        .with_context(|| format!("failed to load font: {}", font_path.display()))?;
    tracing::debug!("Loaded font {:?}", face.name());

    let font = FontParams::new(config.font_size, config.font_dpi, config.font_stroke_weight);
    let renderer = CaptionRenderer::new(Arc::new(face), font);
    let summary = renderer
        .render_sequence(&mut frames, &CueIndex::new(cues), offset)
        .context("failed to render captions")?;

    if summary.overflowed_lines > 0 {
        tracing::warn!(
            "{} caption line(s) were wider than the frame; try a smaller --font-size",
            summary.overflowed_lines
        );
    }

    GifEncoder::encode(&frames, &config.out, None)
        .with_context(|| format!("failed to write GIF: {}", config.out.display()))?;

    println!(
        "Captioned {} of {} frames at {:.2}pt -> {} ({:.2?})",
        summary.captioned,
        summary.frames,
        summary.font_size,
        config.out.display(),
        start.elapsed(),
    );
    Ok(())
}

/// Command-line flags win over values from the config file.
fn apply_overrides(config: &mut TitlerConfig, cli: &Cli) {
    if let Some(font) = &cli.font {
        config.font = Some(font.clone());
    }
    if let Some(subtitles) = &cli.subtitles {
        config.subtitles = Some(subtitles.clone());
    }
    if let Some(gif) = &cli.gif {
        config.gif = Some(gif.clone());
    }
    if let Some(out) = &cli.out {
        config.out = out.clone();
    }
    if let Some(offset) = &cli.subtitles_offset {
        config.subtitles_offset = offset.clone();
    }
    if let Some(size) = cli.font_size {
        config.font_size = size;
    }
    if let Some(dpi) = cli.font_dpi {
        config.font_dpi = dpi;
    }
    if let Some(weight) = cli.font_stroke_weight {
        config.font_stroke_weight = weight;
    }
    if let Some(strictness) = cli.strictness {
        config.strictness = strictness;
    }
}

/// Expand `$VAR` / `${VAR}` in the input paths. Unset variables expand to
/// nothing.
fn expand_paths(config: &mut TitlerConfig) {
    for path in [&mut config.font, &mut config.subtitles, &mut config.gif]
        .into_iter()
        .flatten()
    {
        *path = expand_env(path);
    }
}

fn expand_env(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::env_with_context_no_errors(&raw, |var| {
        Some(std::env::var(var).unwrap_or_default())
    });
    PathBuf::from(expanded.as_ref())
}

//! Solar disk masking tool.
//!
//! Loads a full-disk solar image (FITS), masks every pixel on the solar disk
//! and renders the remaining off-disk emission to a PNG with the limb drawn.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use disk_mask::sample::{load_map, load_sample};
use disk_mask::mask_disk;
use renderer::{draw_limb, render_map, write_png};
use solar_common::{Color, Scaling};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{MaskConfig, Overrides};

#[derive(Parser, Debug)]
#[command(name = "mask-disk")]
#[command(about = "Mask the solar disk and render the off-disk emission")]
struct Args {
    /// FITS file to mask (default: the sample image)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Sample image used when no input file is given
    #[arg(long, default_value = "aia171")]
    sample: String,

    /// Output PNG path
    #[arg(short, long, default_value = "masked_disk.png")]
    output: PathBuf,

    /// YAML configuration file
    #[arg(short, long, env = "MASK_DISK_CONFIG")]
    config: Option<PathBuf>,

    /// Normalized radius at or below which pixels are masked
    #[arg(long)]
    threshold: Option<f64>,

    /// Color of masked pixels (hex or name)
    #[arg(long)]
    bad_color: Option<Color>,

    /// Colormap name
    #[arg(long)]
    colormap: Option<String>,

    /// Value scaling: linear, log or asinh
    #[arg(long)]
    scaling: Option<Scaling>,

    /// Do not draw the solar limb
    #[arg(long)]
    no_limb: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            threshold: self.threshold,
            bad_color: self.bad_color,
            colormap: self.colormap.clone(),
            scaling: self.scaling,
            no_limb: self.no_limb,
        }
    }
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting solar disk masking");

    run(&args)?;
    Ok(())
}

/// Load, mask, render and write. Returns the number of PNG bytes written.
fn run(args: &Args) -> Result<usize> {
    let config = MaskConfig::load(args.config.as_deref())?.with_overrides(&args.overrides());
    config.validate()?;

    let map = match &args.input {
        Some(path) => load_map(path)
            .with_context(|| format!("Failed to load solar image {}", path.display()))?,
        None => load_sample(&args.sample)
            .with_context(|| format!("Failed to load sample image '{}'", args.sample))?,
    };

    let masked = mask_disk(&map, &config.mask_options()).context("Failed to mask solar disk")?;
    let display = config.display_for(&masked)?;

    let mut image = render_map(&masked, &display).context("Failed to render map")?;
    if config.draw_limb {
        draw_limb(&mut image, &masked, &config.limb_style()).context("Failed to draw limb")?;
    }

    let bytes = write_png(&args.output, &image)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        bytes,
        masked = masked.mask().map(|m| m.count_masked()).unwrap_or(0),
        threshold = config.threshold,
        colormap = %config.colormap,
        "Wrote masked image"
    );
    Ok(bytes)
}

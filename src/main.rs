// src/main.rs

//! `bitfont-extract`: build font descriptors from bitmap font images.
//!
//! Interactive mode browses the image on a grid and assigns characters to
//! cells (commands on stdin). With `--strip-order` a separator-delimited
//! glyph strip is imported in one go instead.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use bitfont::config::{Config, CONFIG};
use bitfont::extractor::{session, Extractor};
use bitfont::platform::ConsolePlatform;
use bitfont::strip::import_separated_strip;
use bitfont::{GraphicsHost, Rgba, SoftwareHost};

#[derive(Parser, Debug)]
#[command(name = "bitfont-extract", about = "Extract bitmap font descriptors from glyph images")]
struct Cli {
    /// Image with the font characters.
    #[arg(long)]
    img: PathBuf,

    /// Output descriptor (defaults to the image name with a .json extension).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Initial grid rows.
    #[arg(long)]
    rows: Option<usize>,

    /// Initial grid columns.
    #[arg(long)]
    cols: Option<usize>,

    /// Configuration file (otherwise $BITFONT_CONFIG, otherwise defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of character groups; imports IMG as a separator strip.
    #[arg(long)]
    strip_order: Option<PathBuf>,

    /// Separator color of a glyph strip.
    #[arg(long, default_value = "#7F7F7F")]
    separator: Rgba,
}

fn default_out_path(img: &Path) -> PathBuf {
    let stem = img.file_stem().map(|s| s.to_os_string()).unwrap_or_else(|| "font".into());
    PathBuf::from(stem).with_extension("json")
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration '{}'", path.display()))?,
        None => CONFIG.clone(),
    };
    if let Some(rows) = cli.rows {
        config.grid.rows = rows;
    }
    if let Some(cols) = cli.cols {
        config.grid.cols = cols;
    }
    Ok(config)
}

fn import_strip(cli: &Cli, order_path: &Path, out: &Path) -> Result<()> {
    let order_text = fs::read_to_string(order_path)
        .with_context(|| format!("Failed to read character order '{}'", order_path.display()))?;
    let order: Vec<String> = serde_json::from_str(&order_text)
        .with_context(|| format!("'{}' is not a JSON array of strings", order_path.display()))?;

    let image = SoftwareHost
        .decode_image(&cli.img)
        .with_context(|| format!("Failed to load font image '{}'", cli.img.display()))?;
    let descriptor = import_separated_strip(&image, &cli.img, cli.separator, &order)
        .context("Strip import failed")?;
    descriptor
        .save(out)
        .with_context(|| format!("Failed to save '{}'", out.display()))?;
    info!("Imported {} glyphs into '{}'", descriptor.glyphs.len(), out.display());
    Ok(())
}

/// Main entry point for `bitfont-extract`.
fn main() -> Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let out = cli.out.clone().unwrap_or_else(|| default_out_path(&cli.img));
    info!("Starting bitfont-extract on '{}' -> '{}'", cli.img.display(), out.display());

    if let Some(order_path) = &cli.strip_order {
        return import_strip(&cli, order_path, &out);
    }

    let config = load_config(&cli)?;
    if config.grid.rows == 0 || config.grid.cols == 0 {
        bail!("Grid resolution must be at least 1x1");
    }

    let mut extractor = Extractor::open(&SoftwareHost, &cli.img, out, &config)
        .with_context(|| format!("Failed to open '{}' for extraction", cli.img.display()))?;
    let mut platform = ConsolePlatform::stdio(config.view.preview_path.clone());

    session::run(&mut platform, &mut extractor, &config.view).context("Extraction session failed")?;

    info!("bitfont-extract exited cleanly.");
    Ok(())
}

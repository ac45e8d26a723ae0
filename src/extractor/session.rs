// src/extractor/session.rs

//! The tool's frame loop: poll, update, present.

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::ViewConfig;
use crate::extractor::view;
use crate::extractor::{Extractor, ToolStatus};
use crate::platform::ToolPlatform;

/// Runs until the extractor reports `Shutdown`.
///
/// A failing save aborts the session with an error; the platform is cleaned
/// up either way.
pub fn run<P: ToolPlatform + ?Sized>(
    platform: &mut P,
    extractor: &mut Extractor,
    view_config: &ViewConfig,
) -> Result<()> {
    info!("Extraction session started, output '{}'", extractor.out_path().display());
    let outcome = event_loop(platform, extractor, view_config);
    let cleanup = platform.cleanup().context("Platform cleanup failed");
    outcome.and(cleanup)
}

fn event_loop<P: ToolPlatform + ?Sized>(
    platform: &mut P,
    extractor: &mut Extractor,
    view_config: &ViewConfig,
) -> Result<()> {
    platform
        .present(&view::frame(extractor, view_config))
        .context("Failed to present initial frame")?;

    loop {
        let inputs = platform.poll_events().context("Failed to poll tool input")?;
        if inputs.is_empty() {
            continue;
        }
        for input in &inputs {
            let status = extractor
                .handle(input)
                .with_context(|| format!("Failed to handle {:?}", input))?;
            if status == ToolStatus::Shutdown {
                debug!("Shutdown requested");
                return Ok(());
            }
        }
        platform
            .present(&view::frame(extractor, view_config))
            .context("Failed to present frame")?;
    }
}

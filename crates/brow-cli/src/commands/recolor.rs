//! Recolor command
//!
//! Runs the whole pipeline on one capture and writes the composited photo.
//! Recoverable pipeline errors are printed, not fatal.

use crate::RecolorArgs;
use anyhow::{bail, Context, Result};
use brow_pipeline::{CaptureInputs, ColorChanger, Detectors, PartColors, RenderContext};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

pub fn run(args: RecolorArgs, verbose: u8, threads: Option<usize>) -> Result<()> {
    trace!(photo = %args.photo.display(), output = %args.output.display(), "recolor::run");

    let mut config = super::load_config(args.config.as_deref())?;
    if args.thicken {
        config.thicken.enabled = true;
    }
    if threads.is_some() {
        config.threads = threads;
    }
    if let Some(c) = args.min {
        config.colors.min = c;
    }
    if let Some(c) = args.mode {
        config.colors.mode = c;
    }
    if let Some(c) = args.max {
        config.colors.max = c;
    }
    debug!(?config, "effective configuration");

    let ctx = RenderContext::new(config).context("Invalid configuration")?;
    let landmarks = super::load_landmarks(&args.landmarks)?;
    let mut inputs = CaptureInputs::new(
        super::load_image(&args.photo)?,
        super::load_matte(&args.hair)?,
        super::load_matte(&args.skin)?,
    );
    if let Some(p) = &args.portrait {
        inputs = inputs.with_portrait(super::load_matte(p)?);
    }

    if verbose > 0 {
        println!("Recoloring {} ({} threads)", args.photo.display(), ctx.threads());
    }

    let colors = PartColors::from_config(ctx.config());
    let mut changer = ColorChanger::new(Detectors::shared(Arc::new(landmarks)));
    let image = match changer.process(&ctx, inputs, &colors) {
        Ok(image) => image,
        Err(errors) => {
            for e in &errors {
                eprintln!("error: {e}");
            }
            bail!("No image produced for {}", args.photo.display());
        }
    };

    for e in changer.drain_errors() {
        warn!("{e}");
        eprintln!("warning: {e}");
    }

    super::save_image(&args.output, &image)?;
    info!(output = %args.output.display(), w = image.width(), h = image.height(), "recolored image written");

    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}

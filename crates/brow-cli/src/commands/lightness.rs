//! Lightness command
//!
//! Prints the (min, mode, max) lightness of an image, optionally cut out by a
//! matte first.

use crate::LightnessArgs;
use anyhow::{Context, Result};
use brow_ops::composite::cut_out;
use brow_ops::resize::resize_matte;
use brow_ops::Filter;
use brow_pipeline::LightnessProfiler;
use tracing::trace;

pub fn run(args: LightnessArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), batch_size = args.batch_size, "lightness::run");

    let image = super::load_image(&args.input)?;
    let cutout = match &args.matte {
        Some(path) => {
            let mut matte = super::load_matte(path)?;
            let (w, h) = image.dimensions();
            if matte.dimensions() != (w, h) {
                matte = resize_matte(&matte, w, h, Filter::Bilinear)?;
            }
            cut_out(&image, &matte)?
        }
        None => image,
    };

    let profiler = LightnessProfiler::new(args.batch_size.max(1));
    let triple = profiler
        .profile(&cutout)
        .context("Failed to profile lightness")?;

    if verbose > 0 {
        println!("{}:", args.input.display());
    }
    println!("min  {:.4}", triple.min);
    println!("mode {:.4}", triple.mode);
    println!("max  {:.4}", triple.max);
    Ok(())
}

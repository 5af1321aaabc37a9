//! Matte command
//!
//! Builds the eyebrow matte from hair/skin mattes and a landmark file, without
//! touching any photo.

use crate::MatteArgs;
use anyhow::{bail, Context, Result};
use brow_ops::composite::multiply_mattes;
use brow_ops::resize::resize_matte;
use brow_ops::Filter;
use brow_pipeline::matte::{eyebrow_matte, MatteMode};
use brow_pipeline::EyebrowLandmarks;
use tracing::{info, trace};

pub fn run(args: MatteArgs, verbose: u8) -> Result<()> {
    trace!(landmarks = %args.landmarks.display(), output = %args.output.display(), "matte::run");

    let config = super::load_config(args.config.as_deref())?;
    let mode = if args.per_side {
        MatteMode::PerSide
    } else {
        config.matte_mode
    };

    let hair = super::load_matte(&args.hair)?;
    let (w, h) = hair.dimensions();
    let mut skin = super::load_matte(&args.skin)?;
    if skin.dimensions() != (w, h) {
        skin = resize_matte(&skin, w, h, Filter::Bilinear)?;
    }

    let file = super::load_landmarks(&args.landmarks)?;
    if !file.has_face() {
        bail!("{}: no eyebrow landmarks", args.landmarks.display());
    }
    let landmarks = EyebrowLandmarks {
        right: file.scaled_points(&file.right, (w, h)),
        left: file.scaled_points(&file.left, (w, h)),
    };
    let roll = file.roll.unwrap_or(0.0);

    let mut matte = eyebrow_matte(&hair, &skin, &landmarks, roll, &config.expansion, mode)
        .context("Failed to build eyebrow matte")?;
    if let Some(p) = &args.portrait {
        let mut portrait = super::load_matte(p)?;
        if portrait.dimensions() != (w, h) {
            portrait = resize_matte(&portrait, w, h, Filter::Bilinear)?;
        }
        matte = multiply_mattes(&matte, &portrait)?;
    }

    super::save_matte(&args.output, &matte)?;
    let covered = matte.coverage(0.5);
    info!(?mode, covered, "eyebrow matte written");

    if verbose > 0 {
        println!("{covered} pixels above 0.5 -> {}", args.output.display());
    }
    Ok(())
}

//! Eyebrow matte construction.
//!
//! Inside the eyebrow boundary the matte is the hair-over-skin differential
//! `clamp(hair - skin, 0, 1)`; outside it is zero. Pixels are tested at
//! their centers.

use brow_core::Matte;
use brow_math::eyebrow::{combined_boundary, single_boundary};
use brow_math::{average, Boundary, BoundaryKind, Point};
use brow_ops::composite::add_mattes;
use brow_ops::{OpsError, OpsResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ExpansionConfig;
use crate::detect::EyebrowLandmarks;
use crate::PipelineResult;

/// How the two eyebrows become cutout regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatteMode {
    /// One boundary around both eyebrows, stitched and junction-corrected.
    #[default]
    Stitched,
    /// One boundary per eyebrow, mattes added.
    PerSide,
}

/// Matte of `hair - skin` restricted to `boundary`.
pub fn boundary_matte(hair: &Matte, skin: &Matte, boundary: &Boundary) -> OpsResult<Matte> {
    hair.ensure_same_size(skin.dimensions())?;
    let shape = match boundary.kind() {
        BoundaryKind::Single => "single eyebrow",
        BoundaryKind::Combined12 => "stitched",
        BoundaryKind::Combined11 => "stitched, one junction corrected",
        BoundaryKind::Combined10 => "stitched, both junctions corrected",
    };
    trace!(vertices = boundary.len(), shape, "building boundary matte");

    let (lo, hi) = boundary.bounds();
    let (w, h) = hair.dimensions();
    Ok(Matte::from_fn(w, h, |x, y| {
        let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
        if p.x < lo.x || p.x > hi.x || p.y < lo.y || p.y > hi.y || !boundary.contains(p) {
            return 0.0;
        }
        (hair.get(x, y) - skin.get(x, y)).clamp(0.0, 1.0)
    }))
}

/// Builds the eyebrow matte from both landmark sets.
///
/// `roll` is the face roll in radians; expansion happens in the de-rolled
/// frame.
pub fn eyebrow_matte(
    hair: &Matte,
    skin: &Matte,
    landmarks: &EyebrowLandmarks,
    roll: f64,
    expansion: &ExpansionConfig,
    mode: MatteMode,
) -> PipelineResult<Matte> {
    let params = expansion.with_angle(roll);
    debug!(?mode, roll, rate = params.rate, aspect = params.aspect, "building eyebrow matte");
    if let (Some(r), Some(l)) = (average(&landmarks.right), average(&landmarks.left)) {
        debug!(right = ?r, left = ?l, spacing = r.distance(l), "eyebrow centroids");
    }
    let matte = match mode {
        MatteMode::Stitched => {
            let boundary = combined_boundary(&landmarks.right, &landmarks.left, &params)?;
            boundary_matte(hair, skin, &boundary)?
        }
        MatteMode::PerSide => {
            let right = single_boundary(&landmarks.right, &params)?;
            let left = single_boundary(&landmarks.left, &params)?;
            add_mattes(
                &boundary_matte(hair, skin, &right)?,
                &boundary_matte(hair, skin, &left)?,
            )?
        }
    };
    Ok(matte)
}

/// Brings a matte to `dims`, bilinear.
pub(crate) fn conform(matte: &Matte, dims: (u32, u32)) -> OpsResult<Matte> {
    if matte.dimensions() == dims {
        return Ok(matte.clone());
    }
    if dims.0 == 0 || dims.1 == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "cannot resize matte to {}x{}",
            dims.0, dims.1
        )));
    }
    brow_ops::resize::resize_matte(matte, dims.0, dims.1, brow_ops::Filter::Bilinear)
}

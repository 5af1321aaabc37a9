//! Per face part recoloring state.
//!
//! A [`PartColorist`] is filled in three steps: the part image (a grayscale
//! cutout), its lightness triple and a color triple. Whenever all three are
//! present the recolored layer is rebuilt; otherwise it is cleared.

use brow_core::{Image, Matte, Rgba};
use brow_ops::color::{color_map, grayscale};
use brow_ops::composite::cut_out;
use brow_ops::gradient::DEFAULT_GRADIENT_WIDTH;
use brow_ops::{GradientMap, OpsResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::lightness::LightnessTriple;

/// Colors for the darkest, most common and brightest lightness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorTriple {
    /// Color at the minimum lightness.
    pub min: Rgba,
    /// Color at the mode lightness.
    pub mode: Rgba,
    /// Color at the maximum lightness.
    pub max: Rgba,
}

impl ColorTriple {
    /// Builds a triple.
    pub const fn new(min: Rgba, mode: Rgba, max: Rgba) -> Self {
        Self { min, mode, max }
    }

    /// The colors in stop order.
    pub fn colors(&self) -> [Rgba; 3] {
        [self.min, self.mode, self.max]
    }
}

impl Default for ColorTriple {
    /// Dark ash brown.
    fn default() -> Self {
        Self {
            min: [0.05, 0.04, 0.035, 1.0],
            mode: [0.22, 0.16, 0.12, 1.0],
            max: [0.45, 0.36, 0.28, 1.0],
        }
    }
}

/// How far a [`PartColorist`] has been filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColoristState {
    /// Nothing set.
    Empty,
    /// Part image set.
    HasPart,
    /// Lightness set, no colors yet.
    HasLightness,
    /// Colors set but the layer is not built.
    HasColor,
    /// Recolored layer available.
    Ready,
}

/// Recolors one face part through a three-stop gradient map.
#[derive(Debug, Clone)]
pub struct PartColorist {
    gradient_width: usize,
    part: Option<Image>,
    lightness: Option<LightnessTriple>,
    colors: Option<ColorTriple>,
    colored: Option<Image>,
}

impl Default for PartColorist {
    fn default() -> Self {
        Self::new(DEFAULT_GRADIENT_WIDTH)
    }
}

impl PartColorist {
    /// Empty colorist whose gradients are `gradient_width` samples wide.
    pub fn new(gradient_width: usize) -> Self {
        Self {
            gradient_width,
            part: None,
            lightness: None,
            colors: None,
            colored: None,
        }
    }

    /// Cuts `matte` out of `photo`, converts it to grayscale and stores it as
    /// the part image.
    pub fn setup_photo(&mut self, photo: &Image, matte: &Matte) -> OpsResult<()> {
        trace!("colorist::setup_photo");
        let part = grayscale(&cut_out(photo, matte)?);
        self.setup_part(part)
    }

    /// Stores an already prepared grayscale part image.
    pub fn setup_part(&mut self, part: Image) -> OpsResult<()> {
        self.part = Some(part);
        self.rebuild()
    }

    /// Stores the lightness triple.
    pub fn setup_lightness(&mut self, lightness: LightnessTriple) -> OpsResult<()> {
        self.lightness = Some(lightness);
        self.rebuild()
    }

    /// Stores the color triple.
    pub fn setup_color(&mut self, colors: ColorTriple) -> OpsResult<()> {
        self.colors = Some(colors);
        self.rebuild()
    }

    fn rebuild(&mut self) -> OpsResult<()> {
        self.colored = None;
        let (Some(part), Some(lightness), Some(colors)) =
            (&self.part, &self.lightness, &self.colors)
        else {
            return Ok(());
        };
        let gradient =
            GradientMap::three_stop(self.gradient_width, lightness.stops(), colors.colors())?;
        debug!(
            min = lightness.min,
            mode = lightness.mode,
            max = lightness.max,
            "recoloring part"
        );
        self.colored = Some(color_map(part, &gradient));
        Ok(())
    }

    /// Furthest step reached.
    pub fn state(&self) -> ColoristState {
        if self.colored.is_some() {
            ColoristState::Ready
        } else if self.colors.is_some() {
            ColoristState::HasColor
        } else if self.lightness.is_some() {
            ColoristState::HasLightness
        } else if self.part.is_some() {
            ColoristState::HasPart
        } else {
            ColoristState::Empty
        }
    }

    /// Grayscale part image.
    pub fn part(&self) -> Option<&Image> {
        self.part.as_ref()
    }

    /// Stored lightness.
    pub fn lightness(&self) -> Option<LightnessTriple> {
        self.lightness
    }

    /// Stored colors.
    pub fn colors(&self) -> Option<ColorTriple> {
        self.colors
    }

    /// Recolored layer.
    pub fn colored(&self) -> Option<&Image> {
        self.colored.as_ref()
    }

    /// Drops everything except the gradient width.
    pub fn clear(&mut self) {
        *self = Self::new(self.gradient_width);
    }
}

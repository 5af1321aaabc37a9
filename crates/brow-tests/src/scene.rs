//! Synthetic face captures.
//!
//! A 120x100 frame with a scalp ellipse at the top and two eyebrow bands
//! below it. The bands mix three gray levels so the eyebrow lightness is
//! known in advance: `BROW_DARK`, `BROW_MODE` (most pixels) and `BROW_LIGHT`.

use std::sync::Arc;

use brow_core::{Image, Matte, Rgba};
use brow_io::LandmarkFile;
use brow_math::Point;
use brow_pipeline::{CaptureInputs, Detectors};

/// Frame width.
pub const WIDTH: u32 = 120;
/// Frame height.
pub const HEIGHT: u32 = 100;

/// Background color.
pub const SKIN: Rgba = [0.9, 0.72, 0.6, 1.0];
/// Gray of the scalp hair.
pub const SCALP_GRAY: f32 = 102.0 / 255.0;
/// Darkest eyebrow gray.
pub const BROW_DARK: f32 = 25.0 / 255.0;
/// Most common eyebrow gray.
pub const BROW_MODE: f32 = 51.0 / 255.0;
/// Brightest eyebrow gray.
pub const BROW_LIGHT: f32 = 153.0 / 255.0;

/// Whether the pixel center lies in the scalp ellipse.
pub fn in_scalp(x: u32, y: u32) -> bool {
    let dx = (x as f32 + 0.5 - 60.0) / 50.0;
    let dy = (y as f32 + 0.5 - 10.0) / 12.0;
    dx * dx + dy * dy <= 1.0
}

/// Whether the pixel belongs to one of the eyebrow bands.
pub fn in_brow(x: u32, y: u32) -> bool {
    (40..44).contains(&y) && ((15..36).contains(&x) || (84..105).contains(&x))
}

/// Gray level of an eyebrow pixel.
pub fn brow_gray(x: u32, y: u32) -> f32 {
    if (x + y) % 5 == 0 {
        BROW_LIGHT
    } else if x % 9 == 0 {
        BROW_DARK
    } else {
        BROW_MODE
    }
}

fn gray(v: f32) -> Rgba {
    [v, v, v, 1.0]
}

/// Landmarks outlining both bands, subject's right brow on the image left.
pub fn landmark_file() -> LandmarkFile {
    let right = [(10.0, 40.0), (25.0, 35.0), (40.0, 38.0), (40.0, 45.0), (25.0, 44.0), (10.0, 46.0)];
    let left = right.map(|(x, y)| (120.0 - x, y));
    let to_points = |raw: &[(f64, f64)]| raw.iter().map(|&(x, y)| Point::new(x, y)).collect::<Vec<_>>();
    LandmarkFile::new(Some(0.0), &to_points(&right), &to_points(&left))
}

/// One capture plus the recorded detection for it.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Photo.
    pub photo: Image,
    /// Scalp and eyebrow hair.
    pub hair: Matte,
    /// Complement of `hair`.
    pub skin: Matte,
    /// Whole frame.
    pub portrait: Matte,
    /// Recorded detection.
    pub landmarks: LandmarkFile,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Builds the frame.
    pub fn new() -> Self {
        let photo = Image::from_fn(WIDTH, HEIGHT, |x, y| {
            if in_brow(x, y) {
                gray(brow_gray(x, y))
            } else if in_scalp(x, y) {
                gray(SCALP_GRAY)
            } else {
                SKIN
            }
        });
        let hair = Matte::from_fn(WIDTH, HEIGHT, |x, y| {
            if in_brow(x, y) || in_scalp(x, y) { 1.0 } else { 0.0 }
        });
        let skin = Matte::from_fn(WIDTH, HEIGHT, |x, y| 1.0 - hair.get(x, y));
        Self {
            photo,
            hair,
            skin,
            portrait: Matte::filled(WIDTH, HEIGHT, 1.0),
            landmarks: landmark_file(),
        }
    }

    /// Pipeline inputs.
    pub fn inputs(&self) -> CaptureInputs {
        CaptureInputs::new(self.photo.clone(), self.hair.clone(), self.skin.clone())
            .with_portrait(self.portrait.clone())
    }

    /// Detectors replaying the recorded landmarks.
    pub fn detectors(&self) -> Detectors {
        Detectors::shared(Arc::new(self.landmarks.clone()))
    }
}

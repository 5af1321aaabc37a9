//! # brow-pipeline
//!
//! Recolors hair and eyebrows in a photo, given segmentation mattes and a
//! face/landmark detector.
//!
//! # Modules
//!
//! - [`changer`] - [`ColorChanger`], the orchestrator
//! - [`matte`] - eyebrow matte from landmarks and hair/skin mattes
//! - [`lightness`] - (min, mode, max) lightness of a cutout
//! - [`colorist`] - per part grayscale cutout and gradient remap
//! - [`thicken`] - angular shift-and-stack thickening
//! - [`detect`] - detector traits and the detection deadline
//! - [`config`] - YAML configuration
//! - [`context`] - worker pool shared by every render
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use brow_io::{read_image, read_landmarks, read_matte};
//! use brow_pipeline::{CaptureInputs, ColorChanger, Detectors, PartColors, RenderContext};
//!
//! let ctx = RenderContext::with_defaults()?;
//! let detectors = Detectors::shared(Arc::new(read_landmarks("face.yaml")?));
//! let inputs = CaptureInputs::new(
//!     read_image("photo.png")?,
//!     read_matte("hair.png")?,
//!     read_matte("skin.png")?,
//! );
//! let colors = PartColors::from_config(ctx.config());
//! let mut changer = ColorChanger::new(detectors);
//! match changer.process(&ctx, inputs, &colors) {
//!     Ok(image) => println!("{}x{}", image.width(), image.height()),
//!     Err(errors) => eprintln!("{} errors", errors.len()),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod error;
pub mod changer;
pub mod colorist;
pub mod config;
pub mod context;
pub mod detect;
pub mod lightness;
pub mod matte;
pub mod thicken;

pub use changer::{CaptureInputs, ColorChanger, FacePart, PartColors};
pub use colorist::{ColorTriple, ColoristState, PartColorist};
pub use config::{ExpansionConfig, LightnessConfig, PipelineConfig};
pub use context::RenderContext;
pub use detect::{Detection, Detectors, EyebrowLandmarks, FaceDetector, LandmarkDetector};
pub use error::{ErrorLog, PipelineError, PipelineResult};
pub use lightness::{Histogram, LightnessProfiler, LightnessTriple};
pub use matte::MatteMode;
pub use thicken::ThickenConfig;

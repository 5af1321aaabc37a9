//! Pipeline errors and the accumulating error log.

use std::fmt;
use std::time::Duration;

use brow_math::GeometryError;
use brow_ops::OpsError;
use thiserror::Error;
use tracing::warn;

/// Things that can go wrong while recoloring a photo.
///
/// Most kinds are recoverable: the stage that depends on the missing input is
/// skipped and the rest of the pipeline still runs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Neither detector found a face.
    #[error("There is no human.")]
    NoHumanDetected,

    /// A face was found but its eyebrow landmarks were not.
    #[error("Could not get eyebrow data.")]
    LandmarkDetectionFailed,

    /// The face roll could not be measured; a roll of 0 is used.
    #[error("Could not get face angle.")]
    FaceAngleFailed,

    /// Detection did not answer in time.
    #[error("Face detection timed out after {0:?}.")]
    DetectionTimedOut(Duration),

    /// No portrait (person) matte came with the capture.
    #[error("No object with portrait.")]
    PortraitMatteMissing,

    /// Hair or skin segmentation matte is missing.
    #[error("No object with segmentation.")]
    SegmentationMatteMissing,

    /// The final image has no recolored hair layer.
    #[error("Hair layer is missing.")]
    HairLayerMissing,

    /// The final image has no recolored eyebrow layer.
    #[error("Eyebrow layer is missing.")]
    EyebrowLayerMissing,

    /// Nothing to recolor.
    #[error("No photo.")]
    PhotoMissing,

    /// Landmarks could not be turned into a cutout region.
    #[error("eyebrow geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// An image operator rejected its input.
    #[error("image operation: {0}")]
    Ops(#[from] OpsError),

    /// Configuration could not be parsed.
    #[error("config: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Configuration file could not be read.
    #[error("config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Worker pool could not be created.
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors recorded during a run, oldest first.
#[derive(Debug, Default)]
pub struct ErrorLog {
    errors: Vec<PipelineError>,
}

impl ErrorLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error.
    pub fn push(&mut self, error: impl Into<PipelineError>) {
        let error = error.into();
        warn!(%error, "pipeline error recorded");
        self.errors.push(error);
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Recorded errors, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PipelineError> {
        self.errors.iter()
    }

    /// True if an error matching `pred` was recorded.
    pub fn contains(&self, pred: impl Fn(&PipelineError) -> bool) -> bool {
        self.errors.iter().any(pred)
    }

    /// Removes and returns every recorded error.
    pub fn drain(&mut self) -> Vec<PipelineError> {
        std::mem::take(&mut self.errors)
    }

    /// Removes every recorded error and returns their messages joined by
    /// newlines.
    pub fn take_message(&mut self) -> String {
        let msg = self.to_string();
        self.errors.clear();
        msg
    }

    /// Forgets every recorded error.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl fmt::Display for ErrorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

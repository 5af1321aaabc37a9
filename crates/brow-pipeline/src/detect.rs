//! Face detection boundary.
//!
//! Detection itself is outside this crate. Callers provide a
//! [`FaceDetector`] (face roll) and a [`LandmarkDetector`] (eyebrow points);
//! [`Detectors::detect`] runs both on a worker thread and gives up after a
//! deadline.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use brow_core::Image;
use brow_io::LandmarkFile;
use brow_math::eyebrow::EYEBROW_POINTS;
use brow_math::Point;
use tracing::{debug, info, warn};

use crate::PipelineError;

/// Six landmarks per eyebrow, image pixels, origin top-left.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EyebrowLandmarks {
    /// Subject's right eyebrow.
    pub right: Vec<Point>,
    /// Subject's left eyebrow.
    pub left: Vec<Point>,
}

impl EyebrowLandmarks {
    /// Both eyebrows carry a full landmark set.
    pub fn is_complete(&self) -> bool {
        self.right.len() == EYEBROW_POINTS && self.left.len() == EYEBROW_POINTS
    }
}

/// Measures the in-plane rotation of a face.
pub trait FaceDetector: Send + Sync {
    /// Face roll in radians, `None` when no face is found.
    fn detect_face_roll(&self, photo: &Image) -> Option<f64>;
}

/// Locates eyebrow landmarks.
pub trait LandmarkDetector: Send + Sync {
    /// Landmarks in the pixel space of an image of `size`, `None` when no
    /// face is found.
    fn detect_eyebrow_landmarks(&self, photo: &Image, size: (u32, u32))
        -> Option<EyebrowLandmarks>;
}

impl FaceDetector for LandmarkFile {
    fn detect_face_roll(&self, _photo: &Image) -> Option<f64> {
        self.roll
    }
}

impl LandmarkDetector for LandmarkFile {
    fn detect_eyebrow_landmarks(
        &self,
        _photo: &Image,
        size: (u32, u32),
    ) -> Option<EyebrowLandmarks> {
        if !self.has_face() {
            return None;
        }
        Some(EyebrowLandmarks {
            right: self.scaled_points(&self.right, size),
            left: self.scaled_points(&self.left, size),
        })
    }
}

/// Raw answers of both detectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Face roll, radians.
    pub roll: Option<f64>,
    /// Eyebrow landmarks.
    pub landmarks: Option<EyebrowLandmarks>,
}

impl Detection {
    /// Errors implied by missing answers.
    ///
    /// Both missing means nobody is in the photo. A missing roll alone is
    /// tolerated by the caller with a roll of zero. Incomplete landmark sets
    /// count as missing.
    pub fn errors(&self) -> Vec<PipelineError> {
        match (self.roll.is_some(), self.usable_landmarks().is_some()) {
            (false, false) => vec![PipelineError::NoHumanDetected],
            (false, true) => vec![PipelineError::FaceAngleFailed],
            (true, false) => vec![PipelineError::LandmarkDetectionFailed],
            (true, true) => Vec::new(),
        }
    }

    /// Landmarks that can outline both eyebrows.
    pub fn usable_landmarks(&self) -> Option<&EyebrowLandmarks> {
        self.landmarks.as_ref().filter(|lm| lm.is_complete())
    }
}

/// A face detector paired with a landmark detector.
#[derive(Clone)]
pub struct Detectors {
    face: Arc<dyn FaceDetector>,
    landmarks: Arc<dyn LandmarkDetector>,
}

impl std::fmt::Debug for Detectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detectors").finish_non_exhaustive()
    }
}

impl Detectors {
    /// Pairs two detectors.
    pub fn new(face: Arc<dyn FaceDetector>, landmarks: Arc<dyn LandmarkDetector>) -> Self {
        Self { face, landmarks }
    }

    /// Uses one value for both roles.
    pub fn shared<D>(detector: Arc<D>) -> Self
    where
        D: FaceDetector + LandmarkDetector + 'static,
    {
        Self {
            face: detector.clone(),
            landmarks: detector,
        }
    }

    fn run(&self, photo: &Image, size: (u32, u32)) -> Detection {
        Detection {
            roll: self.face.detect_face_roll(photo),
            landmarks: self.landmarks.detect_eyebrow_landmarks(photo, size),
        }
    }

    /// Runs both detectors on a worker thread.
    ///
    /// `photo` is what the detectors look at; `size` is the pixel space the
    /// landmarks are wanted in. A late answer is discarded.
    pub fn detect(
        &self,
        photo: &Image,
        size: (u32, u32),
        timeout: Duration,
    ) -> Result<Detection, PipelineError> {
        let (tx, rx) = mpsc::channel();
        let worker = self.clone();
        let image = photo.clone();
        let spawned = thread::Builder::new()
            .name("brow-detect".into())
            .spawn(move || {
                let found = worker.run(&image, size);
                // The receiver is gone after a timeout.
                let _ = tx.send(found);
            });
        if let Err(e) = spawned {
            warn!(error = %e, "detection thread unavailable, running inline");
            return Ok(self.run(photo, size));
        }

        match rx.recv_timeout(timeout) {
            Ok(found) => {
                info!(
                    roll = ?found.roll,
                    landmarks = found.landmarks.is_some(),
                    "face detection finished"
                );
                Ok(found)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Err(PipelineError::DetectionTimedOut(timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                debug!("detection worker exited without an answer");
                Ok(Detection::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow(Duration);

    impl FaceDetector for Slow {
        fn detect_face_roll(&self, _: &Image) -> Option<f64> {
            thread::sleep(self.0);
            Some(0.0)
        }
    }

    impl LandmarkDetector for Slow {
        fn detect_eyebrow_landmarks(&self, _: &Image, _: (u32, u32)) -> Option<EyebrowLandmarks> {
            None
        }
    }

    #[test]
    fn replays_landmark_file() {
        let file = LandmarkFile::from_yaml_str(
            "roll: 0.2\nsize: [20, 10]\nright: [[2, 2]]\nleft: [[18, 2]]\n",
        )
        .unwrap();
        let d = Detectors::shared(Arc::new(file));
        let found = d.detect(&Image::new(1, 1), (10, 5), Duration::from_secs(5)).unwrap();
        assert_eq!(found.roll, Some(0.2));
        let lm = found.landmarks.unwrap();
        assert_eq!(lm.right, vec![Point::new(1.0, 1.0)]);
        assert_eq!(lm.left, vec![Point::new(9.0, 1.0)]);
    }

    #[test]
    fn empty_file_means_no_face() {
        let d = Detectors::shared(Arc::new(LandmarkFile::default()));
        let found = d.detect(&Image::new(1, 1), (1, 1), Duration::from_secs(5)).unwrap();
        assert!(matches!(found.errors()[..], [PipelineError::NoHumanDetected]));
    }

    #[test]
    fn missing_roll_or_landmarks() {
        let roll_only = Detection {
            roll: Some(0.0),
            landmarks: None,
        };
        assert!(matches!(
            roll_only.errors()[..],
            [PipelineError::LandmarkDetectionFailed]
        ));
        let marks_only = Detection {
            roll: None,
            landmarks: Some(EyebrowLandmarks {
                right: vec![Point::ZERO; EYEBROW_POINTS],
                left: vec![Point::ZERO; EYEBROW_POINTS],
            }),
        };
        assert!(matches!(marks_only.errors()[..], [PipelineError::FaceAngleFailed]));
    }

    #[test]
    fn short_landmark_sets_count_as_missing() {
        let empty = Detection {
            roll: Some(0.0),
            landmarks: Some(EyebrowLandmarks::default()),
        };
        assert!(empty.usable_landmarks().is_none());
        assert!(matches!(empty.errors()[..], [PipelineError::LandmarkDetectionFailed]));

        let short = Detection {
            roll: None,
            landmarks: Some(EyebrowLandmarks {
                right: vec![Point::ZERO; EYEBROW_POINTS],
                left: vec![Point::ZERO; 3],
            }),
        };
        assert!(matches!(short.errors()[..], [PipelineError::NoHumanDetected]));
    }

    #[test]
    fn slow_detector_times_out() {
        let d = Detectors::shared(Arc::new(Slow(Duration::from_millis(500))));
        let err = d
            .detect(&Image::new(1, 1), (1, 1), Duration::from_millis(20))
            .unwrap_err();
        assert!(matches!(err, PipelineError::DetectionTimedOut(_)));
    }
}

//! Recorded face detections as YAML.
//!
//! ```yaml
//! roll: 0.12          # radians, optional
//! size: [1080, 1440]  # image the points were measured on, optional
//! right: [[412, 388], [440, 372], [470, 374], [468, 390], [440, 386], [410, 396]]
//! left:  [[620, 388], [592, 372], [562, 374], [564, 390], [592, 386], [622, 396]]
//! ```
//!
//! Coordinates are image pixels, origin top-left. When `size` is present the
//! points are rescaled to whatever size the caller asks for. Both lists
//! empty means no face was found. Point counts are not checked here; the
//! geometry stage reports bad counts.

use std::fs;
use std::path::Path;

use brow_math::Point;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{IoError, IoResult};

/// Face roll plus right and left eyebrow landmarks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFile {
    /// Face roll in radians. Absent when the roll detector found nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    /// Width and height of the image the points refer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>,
    /// Right eyebrow, subject's right (left side of the image).
    #[serde(default)]
    pub right: Vec<[f64; 2]>,
    /// Left eyebrow.
    #[serde(default)]
    pub left: Vec<[f64; 2]>,
}

fn to_points(raw: &[[f64; 2]]) -> Vec<Point> {
    raw.iter().map(|&[x, y]| Point::new(x, y)).collect()
}

impl LandmarkFile {
    /// Builds a record from detector output.
    pub fn new(roll: Option<f64>, right: &[Point], left: &[Point]) -> Self {
        Self {
            roll,
            size: None,
            right: right.iter().map(|p| [p.x, p.y]).collect(),
            left: left.iter().map(|p| [p.x, p.y]).collect(),
        }
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(s: &str) -> IoResult<Self> {
        let file: Self = serde_yaml::from_str(s)?;
        file.validate()?;
        Ok(file)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> IoResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> IoResult<()> {
        if let Some(roll) = self.roll {
            if !roll.is_finite() {
                return Err(IoError::InvalidLandmarks(format!("roll is not finite: {roll}")));
            }
        }
        if let Some([w, h]) = self.size {
            if w == 0 || h == 0 {
                return Err(IoError::InvalidLandmarks(format!("zero image size {w}x{h}")));
            }
        }
        for (side, pts) in [("right", &self.right), ("left", &self.left)] {
            if let Some(bad) = pts.iter().find(|p| !p[0].is_finite() || !p[1].is_finite()) {
                return Err(IoError::InvalidLandmarks(format!(
                    "{side} eyebrow has non-finite point {bad:?}"
                )));
            }
        }
        Ok(())
    }

    /// True when any landmark was recorded.
    pub fn has_face(&self) -> bool {
        !self.right.is_empty() || !self.left.is_empty()
    }

    /// Right eyebrow as points.
    pub fn right_points(&self) -> Vec<Point> {
        to_points(&self.right)
    }

    /// Left eyebrow as points.
    pub fn left_points(&self) -> Vec<Point> {
        to_points(&self.left)
    }

    /// Points of one side mapped onto an image of `target` size.
    ///
    /// Without a recorded `size` the points are returned as stored.
    pub fn scaled_points(&self, raw: &[[f64; 2]], target: (u32, u32)) -> Vec<Point> {
        let points = to_points(raw);
        match self.size {
            Some([w, h]) if (w, h) != target => {
                let sx = target.0 as f64 / w as f64;
                let sy = target.1 as f64 / h as f64;
                points.into_iter().map(|p| Point::new(p.x * sx, p.y * sy)).collect()
            }
            _ => points,
        }
    }
}

/// Reads a landmark file.
pub fn read_landmarks<P: AsRef<Path>>(path: P) -> IoResult<LandmarkFile> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading landmarks");
    let text = fs::read_to_string(path).map_err(|e| IoError::file(path, e))?;
    LandmarkFile::from_yaml_str(&text)
}

/// Writes a landmark file.
pub fn write_landmarks<P: AsRef<Path>>(path: P, file: &LandmarkFile) -> IoResult<()> {
    let path = path.as_ref();
    let text = file.to_yaml_string()?;
    fs::write(path, text).map_err(|e| IoError::file(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
roll: 0.1
right: [[10, 40], [25, 35], [40, 38], [40, 45], [25, 44], [10, 46]]
left: [[90, 40], [75, 35], [60, 38], [60, 45], [75, 44], [90, 46]]
"#;

    #[test]
    fn parses_sample() {
        let f = LandmarkFile::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(f.roll, Some(0.1));
        assert!(f.has_face());
        let right = f.right_points();
        assert_eq!(right.len(), 6);
        assert_eq!(right[1], Point::new(25.0, 35.0));
        assert_eq!(f.left_points()[5], Point::new(90.0, 46.0));
    }

    #[test]
    fn roll_and_lists_are_optional() {
        let f = LandmarkFile::from_yaml_str("right: []\n").unwrap();
        assert_eq!(f.roll, None);
        assert!(!f.has_face());
    }

    #[test]
    fn rejects_non_finite() {
        let err = LandmarkFile::from_yaml_str("right: [[.nan, 1.0]]\n").unwrap_err();
        assert!(matches!(err, IoError::InvalidLandmarks(_)));
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(
            LandmarkFile::from_yaml_str("right: [[1, 2, 3]]\n"),
            Err(IoError::Yaml(_))
        ));
    }

    #[test]
    fn rescales_to_target() {
        let f = LandmarkFile::from_yaml_str("size: [200, 100]\nright: [[100, 50]]\n").unwrap();
        let pts = f.scaled_points(&f.right, (100, 50));
        assert_eq!(pts, vec![Point::new(50.0, 25.0)]);
        let same = f.scaled_points(&f.right, (200, 100));
        assert_eq!(same, vec![Point::new(100.0, 50.0)]);
        assert!(LandmarkFile::from_yaml_str("size: [0, 10]\n").is_err());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.yaml");
        let f = LandmarkFile::new(
            Some(-0.25),
            &[Point::new(1.5, 2.0), Point::new(3.0, 4.0)],
            &[],
        );
        write_landmarks(&path, &f).unwrap();
        assert_eq!(read_landmarks(&path).unwrap(), f);
    }
}

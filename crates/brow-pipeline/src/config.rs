//! Pipeline configuration.
//!
//! Every field has a default, so a YAML file only lists what it changes:
//!
//! ```yaml
//! expansion:
//!   rate: 0.15
//! matte_mode: per_side
//! thicken:
//!   enabled: true
//!   radius: 3.0
//! colors:
//!   min:  [0.05, 0.03, 0.02, 1.0]
//!   mode: [0.30, 0.18, 0.10, 1.0]
//!   max:  [0.60, 0.42, 0.30, 1.0]
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use brow_math::eyebrow::Expansion;
use brow_ops::gradient::DEFAULT_GRADIENT_WIDTH;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::colorist::ColorTriple;
use crate::lightness::{DEFAULT_ALPHA_THRESHOLD, DEFAULT_BATCH_SIZE};
use crate::matte::MatteMode;
use crate::thicken::ThickenConfig;
use crate::{PipelineError, PipelineResult};

/// Growth of each eyebrow before its cutout region is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Offsets from the center are scaled by `1 + rate`.
    pub rate: f64,
    /// Extra vertical scale in the de-rolled eyebrow frame.
    pub aspect: f64,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            rate: 0.1,
            aspect: 2.0,
        }
    }
}

impl ExpansionConfig {
    /// Geometry parameters for a face rolled by `angle` radians.
    pub fn with_angle(&self, angle: f64) -> Expansion {
        Expansion {
            rate: self.rate,
            aspect: self.aspect,
            angle,
        }
    }
}

/// Lightness profiler settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightnessConfig {
    /// Longest side of the analysed cutout.
    pub batch_size: u32,
    /// Pixels with alpha at or below this are ignored.
    pub alpha_threshold: f32,
}

impl Default for LightnessConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
        }
    }
}

/// Everything the pipeline can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Eyebrow expansion.
    pub expansion: ExpansionConfig,
    /// One stitched region or one region per eyebrow.
    pub matte_mode: MatteMode,
    /// Lightness profiling.
    pub lightness: LightnessConfig,
    /// Sample count of the recoloring gradient.
    pub gradient_width: usize,
    /// Thickened eyebrow layer.
    pub thicken: ThickenConfig,
    /// Face detection deadline in milliseconds.
    pub detection_timeout_ms: u64,
    /// Worker threads; `None` uses every core.
    pub threads: Option<usize>,
    /// Eyebrow colors, also used for hair unless `hair_colors` is set.
    pub colors: ColorTriple,
    /// Separate hair colors.
    pub hair_colors: Option<ColorTriple>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            expansion: ExpansionConfig::default(),
            matte_mode: MatteMode::default(),
            lightness: LightnessConfig::default(),
            gradient_width: DEFAULT_GRADIENT_WIDTH,
            thicken: ThickenConfig::default(),
            detection_timeout_ms: 5_000,
            threads: None,
            colors: ColorTriple::default(),
            hair_colors: None,
        }
    }
}

impl PipelineConfig {
    /// Parses a YAML document and validates it.
    pub fn from_yaml_str(s: &str) -> PipelineResult<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading pipeline config");
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> PipelineResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Rejects values no stage can work with.
    pub fn validate(&self) -> PipelineResult<()> {
        let bad = |msg: String| Err(PipelineError::InvalidConfig(msg));
        if !(self.expansion.rate > -1.0 && self.expansion.rate.is_finite()) {
            return bad(format!("expansion.rate must be > -1, got {}", self.expansion.rate));
        }
        if !(self.expansion.aspect > 0.0 && self.expansion.aspect.is_finite()) {
            return bad(format!("expansion.aspect must be > 0, got {}", self.expansion.aspect));
        }
        if self.gradient_width == 0 {
            return bad("gradient_width must be > 0".into());
        }
        if self.lightness.batch_size == 0 {
            return bad("lightness.batch_size must be > 0".into());
        }
        if self.thicken.times == 0 {
            return bad("thicken.times must be >= 1".into());
        }
        if !self.thicken.radius.is_finite() || self.thicken.radius < 0.0 {
            return bad(format!("thicken.radius must be >= 0, got {}", self.thicken.radius));
        }
        if self.thicken.bloom_intensity < 0.0 {
            return bad(format!(
                "thicken.bloom_intensity must be >= 0, got {}",
                self.thicken.bloom_intensity
            ));
        }
        if self.threads == Some(0) {
            return bad("threads must be >= 1 when set".into());
        }
        Ok(())
    }

    /// Detection deadline.
    pub fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.detection_timeout_ms)
    }

    /// Colors for hair.
    pub fn hair_colors(&self) -> ColorTriple {
        self.hair_colors.unwrap_or(self.colors)
    }
}

impl FromStr for PipelineConfig {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let c: PipelineConfig = "{}".parse().unwrap();
        assert_eq!(c, PipelineConfig::default());
        assert_eq!(c.gradient_width, 1000);
        assert_eq!(c.lightness.batch_size, 500);
        assert_eq!(c.detection_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn partial_override() {
        let c = PipelineConfig::from_yaml_str(
            "expansion:\n  rate: 0.3\nmatte_mode: per_side\nthicken:\n  enabled: true\n",
        )
        .unwrap();
        assert_eq!(c.expansion.rate, 0.3);
        assert_eq!(c.expansion.aspect, 2.0);
        assert_eq!(c.matte_mode, MatteMode::PerSide);
        assert!(c.thicken.enabled);
        assert_eq!(c.thicken.times, ThickenConfig::default().times);
    }

    #[test]
    fn hair_colors_fall_back() {
        let mut c = PipelineConfig::default();
        assert_eq!(c.hair_colors(), c.colors);
        let blond = ColorTriple::new([0.5; 4], [0.7; 4], [0.9; 4]);
        c.hair_colors = Some(blond);
        assert_eq!(c.hair_colors(), blond);
    }

    #[test]
    fn validation() {
        assert!(PipelineConfig::from_yaml_str("gradient_width: 0").is_err());
        assert!(PipelineConfig::from_yaml_str("thicken:\n  times: 0").is_err());
        assert!(PipelineConfig::from_yaml_str("expansion:\n  aspect: -1").is_err());
        assert!(PipelineConfig::from_yaml_str("threads: 0").is_err());
        assert!(matches!(
            PipelineConfig::from_yaml_str("gradient_width: wide"),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn yaml_roundtrip_via_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brow.yaml");
        let mut c = PipelineConfig::default();
        c.thicken.enabled = true;
        c.threads = Some(2);
        std::fs::write(&path, c.to_yaml_string().unwrap()).unwrap();
        assert_eq!(PipelineConfig::from_file(&path).unwrap(), c);
    }
}

//! CLI command implementations

pub mod lightness;
pub mod matte;
pub mod recolor;

use anyhow::{Context, Result};
use brow_core::{Image, Matte, Rgba};
use brow_io::LandmarkFile;
use brow_pipeline::PipelineConfig;
use std::path::Path;

/// Load a photo
pub fn load_image(path: &Path) -> Result<Image> {
    brow_io::read_image(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Load a matte
pub fn load_matte(path: &Path) -> Result<Matte> {
    brow_io::read_matte(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save a photo
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    brow_io::write_image(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Save a matte
pub fn save_matte(path: &Path, matte: &Matte) -> Result<()> {
    brow_io::write_matte(path, matte).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Load a landmark file
pub fn load_landmarks(path: &Path) -> Result<LandmarkFile> {
    brow_io::read_landmarks(path)
        .with_context(|| format!("Failed to load landmarks: {}", path.display()))
}

/// Load the pipeline configuration, or the defaults without a path
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::from_file(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Parse `RRGGBB` or `#RRGGBB` into an opaque color
pub fn parse_hex_color(s: &str) -> Result<Rgba, String> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected RRGGBB, got '{s}'"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|e| format!("'{s}': {e}"))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ff0000").unwrap(), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(parse_hex_color("00FF00").unwrap(), [0.0, 1.0, 0.0, 1.0]);
        assert!(parse_hex_color("fff").is_err());
        assert!(parse_hex_color("gg0000").is_err());
    }

    #[test]
    fn missing_config_is_default() {
        assert_eq!(load_config(None).unwrap(), PipelineConfig::default());
        assert!(load_config(Some(Path::new("/nonexistent/brow.yaml"))).is_err());
    }
}

//! Pixel helpers: RGBA tuples and Rec.709 luminance.
//!
//! All colors in the workspace are straight (non-premultiplied) alpha,
//! `[r, g, b, a]` with components nominally in `[0, 1]`.

/// Straight-alpha RGBA color.
pub type Rgba = [f32; 4];

/// Opaque black.
pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];

/// Opaque white.
pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

/// Fully transparent black.
pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Rec.709 luminance coefficient for red channel.
pub const REC709_LUMA_R: f32 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f32 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f32 = 0.0722;

/// Rec.709 luminance coefficients as an array [R, G, B].
pub const REC709_LUMA: [f32; 3] = [REC709_LUMA_R, REC709_LUMA_G, REC709_LUMA_B];

/// Calculate Rec.709 luminance from RGB values.
///
/// `Y = 0.2126*R + 0.7152*G + 0.0722*B`
///
/// # Example
///
/// ```rust
/// use brow_core::luminance_rec709;
///
/// let y = luminance_rec709([1.0, 1.0, 1.0]);
/// assert!((y - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn luminance_rec709(rgb: [f32; 3]) -> f32 {
    rgb[0] * REC709_LUMA_R + rgb[1] * REC709_LUMA_G + rgb[2] * REC709_LUMA_B
}

/// Luminance of an RGBA pixel, ignoring alpha.
#[inline]
pub fn luminance_rgba(px: Rgba) -> f32 {
    luminance_rec709([px[0], px[1], px[2]])
}

/// Quantizes a normalized value to 8 bits and back, like an RGBA8 readback.
///
/// # Example
///
/// ```rust
/// use brow_core::pixel::quantize_u8;
///
/// assert_eq!(quantize_u8(1.0), 1.0);
/// assert_eq!(quantize_u8(-0.2), 0.0);
/// ```
#[inline]
pub fn quantize_u8(v: f32) -> f32 {
    (v.clamp(0.0, 1.0) * 255.0).round() / 255.0
}

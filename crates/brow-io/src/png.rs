//! PNG reading and writing for photos and mattes.
//!
//! Decoding expands palette and sub-byte files to 8 bits, then normalizes
//! samples to `[0, 1]`. Encoding is always 8-bit: RGBA for images,
//! grayscale for mattes.
//!
//! Mattes read from color files use Rec.709 luminance scaled by alpha.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, Write};
use std::path::Path;

use brow_core::pixel::luminance_rec709;
use brow_core::{Image, Matte};
use tracing::{debug, trace};

use crate::{IoError, IoResult};

/// Decoded PNG samples, interleaved and normalized.
struct Decoded {
    width: u32,
    height: u32,
    channels: usize,
    samples: Vec<f32>,
}

fn decode<R: BufRead + Seek>(reader: R) -> IoResult<Decoded> {
    let mut decoder = ::png::Decoder::new(reader);
    decoder.set_transformations(::png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: ::png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: ::png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        ::png::ColorType::Grayscale => 1,
        ::png::ColorType::GrayscaleAlpha => 2,
        ::png::ColorType::Rgb => 3,
        ::png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!("{:?}", other)));
        }
    };
    let samples: Vec<f32> = match info.bit_depth {
        ::png::BitDepth::Eight => bytes.iter().map(|&b| b as f32 / 255.0).collect(),
        ::png::BitDepth::Sixteen => bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]) as f32 / 65535.0)
            .collect(),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} {:?}",
                info.color_type, other
            )));
        }
    };
    trace!(
        width = info.width,
        height = info.height,
        channels,
        depth = ?info.bit_depth,
        "png decoded"
    );

    Ok(Decoded {
        width: info.width,
        height: info.height,
        channels,
        samples,
    })
}

fn open(path: &Path) -> IoResult<BufReader<File>> {
    let file = File::open(path).map_err(|e| IoError::file(path, e))?;
    Ok(BufReader::new(file))
}

/// Decodes a PNG stream into a straight-alpha RGBA image.
pub fn decode_image<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let d = decode(reader)?;
    let data: Vec<f32> = match d.channels {
        1 => d.samples.iter().flat_map(|&g| [g, g, g, 1.0]).collect(),
        2 => d
            .samples
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        3 => d
            .samples
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 1.0])
            .collect(),
        _ => d.samples,
    };
    Ok(Image::from_vec(d.width, d.height, data)?)
}

/// Decodes a PNG stream into a matte.
pub fn decode_matte<R: BufRead + Seek>(reader: R) -> IoResult<Matte> {
    let d = decode(reader)?;
    let data: Vec<f32> = match d.channels {
        1 => d.samples,
        2 => d.samples.chunks_exact(2).map(|ga| ga[0] * ga[1]).collect(),
        3 => d
            .samples
            .chunks_exact(3)
            .map(|c| luminance_rec709([c[0], c[1], c[2]]))
            .collect(),
        _ => d
            .samples
            .chunks_exact(4)
            .map(|c| luminance_rec709([c[0], c[1], c[2]]) * c[3])
            .collect(),
    };
    Ok(Matte::from_vec(d.width, d.height, data)?)
}

/// Reads a photo.
///
/// # Example
///
/// ```rust,ignore
/// let photo = brow_io::read_image("photo.png")?;
/// ```
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading image");
    decode_image(open(path)?)
}

/// Reads a segmentation matte.
pub fn read_matte<P: AsRef<Path>>(path: P) -> IoResult<Matte> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading matte");
    decode_matte(open(path)?)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn encode<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    color: ::png::ColorType,
    bytes: &[u8],
) -> IoResult<()> {
    let mut encoder = ::png::Encoder::new(writer, width, height);
    encoder.set_color(color);
    encoder.set_depth(::png::BitDepth::Eight);
    encoder.set_compression(::png::Compression::default());
    encoder.set_source_srgb(::png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(bytes)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

/// Encodes an image as 8-bit RGBA.
pub fn encode_image<W: Write>(writer: W, image: &Image) -> IoResult<()> {
    let bytes: Vec<u8> = image.data().iter().map(|&v| to_u8(v)).collect();
    encode(
        writer,
        image.width(),
        image.height(),
        ::png::ColorType::Rgba,
        &bytes,
    )
}

/// Encodes a matte as 8-bit grayscale.
pub fn encode_matte<W: Write>(writer: W, matte: &Matte) -> IoResult<()> {
    let bytes: Vec<u8> = matte.data().iter().map(|&v| to_u8(v)).collect();
    encode(
        writer,
        matte.width(),
        matte.height(),
        ::png::ColorType::Grayscale,
        &bytes,
    )
}

/// Writes an image as 8-bit RGBA PNG.
pub fn write_image<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), width = image.width(), height = image.height(), "writing image");
    let file = File::create(path).map_err(|e| IoError::file(path, e))?;
    encode_image(BufWriter::new(file), image)
}

/// Writes a matte as 8-bit grayscale PNG.
pub fn write_matte<P: AsRef<Path>>(path: P, matte: &Matte) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "writing matte");
    let file = File::create(path).map_err(|e| IoError::file(path, e))?;
    encode_matte(BufWriter::new(file), matte)
}

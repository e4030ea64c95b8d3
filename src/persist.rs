//! Image re-encoding and atomic writes.
//!
//! | Encoding | Crate | Settings |
//! |---|---|---|
//! | WebP | `webp` (libwebp) | lossy, quality 80, method 6 |
//! | JPEG | `jpeg-encoder` | quality 100, optimized Huffman tables |
//!
//! Files are encoded in memory first, then written through
//! [`write_atomic`](crate::utils::write_atomic), replacing any previous file
//! at the same path.

use crate::error::PersistError;
use crate::types::{Encoding, ImageInfo, OutputFile, OutputRole};
use crate::utils::{artifact_path, write_atomic};
use image::RgbImage;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Lossy WebP quality (0-100)
pub const WEBP_QUALITY: f32 = 80.0;
/// libwebp speed/size trade-off, 6 = slowest and smallest
pub const WEBP_METHOD: i32 = 6;
/// JPEG quality (1-100)
pub const JPEG_QUALITY: u8 = 100;

/// Encode `bitmap` into the bytes of `encoding`
pub fn encode(bitmap: &RgbImage, encoding: Encoding) -> Result<Vec<u8>, String> {
    match encoding {
        Encoding::WebP => encode_webp(bitmap),
        Encoding::Jpeg => encode_jpeg(bitmap),
    }
}

fn encode_webp(bitmap: &RgbImage) -> Result<Vec<u8>, String> {
    let mut config =
        webp::WebPConfig::new().map_err(|_| "failed to initialize WebP config".to_string())?;
    config.lossless = 0;
    config.quality = WEBP_QUALITY;
    config.method = WEBP_METHOD;

    let encoder = webp::Encoder::from_rgb(bitmap.as_raw(), bitmap.width(), bitmap.height());
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| format!("WebP encoding failed: {e:?}"))?;
    Ok(memory.to_vec())
}

fn encode_jpeg(bitmap: &RgbImage) -> Result<Vec<u8>, String> {
    encode_jpeg_with(bitmap, true)
}

fn encode_jpeg_with(bitmap: &RgbImage, optimize: bool) -> Result<Vec<u8>, String> {
    let width = u16::try_from(bitmap.width())
        .map_err(|_| format!("width {} exceeds JPEG limit", bitmap.width()))?;
    let height = u16::try_from(bitmap.height())
        .map_err(|_| format!("height {} exceeds JPEG limit", bitmap.height()))?;

    let mut buf = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut buf, JPEG_QUALITY);
    encoder.set_optimized_huffman_tables(optimize);
    encoder
        .encode(bitmap.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| format!("JPEG encoding failed: {e}"))?;
    Ok(buf)
}

/// Encode `bitmap` and write it to `path`, overwriting any existing file
pub fn persist(bitmap: &RgbImage, path: &Path, encoding: Encoding) -> Result<(), PersistError> {
    let bytes = encode(bitmap, encoding).map_err(|reason| PersistError::Encode {
        path: path.to_path_buf(),
        reason,
    })?;

    write_atomic(path, |file| file.write_all(&bytes)).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = ?path, bytes = bytes.len(), ?encoding, "image saved");
    Ok(())
}

/// Write one file per [`OutputRole`] into `output_dir`
///
/// Files are written in role order. The first failure stops the loop; files
/// already written stay on disk.
pub fn persist_all(
    bitmap: &RgbImage,
    info: &ImageInfo,
    output_dir: &Path,
) -> Result<Vec<OutputFile>, PersistError> {
    let mut outputs = Vec::with_capacity(OutputRole::ALL.len());
    for role in OutputRole::ALL {
        let encoding = role.encoding();
        let path = artifact_path(output_dir, info.date, info.region, encoding.extension());
        persist(bitmap, &path, encoding)?;
        outputs.push(OutputFile {
            path,
            encoding,
            role,
        });
    }
    Ok(outputs)
}

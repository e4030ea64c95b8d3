//! Image download and decode.

use crate::error::DownloadError;
use image::RgbImage;
use tracing::{debug, info};

/// Downloads an image and decodes it into an RGB bitmap
pub struct ImageDownloader {
    client: reqwest::Client,
}

impl ImageDownloader {
    /// Create a downloader using the shared HTTP client
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Retrieve `url` and decode the payload
    ///
    /// Alpha and any extra channels are dropped; the result is always 8-bit RGB.
    pub async fn download(&self, url: &str) -> Result<RgbImage, DownloadError> {
        debug!(%url, "downloading image");

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| DownloadError::Network {
                    url: url.to_string(),
                    source,
                })?;

        if !response.status().is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| DownloadError::Network {
                url: url.to_string(),
                source,
            })?;

        let bitmap = decode_rgb(&bytes).map_err(|source| DownloadError::Decode {
            url: url.to_string(),
            source,
        })?;

        info!(
            %url,
            bytes = bytes.len(),
            width = bitmap.width(),
            height = bitmap.height(),
            "image downloaded"
        );
        Ok(bitmap)
    }
}

/// Decode any supported image format into RGB8
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, image::ImageError> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

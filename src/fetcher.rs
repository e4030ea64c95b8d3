//! Bing image-of-the-day metadata lookup.
//!
//! One query per region against `HPImageArchive.aspx`. The first entry of the
//! `images` array is used. The best image URL is chosen by checking the UHD
//! rendition with a `HEAD` request and falling back to 1920x1080 when that
//! check does not answer `200`.

use crate::config::BingConfig;
use crate::error::FetchError;
use crate::types::{ImageInfo, Region};
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

/// Suffix of the preferred (UHD) rendition
pub const UHD_SUFFIX: &str = "_UHD.jpg";
/// Suffix of the fixed-resolution fallback rendition
pub const FALLBACK_SUFFIX: &str = "_1920x1080.jpg";

/// Metadata endpoint response
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    images: Vec<ArchiveImage>,
}

/// One entry of the `images` array
#[derive(Debug, Deserialize)]
struct ArchiveImage {
    enddate: Option<String>,
    urlbase: Option<String>,
    #[serde(default)]
    copyright: String,
    #[serde(default)]
    title: String,
}

/// Candidate URLs for one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidates {
    /// UHD rendition
    pub preferred: String,
    /// 1920x1080 rendition
    pub fallback: String,
}

impl ImageCandidates {
    /// Build both candidate URLs from the `urlbase` fragment
    pub fn from_urlbase(base_url: &str, urlbase: &str) -> Self {
        Self {
            preferred: format!("{base_url}{urlbase}{UHD_SUFFIX}"),
            fallback: format!("{base_url}{urlbase}{FALLBACK_SUFFIX}"),
        }
    }
}

/// Parse the provider's `YYYYMMDD` end-date
pub fn parse_end_date(value: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(value.trim(), "%Y%m%d").map_err(|e| FetchError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Queries the metadata endpoint and resolves the image URL
pub struct MetadataFetcher {
    client: reqwest::Client,
    base_url: String,
    image_index: u32,
}

impl MetadataFetcher {
    /// Create a fetcher using the shared HTTP client
    pub fn new(client: reqwest::Client, config: &BingConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_index: config.image_index,
        }
    }

    /// Metadata query URL for `region`
    pub fn metadata_url(&self, region: Region) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/HPImageArchive.aspx", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("format", "js")
            .append_pair("idx", &self.image_index.to_string())
            .append_pair("n", "1")
            .append_pair("uhd", "1");
        if let Some(market) = region.market() {
            url.query_pairs_mut().append_pair("mkt", market);
        }
        Ok(url)
    }

    /// Fetch today's image metadata for `region`
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on transport failure, non-success status,
    /// malformed JSON, an empty `images` array, a missing `enddate`/`urlbase`,
    /// or an unparseable date.
    pub async fn fetch(&self, region: Region) -> Result<ImageInfo, FetchError> {
        let url = self.metadata_url(region)?;
        debug!(%region, %url, "querying image metadata");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
            });
        }

        let body: ArchiveResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        let image = body
            .images
            .into_iter()
            .next()
            .ok_or(FetchError::MissingField("images"))?;
        let enddate = image.enddate.ok_or(FetchError::MissingField("enddate"))?;
        let urlbase = image
            .urlbase
            .filter(|u| !u.is_empty())
            .ok_or(FetchError::MissingField("urlbase"))?;

        let date = parse_end_date(&enddate)?;
        let candidates = ImageCandidates::from_urlbase(&self.base_url, &urlbase);
        let source_url = self.select_url(candidates).await?;

        info!(%region, %date, url = %source_url, "found image of the day");

        Ok(ImageInfo {
            date,
            source_url,
            title: image.title,
            copyright: image.copyright,
            region,
        })
    }

    /// Check the UHD rendition with HEAD, falling back to 1920x1080 unless it answers 200
    async fn select_url(&self, candidates: ImageCandidates) -> Result<String, FetchError> {
        let response = self
            .client
            .head(&candidates.preferred)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: candidates.preferred.clone(),
                source,
            })?;

        if response.status() == StatusCode::OK {
            debug!(url = %candidates.preferred, "UHD rendition available");
            Ok(candidates.preferred)
        } else {
            warn!(
                status = response.status().as_u16(),
                fallback = %candidates.fallback,
                "UHD rendition unavailable, using fallback"
            );
            Ok(candidates.fallback)
        }
    }
}

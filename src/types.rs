//! Core types shared by the pipeline stages

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Market selector for the image-of-the-day feed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Default (worldwide) feed, no market parameter
    Global,
    /// Chinese feed (`mkt=zh-CN`)
    China,
}

impl Region {
    /// Regions processed by a default run, in order
    pub const DEFAULT_ORDER: [Region; 2] = [Region::Global, Region::China];

    /// Name embedded in artifact filenames and captions
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Global => "Global",
            Region::China => "China",
        }
    }

    /// Market code appended to the metadata query, if any
    pub fn market(&self) -> Option<&'static str> {
        match self {
            Region::Global => None,
            Region::China => Some("zh-CN"),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" | "en-us" | "ww" => Ok(Region::Global),
            "china" | "zh-cn" | "cn" => Ok(Region::China),
            other => Err(format!("unknown region '{other}'")),
        }
    }
}

/// Metadata for one region's image of the day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Day the image is featured (from the provider's end-date)
    pub date: NaiveDate,
    /// Resolved image URL (UHD or 1920x1080 fallback)
    pub source_url: String,
    /// Image title, may be empty
    pub title: String,
    /// Copyright line, may be empty
    pub copyright: String,
    /// Region the metadata was fetched for
    pub region: Region,
}

impl ImageInfo {
    /// Date rendered as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Output encoding for a persisted image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Lossy WebP, tuned for size
    WebP,
    /// JPEG at maximum quality
    Jpeg,
}

impl Encoding {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::WebP => "webp",
            Encoding::Jpeg => "jpeg",
        }
    }
}

/// Intended use of a persisted image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputRole {
    /// Small web-format copy
    PrimaryDisplay,
    /// Full quality photographic copy (sent as the photo message)
    HighQuality,
    /// Archival copy
    ArchivalOriginal,
}

impl OutputRole {
    /// Every role, in the order files are written
    pub const ALL: [OutputRole; 3] = [
        OutputRole::PrimaryDisplay,
        OutputRole::HighQuality,
        OutputRole::ArchivalOriginal,
    ];

    /// Encoding used for this role
    pub fn encoding(&self) -> Encoding {
        match self {
            OutputRole::PrimaryDisplay => Encoding::WebP,
            OutputRole::HighQuality | OutputRole::ArchivalOriginal => Encoding::Jpeg,
        }
    }
}

/// A file written by the persister
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    /// Location on disk
    pub path: PathBuf,
    /// Encoding the file was written with
    pub encoding: Encoding,
    /// Role of the file in the artifact set
    pub role: OutputRole,
}

/// Pipeline state for one region pass
///
/// `Failed` is terminal; a new run starts again from `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Nothing started yet
    Idle,
    /// Querying the metadata endpoint
    FetchingMetadata,
    /// Downloading and decoding the image
    Downloading,
    /// Writing the encoded images
    Persisting,
    /// Building the zip archive
    Archiving,
    /// Sending the Telegram messages
    Notifying,
    /// Region completed
    Done,
    /// A stage failed
    Failed,
}

impl RunState {
    /// Stage that follows this one on success
    pub fn next(self) -> RunState {
        match self {
            RunState::Idle => RunState::FetchingMetadata,
            RunState::FetchingMetadata => RunState::Downloading,
            RunState::Downloading => RunState::Persisting,
            RunState::Persisting => RunState::Archiving,
            RunState::Archiving => RunState::Notifying,
            RunState::Notifying | RunState::Done => RunState::Done,
            RunState::Failed => RunState::Failed,
        }
    }

    /// Whether no further transitions happen from this state
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::FetchingMetadata => "fetching_metadata",
            RunState::Downloading => "downloading",
            RunState::Persisting => "persisting",
            RunState::Archiving => "archiving",
            RunState::Notifying => "notifying",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result of a completed region pass
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionReport {
    /// Metadata the pass worked from
    pub info: ImageInfo,
    /// Files written, in write order
    pub outputs: Vec<OutputFile>,
    /// Path of the zip archive
    pub archive: PathBuf,
}

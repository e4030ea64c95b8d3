//! Error types for bing-wallpaper
//!
//! Each pipeline stage has its own error enum covering its failure domain.
//! The top-level [`Error`] wraps them so the orchestrator can report which
//! stage failed and stop the run.

use crate::types::RunState;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bing-wallpaper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bing-wallpaper
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Metadata query or URL selection failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Image download or decode failed
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    /// Image encode or write failed
    #[error("persist failed: {0}")]
    Persist(#[from] PersistError),

    /// Zip archive creation failed
    #[error("archive failed: {0}")]
    Archive(#[from] ArchiveError),

    /// Telegram delivery failed
    #[error("notify failed: {0}")]
    Notify(#[from] NotifyError),

    /// I/O error outside a specific stage (e.g. creating the output directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl Error {
    /// Pipeline state the failure occurred in
    pub fn stage(&self) -> RunState {
        match self {
            Error::Config(_) | Error::Io(_) | Error::HttpClient(_) => RunState::Idle,
            Error::Fetch(_) => RunState::FetchingMetadata,
            Error::Download(_) => RunState::Downloading,
            Error::Persist(_) => RunState::Persisting,
            Error::Archive(_) => RunState::Archiving,
            Error::Notify(_) => RunState::Notifying,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::Fetch(_) => "fetch_failed",
            Error::Download(_) => "download_failed",
            Error::Persist(_) => "persist_failed",
            Error::Archive(_) => "archive_failed",
            Error::Notify(_) => "notify_failed",
            Error::Io(_) => "io_error",
            Error::HttpClient(_) => "http_client_error",
        }
    }
}

/// Configuration errors surfaced at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is absent or empty
    #[error("missing required setting {key}")]
    Missing {
        /// The environment variable name
        key: String,
    },

    /// Setting present but unparseable
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// The environment variable name
        key: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Metadata fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure talking to the metadata endpoint or the UHD availability check
    #[error("request to {url} failed: {source}")]
    Network {
        /// The URL that was requested
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Metadata endpoint answered with a non-success status
    #[error("metadata endpoint returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Response body is not the expected JSON shape
    #[error("malformed metadata response: {0}")]
    Malformed(String),

    /// A required field is absent from the first image entry
    #[error("metadata entry is missing field '{0}'")]
    MissingField(&'static str),

    /// The end-date field could not be parsed
    #[error("invalid end-date '{value}': {reason}")]
    InvalidDate {
        /// Raw field value
        value: String,
        /// Parser message
        reason: String,
    },

    /// The metadata URL could not be built from the configured base
    #[error("invalid metadata URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Image download errors
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Transport failure
    #[error("request to {url} failed: {source}")]
    Network {
        /// The image URL
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// CDN answered with a non-success status
    #[error("{url} returned status {status}")]
    Status {
        /// The image URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Payload is not a decodable image
    #[error("failed to decode image from {url}: {source}")]
    Decode {
        /// The image URL
        url: String,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },
}

/// Image persist errors
#[derive(Debug, Error)]
pub enum PersistError {
    /// Encoder rejected the bitmap
    #[error("failed to encode {path}: {reason}")]
    Encode {
        /// Target file
        path: PathBuf,
        /// Encoder message
        reason: String,
    },

    /// Writing or renaming the file failed
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Archive creation errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Reading an input file or writing the archive failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved in the failure
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The zip writer failed
    #[error("zip error on {path}: {source}")]
    Zip {
        /// Archive path
        path: PathBuf,
        /// Zip library error
        #[source]
        source: zip::result::ZipError,
    },

    /// An input path has no file name component
    #[error("input path {0} has no file name")]
    InvalidInput(PathBuf),
}

/// Telegram delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Attachment could not be read from disk
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        /// Attachment path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Transport failure talking to the Bot API
    #[error("{method} request failed: {source}")]
    Network {
        /// Bot API method name (`sendPhoto`, `sendDocument`)
        method: &'static str,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Bot API refused the message
    #[error("{method} rejected with status {status}: {description}")]
    Rejected {
        /// Bot API method name
        method: &'static str,
        /// HTTP status code
        status: u16,
        /// Description returned by the API, if any
        description: String,
    },
}

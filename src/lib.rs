//! # bing-wallpaper
//!
//! Daily batch job that fetches the Bing image of the day, stores it as WebP
//! and JPEG, bundles the files into a zip archive and posts the image and the
//! archive to a Telegram channel.
//!
//! ## Pipeline
//!
//! For each region (Global, then China by default):
//!
//! 1. [`fetcher`] : query metadata, pick the UHD or 1920x1080 rendition
//! 2. [`downloader`] : download and decode to an RGB bitmap
//! 3. [`persist`] : write `{date}({region}).webp` and `{date}({region}).jpeg`
//! 4. [`archive`] : bundle them into `{date}({region}).zip`
//! 5. [`notifier`] : send the photo with a caption, then the archive
//!
//! The first failing stage stops the whole run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bing_wallpaper::{Config, Pipeline};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let pipeline = Pipeline::new(config)?;
//!
//!     for report in pipeline.run().await? {
//!         println!("{} -> {}", report.info.region, report.archive.display());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Zip archive creation
pub mod archive;
/// Configuration types
pub mod config;
/// Image download and decode
pub mod downloader;
/// Error types
pub mod error;
/// Image-of-the-day metadata lookup
pub mod fetcher;
/// Telegram delivery
pub mod notifier;
/// Image encoding and file output
pub mod persist;
/// Run orchestration
pub mod pipeline;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{
    ArchiveError, ConfigError, DownloadError, Error, FetchError, NotifyError, PersistError, Result,
};
pub use pipeline::Pipeline;
pub use types::{Encoding, ImageInfo, OutputFile, OutputRole, Region, RegionReport, RunState};

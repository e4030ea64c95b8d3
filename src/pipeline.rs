//! Run orchestration.
//!
//! A run walks the configured regions in order. For each region the stages
//! execute strictly in sequence:
//!
//! ```text
//! Idle → FetchingMetadata → Downloading → Persisting → Archiving → Notifying → Done
//! ```
//!
//! Any stage error moves the region to `Failed` and ends the whole run.
//! Regions already completed (files written, messages sent) are left as they
//! are.

use crate::archive::build_archive;
use crate::config::Config;
use crate::downloader::ImageDownloader;
use crate::error::Result;
use crate::fetcher::MetadataFetcher;
use crate::notifier::TelegramNotifier;
use crate::persist::persist_all;
use crate::types::{ImageInfo, OutputRole, Region, RegionReport, RunState};
use crate::utils::{artifact_path, build_http_client};
use std::path::{Path, PathBuf};
use tracing::{Instrument, debug, error, info, info_span};

/// Sequences the stages for every configured region
pub struct Pipeline {
    fetcher: MetadataFetcher,
    downloader: ImageDownloader,
    notifier: TelegramNotifier,
    output_dir: PathBuf,
    regions: Vec<Region>,
}

impl Pipeline {
    /// Build the stage components from `config`
    ///
    /// Creates the output directory if it does not exist.
    pub fn new(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.output.dir)?;

        let client = build_http_client(config.http_timeout)?;
        Ok(Self {
            fetcher: MetadataFetcher::new(client.clone(), &config.bing),
            downloader: ImageDownloader::new(client.clone()),
            notifier: TelegramNotifier::new(client, &config.telegram),
            output_dir: config.output.dir,
            regions: config.regions,
        })
    }

    /// Regions this pipeline processes, in order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Process every region, stopping at the first failure
    pub async fn run(&self) -> Result<Vec<RegionReport>> {
        info!(regions = ?self.regions, output_dir = ?self.output_dir, "starting run");

        let mut reports = Vec::with_capacity(self.regions.len());
        for &region in &self.regions {
            let report = self
                .run_region(region)
                .instrument(info_span!("region", %region))
                .await?;
            reports.push(report);
        }

        info!(completed = reports.len(), "run finished");
        Ok(reports)
    }

    /// One full pass for `region`
    ///
    /// The error is logged here, once, with the stage it happened in.
    pub async fn run_region(&self, region: Region) -> Result<RegionReport> {
        let mut tracker = StateTracker::default();
        match self.execute(region, &mut tracker).await {
            Ok(report) => {
                tracker.advance();
                Ok(report)
            }
            Err(e) => {
                error!(
                    %region,
                    stage = %tracker.state,
                    code = e.error_code(),
                    error = %e,
                    "region failed, aborting run"
                );
                tracker.fail();
                Err(e)
            }
        }
    }

    async fn execute(&self, region: Region, tracker: &mut StateTracker) -> Result<RegionReport> {
        tracker.advance();
        let info = self.fetcher.fetch(region).await?;

        tracker.advance();
        let bitmap = self.downloader.download(&info.source_url).await?;

        tracker.advance();
        let outputs = persist_all(&bitmap, &info, &self.output_dir)?;
        drop(bitmap);

        tracker.advance();
        let paths: Vec<PathBuf> = outputs.iter().map(|o| o.path.clone()).collect();
        let archive = build_archive(&self.output_dir, info.date, region, &paths)?;

        tracker.advance();
        let photo = photo_path(&self.output_dir, &info);
        self.notifier.notify(&photo, &archive, &info).await?;

        Ok(RegionReport {
            info,
            outputs,
            archive,
        })
    }
}

/// The HighQuality JPEG written by `persist_all`, sent as the photo message
fn photo_path(output_dir: &Path, info: &ImageInfo) -> PathBuf {
    artifact_path(
        output_dir,
        info.date,
        info.region,
        OutputRole::HighQuality.encoding().extension(),
    )
}

/// Current state of one region pass
#[derive(Debug)]
struct StateTracker {
    state: RunState,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
        }
    }
}

impl StateTracker {
    fn advance(&mut self) {
        let next = self.state.next();
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }

    fn fail(&mut self) {
        debug!(from = %self.state, "state transition to failed");
        self.state = RunState::Failed;
    }
}

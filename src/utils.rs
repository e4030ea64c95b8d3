//! Utility functions for artifact naming, file writes and HTTP setup

use crate::error::{Error, Result};
use crate::types::Region;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User agent sent with every HTTP request
pub const USER_AGENT: &str = concat!("bing-wallpaper/", env!("CARGO_PKG_VERSION"));

/// File name shared by every artifact of one region in one run
///
/// # Examples
///
/// ```
/// use bing_wallpaper::types::Region;
/// use bing_wallpaper::utils::artifact_file_name;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(artifact_file_name(date, Region::Global, "zip"), "2024-01-15(Global).zip");
/// ```
#[must_use]
pub fn artifact_file_name(date: NaiveDate, region: Region, extension: &str) -> String {
    format!("{}({}).{}", date.format("%Y-%m-%d"), region, extension)
}

/// Full artifact path inside `dir`
#[must_use]
pub fn artifact_path(dir: &Path, date: NaiveDate, region: Region, extension: &str) -> PathBuf {
    dir.join(artifact_file_name(date, region, extension))
}

/// Final path component as a string, if there is one
#[must_use]
pub fn base_file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Write a file atomically
///
/// The content is produced into a temporary file in the destination directory
/// and then renamed over `path`, replacing any existing file. Readers never
/// observe a half-written file, and a failed write leaves the previous file
/// untouched.
pub fn write_atomic<F>(path: &Path, write: F) -> std::io::Result<()>
where
    F: FnOnce(&mut std::fs::File) -> std::io::Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = artifact_temp_file(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Unix mode of every artifact written to the output directory
#[cfg(unix)]
pub const ARTIFACT_MODE: u32 = 0o644;

/// Temporary file in `dir` that will later be renamed onto an artifact path
///
/// `tempfile` creates owner-only files; the mode is widened to
/// [`ARTIFACT_MODE`] so the renamed artifact is world-readable.
pub fn artifact_temp_file(dir: &Path) -> std::io::Result<tempfile::NamedTempFile> {
    let tmp = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(ARTIFACT_MODE))?;
    }

    Ok(tmp)
}

/// Build the HTTP client shared by all stages
///
/// Every request made through the client is bounded by `timeout`.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::HttpClient(format!("failed to create HTTP client: {}", e)))
}

//! Configuration types for bing-wallpaper
//!
//! The configuration is built once at process entry, usually with
//! [`Config::from_env`], and passed by value into the pipeline. Nothing reads
//! the environment after that.

use crate::error::ConfigError;
use crate::types::Region;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Telegram bot token
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
/// Environment variable holding the target channel id
pub const ENV_CHANNEL_ID: &str = "TELEGRAM_CHANNEL_ID";
/// Environment variable overriding the Bot API base URL
pub const ENV_TELEGRAM_API_BASE: &str = "TELEGRAM_API_BASE";
/// Environment variable overriding the Bing base URL
pub const ENV_BING_BASE_URL: &str = "BING_BASE_URL";
/// Environment variable selecting how many days back to fetch
pub const ENV_BING_IMAGE_INDEX: &str = "BING_IMAGE_INDEX";
/// Environment variable for the artifact directory
pub const ENV_OUTPUT_DIR: &str = "WALLPAPER_OUTPUT_DIR";
/// Environment variable listing regions, comma separated
pub const ENV_REGIONS: &str = "WALLPAPER_REGIONS";
/// Environment variable for the per-request HTTP timeout
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";

/// Telegram Bot API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot credential
    pub bot_token: String,

    /// Channel id (numeric) or `@channelname`
    pub channel_id: String,

    /// Bot API base URL (default: "https://api.telegram.org")
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Bing endpoint settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BingConfig {
    /// Base URL for both the metadata endpoint and the image CDN
    /// (default: "https://www.bing.com")
    #[serde(default = "default_bing_base_url")]
    pub base_url: String,

    /// Days back from today (`idx` query parameter, default: 0)
    #[serde(default)]
    pub image_index: u32,
}

impl Default for BingConfig {
    fn default() -> Self {
        Self {
            base_url: default_bing_base_url(),
            image_index: 0,
        }
    }
}

/// Artifact output settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory holding images and archives (default: "static")
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Main configuration
///
/// Fields are grouped into sub-configs:
/// - [`telegram`](TelegramConfig) : bot credential and channel
/// - [`bing`](BingConfig) : metadata/CDN endpoint
/// - [`output`](OutputConfig) : artifact directory
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Telegram delivery settings
    pub telegram: TelegramConfig,

    /// Bing endpoint settings
    #[serde(default)]
    pub bing: BingConfig,

    /// Artifact output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Regions to process, in order (default: Global, China)
    #[serde(default = "default_regions")]
    pub regions: Vec<Region>,

    /// Timeout applied to every HTTP request (default: 30s)
    #[serde(default = "default_http_timeout", with = "duration_secs")]
    pub http_timeout: Duration,
}

impl Config {
    /// Build a config with the given credentials and defaults for everything else
    pub fn new(bot_token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            telegram: TelegramConfig {
                bot_token: bot_token.into(),
                channel_id: channel_id.into(),
                api_base: default_telegram_api_base(),
            },
            bing: BingConfig::default(),
            output: OutputConfig::default(),
            regions: default_regions(),
            http_timeout: default_http_timeout(),
        }
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the bot token or channel id is not
    /// set, and [`ConfigError::Invalid`] if an optional setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| ConfigError::Missing {
                key: key.to_string(),
            })
        };

        let mut config = Config::new(require(ENV_BOT_TOKEN)?, require(ENV_CHANNEL_ID)?);

        if let Some(base) = get(ENV_TELEGRAM_API_BASE) {
            config.telegram.api_base = trim_base(&base);
        }
        if let Some(base) = get(ENV_BING_BASE_URL) {
            config.bing.base_url = trim_base(&base);
        }
        if let Some(idx) = get(ENV_BING_IMAGE_INDEX) {
            config.bing.image_index = idx.parse().map_err(|e| ConfigError::Invalid {
                key: ENV_BING_IMAGE_INDEX.to_string(),
                reason: format!("{e}"),
            })?;
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            config.output.dir = PathBuf::from(dir);
        }
        if let Some(list) = get(ENV_REGIONS) {
            config.regions = parse_regions(&list)?;
        }
        if let Some(secs) = get(ENV_HTTP_TIMEOUT) {
            let secs: u64 = secs.parse().map_err(|e| ConfigError::Invalid {
                key: ENV_HTTP_TIMEOUT.to_string(),
                reason: format!("{e}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: ENV_HTTP_TIMEOUT.to_string(),
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_regions(list: &str) -> Result<Vec<Region>, ConfigError> {
    let mut regions = Vec::new();
    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
        let region: Region = part.parse().map_err(|reason| ConfigError::Invalid {
            key: ENV_REGIONS.to_string(),
            reason,
        })?;
        // A region listed twice would overwrite its own artifacts
        if !regions.contains(&region) {
            regions.push(region);
        }
    }
    if regions.is_empty() {
        return Err(ConfigError::Invalid {
            key: ENV_REGIONS.to_string(),
            reason: "no regions listed".to_string(),
        });
    }
    Ok(regions)
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_bing_base_url() -> String {
    "https://www.bing.com".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_regions() -> Vec<Region> {
    Region::DEFAULT_ORDER.to_vec()
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Serialize `Duration` as whole seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

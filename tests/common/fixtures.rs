//! Image bytes, metadata payloads and config builders

use bing_wallpaper::{Config, Region};
use image::{ImageEncoder, RgbImage};
use std::path::PathBuf;
use tempfile::TempDir;

/// Bot token used against the mock Telegram server
pub const TEST_TOKEN: &str = "4242:test-token";
/// Channel id used against the mock Telegram server
pub const TEST_CHANNEL: &str = "@daily_wallpaper_test";

/// `urlbase` returned by the Global metadata fixture
pub const GLOBAL_URLBASE: &str = "/th?id=OHR.Test";
/// `urlbase` returned by the China metadata fixture
pub const CHINA_URLBASE: &str = "/th?id=OHR.TestCN";

/// Small synthetic JPEG
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 3 % 256) as u8, (y * 3 % 256) as u8, 200])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .expect("encode fixture jpeg");
    buf
}

/// Metadata endpoint payload with a single image entry
pub fn metadata_json(enddate: &str, urlbase: &str, title: &str) -> serde_json::Value {
    serde_json::json!({
        "images": [{
            "startdate": "20240114",
            "fullstartdate": "202401141600",
            "enddate": enddate,
            "url": format!("{urlbase}_1920x1080.jpg&rf=LaDigue_1920x1080.jpg&pid=hp"),
            "urlbase": urlbase,
            "copyright": "Test lighthouse, Somewhere (© Test Photographer)",
            "copyrightlink": "https://www.bing.com/search?q=lighthouse",
            "title": title,
            "hsh": "0123456789abcdef"
        }],
        "tooltips": {"loading": "Loading..."}
    })
}

/// Test environment: output directory plus config pointing at the mock servers
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestEnv {
    /// Config for `regions` against the given mock server base URLs
    pub fn new(bing_uri: &str, telegram_uri: &str, regions: &[Region]) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut config = Config::new(TEST_TOKEN, TEST_CHANNEL);
        config.bing.base_url = bing_uri.to_string();
        config.telegram.api_base = telegram_uri.to_string();
        config.output.dir = temp_dir.path().join("static");
        config.regions = regions.to_vec();
        Self { temp_dir, config }
    }

    /// Artifact directory
    pub fn output_dir(&self) -> PathBuf {
        self.config.output.dir.clone()
    }

    /// Path of an artifact in the output directory
    pub fn artifact(&self, name: &str) -> PathBuf {
        self.output_dir().join(name)
    }

    /// Sorted file names currently in the output directory
    pub fn listing(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.output_dir()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

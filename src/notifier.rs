//! Telegram channel delivery.
//!
//! Two Bot API calls per region, strictly in order:
//!
//! 1. `sendPhoto` with the JPEG and a caption built by [`build_caption`]
//! 2. `sendDocument` with the zip archive, no caption
//!
//! If the first call fails the second is never made. Nothing is retried and
//! a sent photo is not withdrawn when the document fails.

use crate::config::TelegramConfig;
use crate::error::NotifyError;
use crate::types::ImageInfo;
use crate::utils::base_file_name;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Telegram's limit on photo captions, in characters
pub const MAX_CAPTION_CHARS: usize = 1024;

/// Bot API envelope; only the fields needed to detect rejection
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Build the photo caption
///
/// ```text
/// {title}
/// {copyright}
/// {date} ({region})
/// ```
///
/// Empty title or copyright lines are left out. The result is cut to
/// [`MAX_CAPTION_CHARS`].
pub fn build_caption(info: &ImageInfo) -> String {
    let footer = format!("{} ({})", info.date_string(), info.region);
    let caption = [info.title.trim(), info.copyright.trim(), footer.as_str()]
        .iter()
        .filter(|line| !line.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    if caption.chars().count() <= MAX_CAPTION_CHARS {
        caption
    } else {
        caption.chars().take(MAX_CAPTION_CHARS).collect()
    }
}

/// Sends the photo and archive messages to one channel
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    channel_id: String,
}

impl TelegramNotifier {
    /// Create a notifier using the shared HTTP client
    pub fn new(client: reqwest::Client, config: &TelegramConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            channel_id: config.channel_id.clone(),
        }
    }

    /// Send the photo message, then the archive message
    pub async fn notify(
        &self,
        photo: &Path,
        archive: &Path,
        info: &ImageInfo,
    ) -> Result<(), NotifyError> {
        let caption = build_caption(info);
        self.send_photo(photo, &caption).await?;
        info!(?photo, caption = %caption, "photo sent");

        self.send_document(archive).await?;
        info!(?archive, "archive sent");
        Ok(())
    }

    /// `sendPhoto` with a caption
    pub async fn send_photo(&self, photo: &Path, caption: &str) -> Result<(), NotifyError> {
        let part = attachment(photo, "image/jpeg").await?;
        let form = Form::new()
            .text("chat_id", self.channel_id.clone())
            .text("caption", caption.to_string())
            .part("photo", part);
        self.call("sendPhoto", form).await
    }

    /// `sendDocument` without a caption
    pub async fn send_document(&self, document: &Path) -> Result<(), NotifyError> {
        let part = attachment(document, "application/zip").await?;
        let form = Form::new()
            .text("chat_id", self.channel_id.clone())
            .part("document", part);
        self.call("sendDocument", form).await
    }

    async fn call(&self, method: &'static str, form: Form) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/{}", self.api_base, self.bot_token, method);
        debug!(method, channel = %self.channel_id, "calling Bot API");

        // Bot API URLs embed the token; keep it out of error messages
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| NotifyError::Network {
                method,
                source: e.without_url(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| NotifyError::Network {
            method,
            source: e.without_url(),
        })?;
        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(NotifyError::Rejected {
                method,
                status: status.as_u16(),
                description: api.description.unwrap_or_default(),
            }),
            None => Err(NotifyError::Rejected {
                method,
                status: status.as_u16(),
                description: format!("unexpected response body: {}", truncate(&body, 200)),
            }),
        }
    }
}

async fn attachment(path: &Path, mime: &str) -> Result<Part, NotifyError> {
    let attachment_err = |source| NotifyError::Attachment {
        path: path.to_path_buf(),
        source,
    };
    let bytes = tokio::fs::read(path).await.map_err(attachment_err)?;
    let name = base_file_name(path).unwrap_or_else(|| "attachment".to_string());
    Part::bytes(bytes)
        .file_name(name)
        .mime_str(mime)
        .map_err(|e| NotifyError::Network {
            method: "multipart",
            source: e,
        })
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

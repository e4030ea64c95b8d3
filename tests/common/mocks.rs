//! wiremock setups for the Bing endpoints and the Telegram Bot API

use super::fixtures::{TEST_TOKEN, jpeg_bytes, metadata_json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount the metadata endpoint for the default (Global) feed
pub async fn mount_global_metadata(server: &MockServer, enddate: &str, urlbase: &str) {
    Mock::given(method("GET"))
        .and(path("/HPImageArchive.aspx"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(metadata_json(enddate, urlbase, "Global")),
        )
        .mount(server)
        .await;
}

/// Mount the metadata endpoint for the China feed (`mkt=zh-CN`)
///
/// Takes priority over the Global mock for matching requests.
pub async fn mount_china_metadata(server: &MockServer, enddate: &str, urlbase: &str) {
    Mock::given(method("GET"))
        .and(path("/HPImageArchive.aspx"))
        .and(query_param("mkt", "zh-CN"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(metadata_json(enddate, urlbase, "China")),
        )
        .with_priority(1)
        .mount(server)
        .await;
}

/// Make the China feed answer with a server error
pub async fn mount_china_metadata_failure(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/HPImageArchive.aspx"))
        .and(query_param("mkt", "zh-CN"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Mount the HEAD availability check for `{urlbase}_UHD.jpg`
pub async fn mount_uhd_head(server: &MockServer, urlbase: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path("/th"))
        .and(query_param("id", format!("{}_UHD.jpg", image_id(urlbase))))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve JPEG bytes for `{urlbase}{suffix}`
pub async fn mount_image(server: &MockServer, urlbase: &str, suffix: &str) {
    Mock::given(method("GET"))
        .and(path("/th"))
        .and(query_param("id", format!("{}{suffix}", image_id(urlbase))))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/jpeg")
                .set_body_bytes(jpeg_bytes(64, 36)),
        )
        .mount(server)
        .await;
}

/// Mount a complete, healthy Bing feed for `urlbase` (metadata not included)
pub async fn mount_cdn(server: &MockServer, urlbase: &str) {
    mount_uhd_head(server, urlbase, 200).await;
    mount_image(server, urlbase, "_UHD.jpg").await;
}

/// Accept every `sendPhoto` and `sendDocument` call
pub async fn mount_telegram_ok(server: &MockServer) {
    for api_method in ["sendPhoto", "sendDocument"] {
        Mock::given(method("POST"))
            .and(path(format!("/bot{TEST_TOKEN}/{api_method}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "result": {"message_id": 7}})),
            )
            .mount(server)
            .await;
    }
}

/// Requests received by `server`, as `(method, path, query)` triples
pub async fn request_log(server: &MockServer) -> Vec<(String, String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| {
            (
                r.method.to_string(),
                r.url.path().to_string(),
                r.url.query().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

/// Lossy UTF-8 bodies of the requests received by `server`
pub async fn request_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect()
}

/// `OHR.Test` from `/th?id=OHR.Test`
fn image_id(urlbase: &str) -> &str {
    urlbase.split("id=").nth(1).unwrap_or(urlbase)
}

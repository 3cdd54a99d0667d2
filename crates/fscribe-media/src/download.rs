//! Streaming video download with non-media payload detection.
//!
//! Indirect links (redirect or confirmation pages) silently produce small
//! HTML payloads that would otherwise be mistaken for valid media and crash
//! the transcoding stages opaquely. Downloads are therefore rejected when
//! the response declares an HTML content type or the resulting file is
//! implausibly small.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{MediaError, MediaResult};

/// Minimum plausible size for a downloaded media file.
pub const MIN_MEDIA_BYTES: u64 = 1024;

/// How much of an HTML body to keep as an error preview.
const HTML_PREVIEW_CHARS: usize = 400;

/// Stream a remote resource to `dest`.
///
/// Redirects are followed. Fails on a non-success status, an HTML content
/// type, or a resulting file smaller than `min_bytes` (the undersized file
/// is removed before returning).
pub async fn fetch_to_local(
    http: &Client,
    url: &str,
    dest: &Path,
    min_bytes: u64,
) -> MediaResult<()> {
    let response = http.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(MediaError::download_failed(format!("HTTP {}", status)));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.contains("text/html") {
        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(HTML_PREVIEW_CHARS).collect();
        return Err(MediaError::NonMediaContent {
            content_type,
            preview,
        });
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    let size = tokio::fs::metadata(dest).await?.len();
    if size < min_bytes {
        let _ = tokio::fs::remove_file(dest).await;
        return Err(MediaError::FileTooSmall { size, content_type });
    }

    info!(
        url = %url,
        dest = %dest.display(),
        size_bytes = size,
        "Downloaded video"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/video.mp4"))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_fetch_writes_media_to_dest() {
        let body = vec![0u8; 4096];
        let server = serve(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(body.clone()),
        )
        .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("video.mp4");
        fetch_to_local(
            &Client::new(),
            &format!("{}/video.mp4", server.uri()),
            &dest,
            MIN_MEDIA_BYTES,
        )
        .await
        .unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_fetch_rejects_html_payload() {
        let server = serve(
            ResponseTemplate::new(200).set_body_raw(
                "<html><body>Please confirm the download</body></html>",
                "text/html; charset=utf-8",
            ),
        )
        .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("video.mp4");
        let err = fetch_to_local(
            &Client::new(),
            &format!("{}/video.mp4", server.uri()),
            &dest,
            MIN_MEDIA_BYTES,
        )
        .await
        .unwrap_err();

        match err {
            MediaError::NonMediaContent { preview, .. } => {
                assert!(preview.contains("confirm"));
            }
            other => panic!("expected NonMediaContent, got {:?}", other),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_fetch_rejects_undersized_file() {
        let server = serve(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .set_body_bytes(vec![0u8; 16]),
        )
        .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("video.mp4");
        let err = fetch_to_local(
            &Client::new(),
            &format!("{}/video.mp4", server.uri()),
            &dest,
            MIN_MEDIA_BYTES,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::FileTooSmall { size: 16, .. }));
        assert!(!dest.exists(), "undersized file should be removed");
    }

    #[tokio::test]
    async fn test_fetch_rejects_http_error() {
        let server = serve(ResponseTemplate::new(404)).await;

        let dir = TempDir::new().unwrap();
        let err = fetch_to_local(
            &Client::new(),
            &format!("{}/video.mp4", server.uri()),
            &dir.path().join("video.mp4"),
            MIN_MEDIA_BYTES,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::DownloadFailed { .. }));
    }
}

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use ankh_core::errors::CollaboratorError;
use ankh_core::OcrEngine;

/// Client for an OCR sidecar. Uploads the staged image as multipart
/// form data and returns the extracted text verbatim.
pub struct HttpOcrEngine {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct OcrResponse {
    text: String,
}

impl HttpOcrEngine {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn classify_transport(&self, e: reqwest::Error) -> CollaboratorError {
        if e.is_timeout() {
            CollaboratorError::Timeout(self.timeout)
        } else {
            CollaboratorError::NetworkError(e.to_string())
        }
    }
}

fn mime_for(image: &Path) -> &'static str {
    match image.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            "image/jpeg"
        }
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    fn name(&self) -> &str {
        "http-ocr"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn extract_text(
        &self,
        image: &Path,
        languages: &str,
    ) -> Result<String, CollaboratorError> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|e| CollaboratorError::InvalidRequest(format!("unreadable image file: {e}")))?;

        let file_name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(image))
            .map_err(|e| CollaboratorError::InvalidRequest(e.to_string()))?;
        let form = Form::new()
            .part("image", part)
            .text("languages", languages.to_string());

        let resp = self
            .client
            .post(format!("{}/ocr", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CollaboratorError::from_status(status, body));
        }

        let parsed: OcrResponse = resp
            .json()
            .await
            .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;

        // A blank page extracts to empty text. That is a valid answer
        // here; downstream validation decides whether to reject it.
        Ok(parsed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use wiremock::matchers;
    use wiremock::{Mock, ResponseTemplate};

    fn write_image(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"fake image bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn extracts_text_from_multipart_upload() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/ocr"))
            .and(matchers::body_string_contains("name=\"image\""))
            .and(matchers::body_string_contains("filename=\"scan.png\""))
            .and(matchers::body_string_contains("ara"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "نهر النيل"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = write_image(&dir, "scan.png");
        let client = HttpOcrEngine::new(&server.uri(), Duration::from_secs(5));
        let out = client.extract_text(&image, "ara").await.unwrap();
        assert_eq!(out, "نهر النيل");
    }

    #[tokio::test]
    async fn blank_page_is_ok() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/ocr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": ""
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = write_image(&dir, "blank.jpg");
        let client = HttpOcrEngine::new(&server.uri(), Duration::from_secs(5));
        assert_eq!(client.extract_text(&image, "ara").await.unwrap(), "");
    }

    #[tokio::test]
    async fn missing_file_is_invalid_request() {
        let client = HttpOcrEngine::new("http://127.0.0.1:1", Duration::from_secs(1));
        let err = client
            .extract_text(Path::new("/nonexistent/scan.png"), "ara")
            .await
            .unwrap_err();
        match err {
            CollaboratorError::InvalidRequest(msg) => assert!(msg.contains("unreadable")),
            other => panic!("expected InvalidRequest, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn service_error_maps_by_status() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/ocr"))
            .respond_with(ResponseTemplate::new(500).set_body_string("tesseract crashed"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = write_image(&dir, "scan.png");
        let client = HttpOcrEngine::new(&server.uri(), Duration::from_secs(5));
        let err = client.extract_text(&image, "ara").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::ServiceError { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_response_body() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/ocr"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = write_image(&dir, "scan.png");
        let client = HttpOcrEngine::new(&server.uri(), Duration::from_secs(5));
        let err = client.extract_text(&image, "ara").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/ocr"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "text": "late" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = write_image(&dir, "scan.png");
        let client = HttpOcrEngine::new(&server.uri(), Duration::from_millis(100));
        let err = client.extract_text(&image, "ara").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Timeout(_)));
    }

    #[test]
    fn mime_types_from_extension() {
        assert_eq!(mime_for(Path::new("a.png")), "image/png");
        assert_eq!(mime_for(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }
}

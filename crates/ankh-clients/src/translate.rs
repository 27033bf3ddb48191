use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use ankh_core::errors::CollaboratorError;
use ankh_core::Translator;

/// Client for a LibreTranslate-compatible translation service.
pub struct HttpTranslator {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl HttpTranslator {
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

#[async_trait]
impl Translator for HttpTranslator {
    fn name(&self) -> &str {
        "http-translate"
    }

    #[instrument(skip(self, text), fields(base_url = %self.base_url))]
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, CollaboratorError> {
        let body = serde_json::json!({
            "q": text,
            "source": source_lang,
            "target": target_lang,
            "format": "text",
        });

        let resp = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CollaboratorError::from_status(status, body));
        }

        let parsed: TranslateResponse = resp
            .json()
            .await
            .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;

        if parsed.translated_text.trim().is_empty() {
            return Err(CollaboratorError::EmptyResult);
        }

        Ok(parsed.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers;
    use wiremock::{Mock, ResponseTemplate};

    #[tokio::test]
    async fn translates_via_wire_format() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/translate"))
            .and(matchers::body_partial_json(serde_json::json!({
                "q": "نهر",
                "source": "ar",
                "target": "en",
                "format": "text",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "translatedText": "river"
            })))
            .mount(&server)
            .await;

        let client = HttpTranslator::new(&server.uri(), Duration::from_secs(5));
        let out = client.translate("نهر", "ar", "en").await.unwrap();
        assert_eq!(out, "river");
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_tolerated() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "translatedText": "ok"
            })))
            .mount(&server)
            .await;

        let base = format!("{}/", server.uri());
        let client = HttpTranslator::new(&base, Duration::from_secs(5));
        assert_eq!(client.translate("x", "ar", "en").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn client_error_status_maps_to_invalid_request() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/translate"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad source language"))
            .mount(&server)
            .await;

        let client = HttpTranslator::new(&server.uri(), Duration::from_secs(5));
        let err = client.translate("x", "zz", "en").await.unwrap_err();
        match err {
            CollaboratorError::InvalidRequest(body) => assert_eq!(body, "bad source language"),
            other => panic!("expected InvalidRequest, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_status_maps_to_service_error() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/translate"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = HttpTranslator::new(&server.uri(), Duration::from_secs(5));
        let err = client.translate("x", "ar", "en").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::ServiceError { status: 503, .. }));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .mount(&server)
            .await;

        let client = HttpTranslator::new(&server.uri(), Duration::from_secs(5));
        let err = client.translate("x", "ar", "en").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn blank_translation_is_empty_result() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "translatedText": "   "
            })))
            .mount(&server)
            .await;

        let client = HttpTranslator::new(&server.uri(), Duration::from_secs(5));
        let err = client.translate("x", "ar", "en").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::EmptyResult));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = wiremock::MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/translate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "translatedText": "late" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpTranslator::new(&server.uri(), Duration::from_millis(100));
        let err = client.translate("x", "ar", "en").await.unwrap_err();
        match err {
            CollaboratorError::Timeout(d) => assert_eq!(d, Duration::from_millis(100)),
            other => panic!("expected Timeout, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        // Port 1 is never listening.
        let client = HttpTranslator::new("http://127.0.0.1:1", Duration::from_secs(1));
        let err = client.translate("x", "ar", "en").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::NetworkError(_)));
    }
}

//! HTTP handlers for the translation endpoints.

use std::io::Write;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use ankh_core::errors::PipelineError;
use ankh_core::{TranslationOutcome, WordCount};

use crate::error::ApiError;
use crate::server::AppState;

/// Rows returned by the chart endpoint when no `limit` is given.
pub const DEFAULT_CHART_LIMIT: usize = 10;
/// Upper bound on the `limit` query parameter.
pub const MAX_CHART_LIMIT: usize = 1000;

#[derive(Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct OcrResponse {
    pub text: String,
}

#[derive(Deserialize)]
pub struct ChartParams {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct TotalResponse {
    pub total_translated_words: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

/// `POST /translate` with `{"text": "..."}`.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslationOutcome>, ApiError> {
    let text = match payload {
        Ok(Json(req)) => req.text.unwrap_or_default(),
        Err(rejection) => {
            return Err(
                PipelineError::Validation(format!("invalid request body: {rejection}")).into(),
            );
        }
    };

    let outcome = state.pipeline.translate_text(&text).await?;
    Ok(Json(outcome))
}

/// `POST /ocr` with a multipart `image` field. Returns the extracted
/// text only; the client feeds it back through `/translate`.
pub async fn ocr(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>, ApiError> {
    let mut multipart = multipart
        .map_err(|rejection| PipelineError::Validation(format!("invalid upload: {rejection}")))?;

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(PipelineError::Validation("no image provided".into()).into());
        }

        let ext = match file_name.rsplit_once('.') {
            Some((_, e)) if !e.is_empty() => e.to_ascii_lowercase(),
            _ => String::new(),
        };
        if !state.config.is_allowed_extension(&ext) {
            return Err(PipelineError::UnsupportedMedia(format!(
                "{file_name:?} (allowed: {})",
                state.config.allowed_image_ext.join(", ")
            ))
            .into());
        }

        let bytes = field.bytes().await.map_err(bad_upload)?;
        if bytes.is_empty() {
            return Err(PipelineError::Validation("empty image upload".into()).into());
        }

        // Stage the upload as a real file for the OCR collaborator.
        // Dropping `staged` removes it on every exit path.
        let mut staged = tempfile::Builder::new()
            .prefix("ankh-upload-")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .map_err(|e| PipelineError::Internal(format!("failed to stage upload: {e}")))?;
        staged
            .write_all(&bytes)
            .map_err(|e| PipelineError::Internal(format!("failed to stage upload: {e}")))?;

        let text = state.pipeline.extract_text(staged.path()).await?;
        return Ok(Json(OcrResponse { text }));
    }

    Err(PipelineError::Validation("no image provided".into()).into())
}

fn bad_upload(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError(PipelineError::Validation(format!("invalid upload: {e}")))
}

/// `GET /api/chart-data?limit=N`, most frequent words first.
pub async fn chart_data(
    State(state): State<AppState>,
    params: Result<Query<ChartParams>, QueryRejection>,
) -> Result<Json<Vec<WordCount>>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        PipelineError::Validation(format!("invalid query string: {rejection}"))
    })?;

    let limit = params
        .limit
        .unwrap_or(DEFAULT_CHART_LIMIT)
        .clamp(1, MAX_CHART_LIMIT);
    let rows = state.pipeline.word_frequencies(limit)?;
    Ok(Json(rows))
}

/// `GET /total-translated-words`.
pub async fn total_words(State(state): State<AppState>) -> Result<Json<TotalResponse>, ApiError> {
    let total = state.pipeline.total_words()?;
    Ok(Json(TotalResponse {
        total_translated_words: total,
    }))
}

/// `GET /health`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HinglishError;
use crate::workflow::{DependencyStatus, TranscribeOptions, TranscriptionOutcome};
use super::AppState;

/// Multipart field carrying the media file
const FILE_FIELD: &str = "file";

fn default_language() -> String {
    "auto".to_string()
}

fn default_translate() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct TranscribeParams {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_translate")]
    pub translate_to_hinglish: bool,
}

#[derive(Serialize)]
pub struct Endpoints {
    pub transcribe: &'static str,
    pub health: &'static str,
}

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub model: String,
    pub ffmpeg_available: bool,
    pub translation_available: bool,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(flatten)]
    pub dependencies: DependencyStatus,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Workflow failure rendered as a JSON error response
#[derive(Debug)]
pub struct ApiError(pub HinglishError);

impl From<HinglishError> for ApiError {
    fn from(err: HinglishError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let detail = match &self.0 {
            HinglishError::Transcriber(_)
            | HinglishError::TranscriptionTimeout(_)
            | HinglishError::NoSubtitles
            | HinglishError::FfmpegRequired
            | HinglishError::InvalidUpload(_)
            | HinglishError::UnsupportedFormat(_) => self.0.to_string(),
            other => format!("Transcription failed: {}", other),
        };

        tracing::error!(status = %status, "{}", detail);
        (status, Json(ErrorBody { detail })).into_response()
    }
}

pub async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.workflow.dependency_status();

    Json(RootResponse {
        message: "Whisper.cpp Transcription API with Hinglish translation",
        status: "running",
        model: state.workflow.model_name(),
        ffmpeg_available: status.ffmpeg_available,
        translation_available: status.translation_available,
        endpoints: Endpoints {
            transcribe: "/transcribe",
            health: "/health",
        },
    })
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            dependencies: state.workflow.dependency_status(),
        }),
    )
}

#[tracing::instrument(skip(state, multipart), fields(request_id = %Uuid::new_v4()))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    Query(params): Query<TranscribeParams>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionOutcome>, ApiError> {
    let (filename, data) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| HinglishError::InvalidUpload(format!("Failed to read multipart: {}", e)))?
            .ok_or_else(|| HinglishError::InvalidUpload("No file uploaded".to_string()))?;

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| HinglishError::InvalidUpload(format!("Failed to read file: {}", e)))?;
        break (filename, data);
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "File data received");

    let options = TranscribeOptions {
        language: params.language,
        translate_to_hinglish: params.translate_to_hinglish,
    };

    let outcome = state.workflow.process_upload(&filename, &data, &options).await?;
    Ok(Json(outcome))
}

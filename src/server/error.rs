//! HTTP error mapping.
//!
//! Client mistakes get a 400 with a specific message; anything that goes
//! wrong while rendering collapses into a 500 whose `error` text is
//! `"An error occurred: <detail>"`. The full error is logged server-side.

use crate::error::ExtractError;
use crate::filename::FALLBACK_FILENAME;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    // ── /api/extract-first-page ───────────────────────────────────────────
    /// No `pdf` file part in the form (or the body is not multipart at all).
    #[error("No file uploaded")]
    MissingFile,

    /// A `pdf` file part was sent with an empty filename.
    #[error("No file selected")]
    EmptyFileName,

    /// The multipart body could not be read (truncated, over the size limit).
    #[error("Failed to read upload: {0}")]
    Upload(#[from] MultipartError),

    /// Rendering failed for any reason.
    #[error("An error occurred: {0}")]
    Processing(#[from] ExtractError),

    // ── /api/normalize-filename ───────────────────────────────────────────
    /// Body is not a JSON object with a string `filename`.
    #[error("No filename provided")]
    MissingFilename,

    /// `filename` is null or whitespace only.
    #[error("Empty filename")]
    BlankFilename,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        match self {
            ApiError::MissingFile | ApiError::EmptyFileName => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::MissingFilename | ApiError::BlankFilename => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": message,
                    "normalized_filename": FALLBACK_FILENAME,
                })),
            )
                .into_response(),
            ApiError::Upload(e) => {
                let status = e.status();
                warn!("Rejected upload ({}): {}", status, e);
                (status, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Processing(e) => {
                error!("Extraction failed: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}

use crate::extract;
use crate::filename;
use crate::options::RenderOptions;
use crate::pipeline::encode;
use crate::server::error::ApiError;
use crate::server::models::{ExtractResponse, NormalizeResponse};
use crate::server::upload;
use crate::server::AppState;
use crate::templates::TemplateTable;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// `GET /api/dropdown-options`
///
/// Serializes straight from the shared table; nothing is copied per request.
pub async fn dropdown_options(State(state): State<AppState>) -> Json<Arc<TemplateTable>> {
    Json(Arc::clone(&state.templates))
}

/// `POST /api/normalize-filename`
///
/// Accepts any body; only a JSON object with a string `filename` member is
/// usable. The content type is not checked.
pub async fn normalize_filename(body: Bytes) -> Result<Json<NormalizeResponse>, ApiError> {
    let payload: Option<Value> = serde_json::from_slice(&body).ok();
    let raw = payload
        .as_ref()
        .and_then(Value::as_object)
        .and_then(|obj| obj.get("filename"))
        .ok_or(ApiError::MissingFilename)?;

    let name = match raw {
        Value::Null => "",
        Value::String(s) => s.as_str(),
        _ => return Err(ApiError::MissingFilename),
    };
    info!("Received filename normalization request: {:?}", name);

    if name.trim().is_empty() {
        return Err(ApiError::BlankFilename);
    }

    let normalized_filename = filename::normalize_filename(name);
    info!("Normalized result: {}", normalized_filename);

    Ok(Json(NormalizeResponse {
        normalized_filename,
    }))
}

/// `POST /api/extract-first-page`
///
/// Width, height and bgcolor are resolved and echoed back, but the render is
/// requested with scaling off, so they do not change the returned pixels.
pub async fn extract_first_page(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        debug!("Not a multipart request: {}", rejection);
        ApiError::MissingFile
    })?;

    let form = upload::parse_extract_form(multipart).await?;
    let file = form.file.ok_or(ApiError::MissingFile)?;
    if file.filename.is_empty() {
        return Err(ApiError::EmptyFileName);
    }

    let options = RenderOptions::resolve(&state.templates, &form.overrides)?;
    info!(
        "Extracting first page of '{}' (template={:?}, {}x{}, bgcolor={})",
        file.filename, options.template, options.width, options.height, options.background
    );

    let image =
        extract::extract_first_page(file.data, file.filename, &options, false, &state.pdfium)
            .await?;

    Ok(Json(ExtractResponse {
        image_data: encode::to_base64(&image.bytes),
        is_landscape: image.is_landscape,
        pdf_filename: image.filename,
        width: options.width,
        height: options.height,
        bgcolor: options.background,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::PdfiumLibrary;

    #[tokio::test]
    async fn dropdown_options_shares_the_table() {
        let state = AppState::new(TemplateTable::builtin(), PdfiumLibrary::System);
        let Json(table) = dropdown_options(State(state.clone())).await;
        assert!(Arc::ptr_eq(&table, &state.templates));
        assert_eq!(Arc::strong_count(&state.templates), 2);
    }

    #[tokio::test]
    async fn normalize_rejects_non_string_filename() {
        let err = normalize_filename(Bytes::from_static(br#"{"filename": 42}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingFilename));
    }
}

use serde::Serialize;

/// Success body of `POST /api/extract-first-page`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    /// Base64 JPEG of the first page.
    pub image_data: String,
    pub is_landscape: bool,
    pub pdf_filename: String,
    pub width: u32,
    pub height: u32,
    pub bgcolor: String,
}

/// Success body of `POST /api/normalize-filename`.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeResponse {
    pub normalized_filename: String,
}

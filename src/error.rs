//! Error types for the pdfcover library.
//!
//! * [`ExtractError`] covers everything that can go wrong between receiving
//!   PDF bytes and handing back a JPEG: unreadable input, bad sizing
//!   parameters, pdfium failures and image encoding.
//!
//! * [`TemplateError`] is a startup-only failure while loading a template
//!   table from disk.
//!
//! HTTP status mapping lives in [`crate::server::error`]; nothing in this
//! module knows about the wire format.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The buffer is not a PDF, or pdfium refused to open it.
    #[error("File is not a valid PDF: {detail}")]
    InvalidPdf { detail: String },

    /// The PDF opened but has no pages to render.
    #[error("PDF has no pages")]
    EmptyDocument,

    /// A sizing or colour parameter could not be interpreted.
    #[error("Invalid value {value:?} for '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// pdfium returned an error while rasterising the first page.
    #[error("Rasterisation of the first page failed: {detail}")]
    RenderFailed { detail: String },

    /// JPEG encode or decode failed.
    #[error("Image encoding failed: {detail}")]
    EncodeFailed { detail: String },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or let `pdfcover serve` download it on startup."
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ExtractError::InvalidParameter {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for ExtractError {
    fn from(e: image::ImageError) -> Self {
        ExtractError::EncodeFailed {
            detail: e.to_string(),
        }
    }
}

/// Failure loading a template table from a JSON file.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template file '{path}' is not a valid template table: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An entry has a zero width or height.
    #[error("Template '{key}' has a zero dimension ({width}x{height})")]
    ZeroDimension { key: String, width: u32, height: u32 },
}

/// Invalid server configuration, raised by the config builder.
#[derive(Debug, Error)]
#[error("Invalid configuration: {0}")]
pub struct ConfigError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let e = ExtractError::invalid_parameter("width", "abc", "expected a positive integer");
        let msg = e.to_string();
        assert!(msg.contains("width"), "got: {msg}");
        assert!(msg.contains("\"abc\""), "got: {msg}");
    }

    #[test]
    fn invalid_pdf_display() {
        let e = ExtractError::InvalidPdf {
            detail: "missing %PDF header".into(),
        };
        assert!(e.to_string().contains("missing %PDF header"));
    }

    #[test]
    fn empty_document_display() {
        assert_eq!(ExtractError::EmptyDocument.to_string(), "PDF has no pages");
    }

    #[test]
    fn zero_dimension_display() {
        let e = TemplateError::ZeroDimension {
            key: "banner".into(),
            width: 0,
            height: 90,
        };
        assert!(e.to_string().contains("banner"));
        assert!(e.to_string().contains("0x90"));
    }
}

//! PDF rasterisation: render the first page of an in-memory PDF via pdfium.
//!
//! pdfium is a C++ library with process-global state. Every call here is
//! blocking and must run off the async executor (see
//! [`crate::extract::extract_first_page`]).
//!
//! The library binding and the opened document are both locals of
//! [`render_first_page`], so pdfium releases the document on every exit path
//! when they go out of scope, including the early `?` returns.

use crate::error::ExtractError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output resolution for the first-page raster.
pub const RENDER_DPI: f32 = 300.0;

/// PDF user-space units per inch.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// How far into the buffer the `%PDF` marker may appear.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Where the pdfium shared library comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PdfiumLibrary {
    /// Let the OS loader find `libpdfium` on its default search path.
    #[default]
    System,
    /// A specific library file, usually resolved by `pdfium-auto` at startup.
    Path(PathBuf),
}

impl PdfiumLibrary {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        PdfiumLibrary::Path(path.into())
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            PdfiumLibrary::System => None,
            PdfiumLibrary::Path(p) => Some(p),
        }
    }

    /// Bind a fresh [`Pdfium`] instance.
    pub fn bind(&self) -> Result<Pdfium, ExtractError> {
        match self {
            PdfiumLibrary::System => Pdfium::bind_to_system_library()
                .map(Pdfium::new)
                .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{:?}", e))),
            PdfiumLibrary::Path(path) => pdfium_auto::bind_pdfium_from_path(path)
                .map_err(|e| ExtractError::PdfiumBindingFailed(e.to_string())),
        }
    }
}

/// Cheap sanity check before handing bytes to pdfium.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(4).any(|w| w == b"%PDF")
}

/// Rasterise page 0 of `pdf_bytes` at [`RENDER_DPI`].
pub fn render_first_page(
    library: &PdfiumLibrary,
    pdf_bytes: &[u8],
) -> Result<DynamicImage, ExtractError> {
    if !looks_like_pdf(pdf_bytes) {
        let head_len = pdf_bytes.len().min(4);
        return Err(ExtractError::InvalidPdf {
            detail: format!(
                "missing %PDF header (first bytes: {:?})",
                &pdf_bytes[..head_len]
            ),
        });
    }

    let pdfium = library.bind()?;

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| ExtractError::InvalidPdf {
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let total_pages = pages.len();
    info!("PDF loaded: {total_pages} pages, {} bytes", pdf_bytes.len());
    if total_pages == 0 {
        return Err(ExtractError::EmptyDocument);
    }

    let page = pages.get(0).map_err(|e| ExtractError::RenderFailed {
        detail: format!("{:?}", e),
    })?;

    let render_config =
        PdfRenderConfig::new().scale_page_by_factor(RENDER_DPI / PDF_POINTS_PER_INCH);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| ExtractError::RenderFailed {
            detail: format!("{:?}", e),
        })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered first page → {}x{} px",
        image.width(),
        image.height()
    );

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_at_start() {
        assert!(looks_like_pdf(b"%PDF-1.7\n..."));
    }

    #[test]
    fn header_after_junk() {
        let mut bytes = vec![b' '; 100];
        bytes.extend_from_slice(b"%PDF-1.4");
        assert!(looks_like_pdf(&bytes));
    }

    #[test]
    fn header_past_window_is_rejected() {
        let mut bytes = vec![b'x'; HEADER_SEARCH_WINDOW + 10];
        bytes.extend_from_slice(b"%PDF-1.4");
        assert!(!looks_like_pdf(&bytes));
    }

    #[test]
    fn empty_and_short_buffers() {
        assert!(!looks_like_pdf(b""));
        assert!(!looks_like_pdf(b"%PD"));
    }

    #[test]
    fn non_pdf_fails_before_binding() {
        // Uses a library path that cannot exist: the header check must
        // reject the input before pdfium is ever touched.
        let lib = PdfiumLibrary::from_path("/nonexistent/libpdfium.so");
        let err = render_first_page(&lib, b"GIF89a not a pdf").unwrap_err();
        assert!(
            matches!(err, ExtractError::InvalidPdf { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn bad_library_path_is_binding_error() {
        let lib = PdfiumLibrary::from_path("/nonexistent/libpdfium.so");
        let err = render_first_page(&lib, b"%PDF-1.4\n%%EOF").unwrap_err();
        assert!(
            matches!(err, ExtractError::PdfiumBindingFailed(_)),
            "got {err:?}"
        );
    }

    #[test]
    fn scale_factor_is_300_dpi() {
        let scale = RENDER_DPI / PDF_POINTS_PER_INCH;
        assert!((scale - 4.1666665).abs() < 1e-5);
    }
}

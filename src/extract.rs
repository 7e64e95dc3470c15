//! First-page extraction entry points.
//!
//! [`extract_first_page`] is what the HTTP handler and the CLI call. It moves
//! the pdfium work onto Tokio's blocking pool and returns an
//! [`ExtractedImage`] holding JPEG bytes plus the orientation of the page.

use crate::error::ExtractError;
use crate::options::RenderOptions;
use crate::pipeline::render::PdfiumLibrary;
use crate::pipeline::{color, composite, encode, render};
use image::DynamicImage;
use std::time::Instant;
use tracing::{debug, info};

/// The rendered first page, ready to be base64-encoded or written to disk.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// JPEG bytes.
    pub bytes: Vec<u8>,
    /// `true` when the 300-DPI render is wider than it is tall.
    pub is_landscape: bool,
    /// Upload filename as received, passed through unchanged.
    pub filename: String,
    /// Size of the 300-DPI render, before any compositing.
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Render the first page of `pdf_bytes` to JPEG.
///
/// With `apply_scaling = false` the 300-DPI render is returned as-is and
/// `options` only matters to the caller. With `apply_scaling = true` the
/// render is letterboxed onto an `options.width × options.height` canvas
/// filled with `options.background`.
pub async fn extract_first_page(
    pdf_bytes: Vec<u8>,
    filename: impl Into<String>,
    options: &RenderOptions,
    apply_scaling: bool,
    library: &PdfiumLibrary,
) -> Result<ExtractedImage, ExtractError> {
    let filename = filename.into();
    let options = options.clone();
    let library = library.clone();

    tokio::task::spawn_blocking(move || {
        extract_first_page_blocking(&pdf_bytes, filename, &options, apply_scaling, &library)
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of [`extract_first_page`].
pub fn extract_first_page_blocking(
    pdf_bytes: &[u8],
    filename: String,
    options: &RenderOptions,
    apply_scaling: bool,
    library: &PdfiumLibrary,
) -> Result<ExtractedImage, ExtractError> {
    let start = Instant::now();

    let raster = render::render_first_page(library, pdf_bytes)?;
    let (pixel_width, pixel_height) = (raster.width(), raster.height());
    let is_landscape = pixel_width > pixel_height;

    let jpeg = encode::encode_jpeg(&raster, encode::RENDER_JPEG_QUALITY)?;
    drop(raster);

    let bytes = if apply_scaling {
        composite_jpeg(&jpeg, options)?
    } else {
        jpeg
    };

    info!(
        "Extracted first page of '{}': {}x{} px, landscape={}, {} bytes in {}ms",
        filename,
        pixel_width,
        pixel_height,
        is_landscape,
        bytes.len(),
        start.elapsed().as_millis()
    );

    Ok(ExtractedImage {
        bytes,
        is_landscape,
        filename,
        pixel_width,
        pixel_height,
    })
}

/// Decode the raw render, letterbox it and re-encode.
fn composite_jpeg(jpeg: &[u8], options: &RenderOptions) -> Result<Vec<u8>, ExtractError> {
    let background = color::parse_color(&options.background)?;
    let decoded = encode::decode_jpeg(jpeg)?;
    debug!(
        "Compositing onto {}x{} canvas, background {}",
        options.width, options.height, options.background
    );
    let canvas = composite::fit_and_center(&decoded, options.width, options.height, background);
    let canvas = DynamicImage::ImageRgb8(canvas);
    let out = encode::encode_jpeg(&canvas, encode::COMPOSITE_JPEG_QUALITY)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample_jpeg(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([20, 20, 20])));
        encode::encode_jpeg(&img, encode::RENDER_JPEG_QUALITY).unwrap()
    }

    #[test]
    fn composite_produces_canvas_size() {
        let options = RenderOptions {
            width: 120,
            height: 80,
            background: "#ff0000".into(),
            template: None,
        };
        let out = composite_jpeg(&sample_jpeg(300, 400), &options).unwrap();
        let decoded = encode::decode_jpeg(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    #[test]
    fn composite_rejects_bad_background() {
        let options = RenderOptions {
            background: "not-a-colour".into(),
            ..RenderOptions::default()
        };
        let err = composite_jpeg(&sample_jpeg(10, 10), &options).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::InvalidParameter { name: "bgcolor", .. }
        ));
    }

    #[tokio::test]
    async fn non_pdf_bytes_are_rejected() {
        let err = extract_first_page(
            b"hello world".to_vec(),
            "hello.txt",
            &RenderOptions::default(),
            false,
            &PdfiumLibrary::System,
        )
        .await
        .unwrap_err();
        assert!(
            matches!(err, ExtractError::InvalidPdf { .. }),
            "got {err:?}"
        );
    }
}

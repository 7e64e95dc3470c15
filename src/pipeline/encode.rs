//! JPEG encoding/decoding and base64 wrapping.
//!
//! The raw render is encoded at quality 95 so that text on the page stays
//! crisp; the composited canvas uses 75, the usual default for a web
//! thumbnail. JPEG has no alpha channel, so RGBA rasters are flattened to RGB
//! first (pdfium already paints an opaque white page background).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

/// Quality for the direct 300-DPI render.
pub const RENDER_JPEG_QUALITY: u8 = 95;

/// Quality for the fit-and-center canvas.
pub const COMPOSITE_JPEG_QUALITY: u8 = 75;

/// Encode an image as baseline JPEG.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&rgb)?;
    debug!(
        "Encoded {}x{} image → {} bytes JPEG (q={})",
        rgb.width(),
        rgb.height(),
        buf.len(),
        quality
    );
    Ok(buf)
}

/// Decode JPEG bytes back into an image.
pub fn decode_jpeg(bytes: &[u8]) -> Result<DynamicImage, image::ImageError> {
    image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
}

/// Standard (padded) base64 of the image bytes, as sent in `image_data`.
pub fn to_base64(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded image → {} bytes base64", b64.len());
    b64
}

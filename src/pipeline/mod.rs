//! Pipeline stages for first-page extraction.
//!
//! Each submodule implements one transformation step and is testable on its
//! own. [`crate::extract`] wires them together.
//!
//! ## Data Flow
//!
//! ```text
//! render ──▶ encode ──▶ [ composite ──▶ encode ] ──▶ bytes
//! (pdfium)   (JPEG)       (optional, needs color)
//! ```
//!
//! 1. [`render`]: bind pdfium, open the buffer, rasterise page 0 at 300 DPI
//! 2. [`encode`]: JPEG encode/decode and base64 wrapping
//! 3. [`color`]: parse the background colour string
//! 4. [`composite`]: shrink-to-fit and center on a fixed canvas

pub mod color;
pub mod composite;
pub mod encode;
pub mod render;

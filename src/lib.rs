//! # pdfcover
//!
//! Render the first page of an uploaded PDF to a JPEG, normalize the upload's
//! filename into a `.jpg` slug, and serve both over a small JSON API that
//! backs a form-driven web client.
//!
//! ## Pipeline Overview
//!
//! ```text
//! multipart upload
//!  │
//!  ├─ 1. Options   defaults ◀ template preset ◀ explicit form values
//!  ├─ 2. Render    page 0 at 300 DPI via pdfium (spawn_blocking)
//!  ├─ 3. Encode    raster → JPEG, landscape = width > height
//!  ├─ 4. Composite optional shrink-to-fit + center on a W×H canvas
//!  └─ 5. Respond   base64 JPEG + resolved options as JSON
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfcover::{extract_first_page, PdfiumLibrary, RenderOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("brochure.pdf")?;
//!     let image = extract_first_page(
//!         bytes,
//!         "brochure.pdf",
//!         &RenderOptions::default(),
//!         false,
//!         &PdfiumLibrary::System,
//!     )
//!     .await?;
//!     std::fs::write(pdfcover::normalize_filename(&image.filename), &image.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfcover` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod filename;
pub mod options;
pub mod pipeline;
pub mod server;
pub mod templates;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{ConfigError, ExtractError, TemplateError};
pub use extract::{extract_first_page, extract_first_page_blocking, ExtractedImage};
pub use filename::normalize_filename;
pub use options::{OptionOverrides, RenderOptions};
pub use pipeline::render::PdfiumLibrary;
pub use server::{router, serve, AppState};
pub use templates::{TemplateOptions, TemplateTable};

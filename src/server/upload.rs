use crate::options::OptionOverrides;
use crate::server::error::ApiError;
use axum::extract::Multipart;
use tracing::debug;

/// The uploaded PDF part.
pub struct UploadedPdf {
    /// Filename as sent by the client; may be empty.
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed fields of an extraction request.
pub struct ExtractForm {
    /// `None` when no `pdf` file part was present.
    pub file: Option<UploadedPdf>,
    pub overrides: OptionOverrides,
}

/// Parse the multipart form for `/api/extract-first-page`.
///
/// Only a `pdf` part that carries a filename counts as a file; a plain text
/// field named `pdf` is ignored. For repeated fields the first one wins.
pub async fn parse_extract_form(mut multipart: Multipart) -> Result<ExtractForm, ApiError> {
    let mut file: Option<UploadedPdf> = None;
    let mut overrides = OptionOverrides::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" if file.is_none() && field.file_name().is_some() => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?.to_vec();
                debug!("Received PDF part '{}' ({} bytes)", filename, data.len());
                file = Some(UploadedPdf { filename, data });
            }
            "template" => set_first(&mut overrides.template, field.text().await?),
            "width" => set_first(&mut overrides.width, field.text().await?),
            "height" => set_first(&mut overrides.height, field.text().await?),
            "bgcolor" => set_first(&mut overrides.bgcolor, field.text().await?),
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await?;
            }
        }
    }

    Ok(ExtractForm { file, overrides })
}

fn set_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

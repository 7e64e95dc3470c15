//! Template presets: named width/height/background combinations.
//!
//! The table is built once at startup, either from the compiled-in presets or
//! from a JSON file, and shared read-only behind an `Arc` for the lifetime of
//! the server. The JSON shape is the same one served by
//! `GET /api/dropdown-options`:
//!
//! ```json
//! {
//!   "instagram_post": {
//!     "name": "Instagram Post", "width": 1080, "height": 1080, "bgcolor": "#ffffff"
//!   },
//!   "leaderboard": { "name": "Leaderboard Banner", "width": 728, "height": 90 }
//! }
//! ```

use crate::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[rustfmt::skip]
const BUILTIN_PRESETS: &[(&str, &str, u32, u32, Option<&str>)] = &[
    // key                 label                    width  height  bgcolor
    ("instagram_post",    "Instagram Post",        1080,  1080,   Some("#ffffff")),
    ("instagram_story",   "Instagram Story",       1080,  1920,   Some("#000000")),
    ("facebook_cover",    "Facebook Cover",        820,   312,    Some("#ffffff")),
    ("twitter_header",    "Twitter Header",        1500,  500,    Some("#ffffff")),
    ("linkedin_post",     "LinkedIn Post",         1200,  627,    Some("#f3f2ef")),
    ("youtube_thumbnail", "YouTube Thumbnail",     1280,  720,    Some("#000000")),
    ("leaderboard",       "Leaderboard Banner",    728,   90,     None),
    ("medium_rectangle",  "Medium Rectangle",      300,   250,    None),
    ("a4_portrait",       "A4 Portrait (72 dpi)",  595,   842,    Some("#ffffff")),
];

/// One preset entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOptions {
    /// Label shown by the client in its selection control.
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Background colour; when absent the request keeps its current default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgcolor: Option<String>,
}

impl TemplateOptions {
    fn new(name: &str, width: u32, height: u32, bgcolor: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            bgcolor: bgcolor.map(str::to_string),
        }
    }
}

/// Immutable mapping from template key to [`TemplateOptions`].
///
/// Keys are kept sorted so the listing endpoint returns a stable document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateTable {
    entries: BTreeMap<String, TemplateOptions>,
}

impl TemplateTable {
    /// The presets compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_PRESETS
                .iter()
                .map(|&(key, name, width, height, bgcolor)| {
                    let opts = TemplateOptions::new(name, width, height, bgcolor);
                    (key.to_string(), opts)
                })
                .collect(),
        }
    }

    /// Load a table from a JSON file with the listing-endpoint shape.
    pub fn from_json_file(path: &Path) -> Result<Self, TemplateError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table: TemplateTable =
            serde_json::from_str(&raw).map_err(|source| TemplateError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        table.validate()?;
        info!(
            "Loaded {} templates from {}",
            table.entries.len(),
            path.display()
        );
        Ok(table)
    }

    /// Build from explicit entries (used by tests and embedders).
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, TemplateOptions)>,
    ) -> Result<Self, TemplateError> {
        let table = Self {
            entries: entries.into_iter().collect(),
        };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), TemplateError> {
        for (key, opts) in &self.entries {
            if opts.width == 0 || opts.height == 0 {
                return Err(TemplateError::ZeroDimension {
                    key: key.clone(),
                    width: opts.width,
                    height: opts.height,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&TemplateOptions> {
        let found = self.entries.get(key);
        debug!("Template lookup '{}' → {}", key, found.is_some());
        found
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_has_positive_dimensions() {
        let table = TemplateTable::builtin();
        assert!(!table.is_empty());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn missing_bgcolor_is_omitted_from_json() {
        let table = TemplateTable::builtin();
        let json = serde_json::to_value(&table).unwrap();
        let leaderboard = &json["leaderboard"];
        assert_eq!(leaderboard["width"], 728);
        assert!(leaderboard.get("bgcolor").is_none());
        assert_eq!(json["instagram_post"]["bgcolor"], "#ffffff");
    }

    #[test]
    fn serializes_as_flat_object() {
        let table = TemplateTable::builtin();
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_object());
        assert_eq!(json.as_object().unwrap().len(), table.len());
    }

    #[test]
    fn loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{"banner": {{"name": "Banner", "width": 468, "height": 60, "bgcolor": "#eeeeee"}},
                "square": {{"width": 500, "height": 500}}}}"##
        )
        .unwrap();

        let table = TemplateTable::from_json_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        let banner = table.get("banner").unwrap();
        assert_eq!((banner.width, banner.height), (468, 60));
        assert_eq!(banner.bgcolor.as_deref(), Some("#eeeeee"));
        let square = table.get("square").unwrap();
        assert_eq!(square.name, "");
        assert_eq!(square.bgcolor, None);
    }

    #[test]
    fn rejects_zero_dimension() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bad": {{"width": 0, "height": 10}}}}"#).unwrap();
        let err = TemplateTable::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, TemplateError::ZeroDimension { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = TemplateTable::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = TemplateTable::from_json_file(Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(matches!(err, TemplateError::Read { .. }));
    }

    #[test]
    fn unknown_key_is_none() {
        assert!(TemplateTable::builtin().get("nope").is_none());
    }
}

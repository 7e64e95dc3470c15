//! Rendering options and their resolution order.
//!
//! Effective values are layered:
//!
//! ```text
//! hardcoded defaults (800 × 600, #ffffff)
//!   └─ template entry, if the name is known      (bgcolor only if present)
//!        └─ explicit request values, if supplied
//! ```

use crate::error::ExtractError;
use crate::templates::TemplateTable;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Target canvas for the optional fit-and-center step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub background: String,
    /// Template key the request named, whether or not it matched.
    pub template: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: DEFAULT_BACKGROUND.to_string(),
            template: None,
        }
    }
}

/// Raw, unparsed values as they arrive from a form or the command line.
///
/// `None` means "not supplied". `Some("")` is a supplied-but-empty value and
/// is parsed like any other input.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub template: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub bgcolor: Option<String>,
}

impl RenderOptions {
    /// Apply template defaults and explicit overrides on top of the
    /// hardcoded defaults.
    ///
    /// The background string is passed through unvalidated; it is only parsed
    /// when compositing actually happens.
    pub fn resolve(
        templates: &TemplateTable,
        overrides: &OptionOverrides,
    ) -> Result<Self, ExtractError> {
        let mut opts = RenderOptions {
            template: overrides.template.clone(),
            ..RenderOptions::default()
        };

        let preset = overrides.template.as_deref().and_then(|t| templates.get(t));
        if let Some(preset) = preset {
            opts.width = preset.width;
            opts.height = preset.height;
            if let Some(ref bg) = preset.bgcolor {
                opts.background = bg.clone();
            }
        }

        if let Some(ref raw) = overrides.width {
            opts.width = parse_dimension("width", raw)?;
        }
        if let Some(ref raw) = overrides.height {
            opts.height = parse_dimension("height", raw)?;
        }
        if let Some(ref bg) = overrides.bgcolor {
            opts.background = bg.clone();
        }

        Ok(opts)
    }
}

/// Parse a positive pixel dimension, allowing surrounding whitespace and a
/// leading `+`.
pub fn parse_dimension(name: &'static str, raw: &str) -> Result<u32, ExtractError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    match digits.parse::<u32>() {
        Ok(0) => Err(ExtractError::invalid_parameter(
            name,
            raw,
            "must be greater than zero",
        )),
        Ok(v) if !digits.starts_with('+') => Ok(v),
        Ok(_) | Err(_) => Err(ExtractError::invalid_parameter(
            name,
            raw,
            "expected a positive integer",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateOptions;

    fn table() -> TemplateTable {
        TemplateTable::from_entries([
            (
                "banner".to_string(),
                TemplateOptions {
                    name: "Banner".into(),
                    width: 468,
                    height: 60,
                    bgcolor: Some("#336699".into()),
                },
            ),
            (
                "plain".to_string(),
                TemplateOptions {
                    name: "Plain".into(),
                    width: 300,
                    height: 250,
                    bgcolor: None,
                },
            ),
        ])
        .unwrap()
    }

    #[test]
    fn defaults_without_overrides() {
        let opts = RenderOptions::resolve(&table(), &OptionOverrides::default()).unwrap();
        assert_eq!(opts, RenderOptions::default());
    }

    #[test]
    fn template_replaces_defaults() {
        let overrides = OptionOverrides {
            template: Some("banner".into()),
            ..Default::default()
        };
        let opts = RenderOptions::resolve(&table(), &overrides).unwrap();
        assert_eq!((opts.width, opts.height), (468, 60));
        assert_eq!(opts.background, "#336699");
        assert_eq!(opts.template.as_deref(), Some("banner"));
    }

    #[test]
    fn template_without_bgcolor_keeps_default_background() {
        let overrides = OptionOverrides {
            template: Some("plain".into()),
            ..Default::default()
        };
        let opts = RenderOptions::resolve(&table(), &overrides).unwrap();
        assert_eq!((opts.width, opts.height), (300, 250));
        assert_eq!(opts.background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn explicit_width_beats_template() {
        let overrides = OptionOverrides {
            template: Some("banner".into()),
            width: Some("1000".into()),
            ..Default::default()
        };
        let opts = RenderOptions::resolve(&table(), &overrides).unwrap();
        assert_eq!(opts.width, 1000);
        assert_eq!(opts.height, 60);
    }

    #[test]
    fn explicit_bgcolor_beats_template() {
        let overrides = OptionOverrides {
            template: Some("banner".into()),
            bgcolor: Some("#000000".into()),
            ..Default::default()
        };
        let opts = RenderOptions::resolve(&table(), &overrides).unwrap();
        assert_eq!(opts.background, "#000000");
    }

    #[test]
    fn unknown_template_falls_back_to_defaults() {
        let overrides = OptionOverrides {
            template: Some("nope".into()),
            ..Default::default()
        };
        let opts = RenderOptions::resolve(&table(), &overrides).unwrap();
        assert_eq!((opts.width, opts.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(opts.template.as_deref(), Some("nope"));
    }

    #[test]
    fn non_numeric_width_is_rejected() {
        let overrides = OptionOverrides {
            width: Some("wide".into()),
            ..Default::default()
        };
        let err = RenderOptions::resolve(&table(), &overrides).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::InvalidParameter { name: "width", .. }
        ));
    }

    #[test]
    fn parse_dimension_cases() {
        assert_eq!(parse_dimension("width", "640").unwrap(), 640);
        assert_eq!(parse_dimension("width", "  640 ").unwrap(), 640);
        assert_eq!(parse_dimension("width", "+640").unwrap(), 640);
        assert!(parse_dimension("width", "").is_err());
        assert!(parse_dimension("width", "0").is_err());
        assert!(parse_dimension("width", "-5").is_err());
        assert!(parse_dimension("width", "12.5").is_err());
        assert!(parse_dimension("width", "++5").is_err());
    }
}

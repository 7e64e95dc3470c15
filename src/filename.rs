//! Filename slugging: turn an uploaded PDF name into a `.jpg` basename.
//!
//! The rules run in a fixed order. Stripping the extension has to happen
//! before punctuation removal (otherwise the dot would vanish and the
//! extension would merge into the name), and hyphens are folded into spaces
//! before whitespace collapsing so `a - b` and `a--b` both end up as `a-b`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix appended to every normalized name.
pub const JPEG_SUFFIX: &str = ".jpg";

/// Name returned by the HTTP endpoint when no usable input was given.
pub const FALLBACK_FILENAME: &str = "image.jpg";

// Letters, numbers (any `N` category), underscore, whitespace, hyphen.
// The information separators `\x1C`-`\x1F` count as whitespace.
static RE_DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}_\s\x1C-\x1F-]").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\x1C-\x1F]+").unwrap());

/// Normalize an arbitrary filename into a lowercase, hyphen-separated
/// `.jpg` slug.
///
/// 1. Drop the final `.ext` segment (names without a dot are kept whole)
/// 2. Lowercase
/// 3. Remove everything except letters, numbers, `_`, whitespace and hyphens
/// 4. Hyphens become spaces
/// 5. Collapse whitespace runs and trim
/// 6. Spaces become hyphens
/// 7. Append `.jpg`
///
/// Never fails; an input that cleans down to nothing yields `".jpg"`.
///
/// ```
/// use pdfcover::normalize_filename;
///
/// assert_eq!(normalize_filename("My File (2024).pdf"), "my-file-2024.jpg");
/// ```
pub fn normalize_filename(input: &str) -> String {
    let stem = strip_extension(input);
    let lower = stem.to_lowercase();
    let cleaned = RE_DISALLOWED.replace_all(&lower, "");
    let spaced = cleaned.replace('-', " ");
    let collapsed = RE_WHITESPACE.replace_all(&spaced, " ");
    let slug = collapsed.trim().replace(' ', "-");
    format!("{slug}{JPEG_SUFFIX}")
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => name,
    }
}

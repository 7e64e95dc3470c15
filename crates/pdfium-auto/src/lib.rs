//! # pdfium-auto
//!
//! Find a [PDFium](https://pdfium.googlesource.com/pdfium/) shared library for
//! `pdfium-render`, downloading and caching the platform build from
//! [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries)
//! when none is available locally.
//!
//! ## Resolution order
//!
//! 1. An explicit library path (`PDFIUM_LIB_PATH`, or
//!    [`PdfiumLocator::library_path`]). A path that does not exist is an
//!    error; there is no silent fallback.
//! 2. The per-version cache directory (see [`default_cache_dir`]).
//! 3. A download of the release archive into the cache directory, unless
//!    disabled with [`PdfiumLocator::download`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pdfium_auto::PdfiumLocator;
//!
//! let located = PdfiumLocator::from_env()
//!     .locate(Some(&|done, total| eprint!("\r{done}/{total:?} bytes")))
//!     .expect("PDFium unavailable");
//! let pdfium = pdfium_auto::bind_pdfium_from_path(&located.path).expect("bind failed");
//! ```
//!
//! ## Platform support
//!
//! | OS      | Arch    | Library               |
//! |---------|---------|-----------------------|
//! | macOS   | arm64   | `libpdfium.dylib`     |
//! | macOS   | x86_64  | `libpdfium.dylib`     |
//! | Linux   | x86_64  | `libpdfium.so`        |
//! | Linux   | aarch64 | `libpdfium.so`        |
//! | Windows | x86_64  | `pdfium.dll`          |
//! | Windows | aarch64 | `pdfium.dll`          |

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};

use pdfium_render::prelude::Pdfium;
use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// The pdfium-binaries release tag used for downloads.
pub const PDFIUM_VERSION: &str = "7690";

/// Environment variable naming an existing library file.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Environment variable overriding the cache base directory.
pub const CACHE_DIR_ENV: &str = "PDFIUM_AUTO_CACHE_DIR";

const RELEASE_BASE_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Directory under the user cache dir that holds our downloads.
const CACHE_APP_DIR: &str = "pdfcover";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned while locating or binding PDFium.
#[derive(Error, Debug)]
pub enum PdfiumAutoError {
    /// The current OS/architecture combination has no published build.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// An explicitly configured library path does not exist.
    #[error("PDFium library not found at '{path}' ({LIB_PATH_ENV})")]
    MissingExplicit { path: PathBuf },

    /// Nothing cached and downloading is disabled.
    #[error("PDFium library not cached in '{cache_dir}' and downloads are disabled")]
    NotCached { cache_dir: PathBuf },

    /// Could not create or write into the cache directory.
    #[error("Cache directory error: {0}")]
    CacheDir(#[source] std::io::Error),

    /// Network download failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// gzip/tar extraction failed.
    #[error("Archive extraction failed: {0}")]
    Extract(String),

    /// `pdfium-render` could not load the library.
    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

// ── Platform metadata ────────────────────────────────────────────────────────

#[rustfmt::skip]
const PLATFORMS: &[(&str, &str, &str, &str, &str)] = &[
    // os        arch       archive                   member                 cache file name
    ("macos",   "aarch64", "pdfium-mac-arm64.tgz",   "lib/libpdfium.dylib", "libpdfium.dylib"),
    ("macos",   "x86_64",  "pdfium-mac-x64.tgz",     "lib/libpdfium.dylib", "libpdfium.dylib"),
    ("linux",   "x86_64",  "pdfium-linux-x64.tgz",   "lib/libpdfium.so",    "libpdfium.so"),
    ("linux",   "aarch64", "pdfium-linux-arm64.tgz", "lib/libpdfium.so",    "libpdfium.so"),
    ("windows", "x86_64",  "pdfium-win-x64.tgz",     "bin/pdfium.dll",      "pdfium.dll"),
    ("windows", "aarch64", "pdfium-win-arm64.tgz",   "bin/pdfium.dll",      "pdfium.dll"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Platform {
    /// Asset filename in the GitHub release.
    archive: &'static str,
    /// Path of the library inside the archive.
    member: &'static str,
    /// Filename written to the cache directory.
    file_name: &'static str,
}

impl Platform {
    fn detect() -> Result<Self, PdfiumAutoError> {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn for_target(os: &str, arch: &str) -> Result<Self, PdfiumAutoError> {
        PLATFORMS
            .iter()
            .find(|&&(o, a, ..)| o == os && a == arch)
            .map(|&(_, _, archive, member, file_name)| Self {
                archive,
                member,
                file_name,
            })
            .ok_or_else(|| PdfiumAutoError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
    }

    fn download_url(&self) -> String {
        format!(
            "{}/chromium%2F{}/{}",
            RELEASE_BASE_URL, PDFIUM_VERSION, self.archive
        )
    }
}

// ── Cache directory ──────────────────────────────────────────────────────────

/// Per-version cache directory.
///
/// `$PDFIUM_AUTO_CACHE_DIR/pdfium-{VERSION}` when the variable is set,
/// otherwise `<user cache dir>/pdfcover/pdfium-{VERSION}`.
pub fn default_cache_dir() -> PathBuf {
    cache_dir_from(std::env::var_os(CACHE_DIR_ENV))
}

fn cache_dir_from(override_base: Option<OsString>) -> PathBuf {
    let versioned = format!("pdfium-{PDFIUM_VERSION}");
    if let Some(base) = override_base.filter(|b| !b.is_empty()) {
        return PathBuf::from(base).join(versioned);
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join(CACHE_APP_DIR).join(versioned)
}

// ── Locator ──────────────────────────────────────────────────────────────────

/// Where a located library came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibrarySource {
    Explicit,
    Cached,
    Downloaded,
}

/// A library file on disk, ready for [`bind_pdfium_from_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLibrary {
    pub path: PathBuf,
    pub source: LibrarySource,
}

/// Progress callback: `(bytes_downloaded, total_bytes_if_known)`.
pub type ProgressFn<'a> = &'a dyn Fn(u64, Option<u64>);

/// Resolves the PDFium library following the order in the crate docs.
#[derive(Debug, Clone)]
pub struct PdfiumLocator {
    library_path: Option<PathBuf>,
    cache_dir: PathBuf,
    download: bool,
}

impl Default for PdfiumLocator {
    fn default() -> Self {
        Self {
            library_path: None,
            cache_dir: default_cache_dir(),
            download: true,
        }
    }
}

impl PdfiumLocator {
    /// Default locator with `PDFIUM_LIB_PATH` applied if set.
    pub fn from_env() -> Self {
        let locator = Self::default();
        match std::env::var_os(LIB_PATH_ENV).filter(|p| !p.is_empty()) {
            Some(p) => locator.library_path(p),
            None => locator,
        }
    }

    pub fn library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Allow or forbid network downloads. Default: allowed.
    pub fn download(mut self, allow: bool) -> Self {
        self.download = allow;
        self
    }

    /// The library path if it is already on disk; never touches the network.
    pub fn cached_library(&self) -> Option<PathBuf> {
        if let Some(ref explicit) = self.library_path {
            return explicit.exists().then(|| explicit.clone());
        }
        let platform = Platform::detect().ok()?;
        let path = self.cache_dir.join(platform.file_name);
        path.exists().then_some(path)
    }

    /// Resolve the library, downloading it into the cache if needed.
    pub fn locate(
        &self,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Result<LocatedLibrary, PdfiumAutoError> {
        if let Some(ref explicit) = self.library_path {
            if !explicit.exists() {
                return Err(PdfiumAutoError::MissingExplicit {
                    path: explicit.clone(),
                });
            }
            return Ok(LocatedLibrary {
                path: explicit.clone(),
                source: LibrarySource::Explicit,
            });
        }

        let platform = Platform::detect()?;
        let target = self.cache_dir.join(platform.file_name);
        if target.exists() {
            return Ok(LocatedLibrary {
                path: target,
                source: LibrarySource::Cached,
            });
        }

        if !self.download {
            return Err(PdfiumAutoError::NotCached {
                cache_dir: self.cache_dir.clone(),
            });
        }

        std::fs::create_dir_all(&self.cache_dir).map_err(PdfiumAutoError::CacheDir)?;
        let archive = fetch_archive(&platform.download_url(), on_progress)?;
        unpack_member(&archive, platform.member, &target)?;

        Ok(LocatedLibrary {
            path: target,
            source: LibrarySource::Downloaded,
        })
    }
}

/// Binds to a PDFium library at an explicit `path`.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, PdfiumAutoError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfiumAutoError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

// ── Download / unpack ────────────────────────────────────────────────────────

fn fetch_archive(
    url: &str,
    on_progress: Option<ProgressFn<'_>>,
) -> Result<Vec<u8>, PdfiumAutoError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-auto/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| PdfiumAutoError::Download(e.to_string()))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| PdfiumAutoError::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(PdfiumAutoError::Download(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length();
    let mut buf = Vec::with_capacity(total.unwrap_or(32 * 1024 * 1024) as usize);
    let mut chunk = [0u8; 64 * 1024];

    loop {
        let n = match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(PdfiumAutoError::Download(format!("Read error: {e}"))),
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(cb) = on_progress {
            cb(buf.len() as u64, total);
        }
    }

    Ok(buf)
}

/// Extract `member` from a `.tgz` into `dest`, via a temp file renamed into
/// place so a half-written library is never left at `dest`.
fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), PdfiumAutoError> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    let mut tar = Archive::new(GzDecoder::new(archive));
    let entries = tar
        .entries()
        .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        let matches = entry
            .path()
            .map(|p| p.to_string_lossy() == member)
            .map_err(|e| PdfiumAutoError::Extract(e.to_string()))?;
        if !matches {
            continue;
        }

        let partial = dest.with_extension("partial");
        entry
            .unpack(&partial)
            .map_err(|e| PdfiumAutoError::Extract(format!("Unpack failed: {e}")))?;
        std::fs::rename(&partial, dest).map_err(PdfiumAutoError::CacheDir)?;
        return Ok(());
    }

    Err(PdfiumAutoError::Extract(format!(
        "'{member}' not found in archive"
    )))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tgz_with(member: &str, contents: &[u8]) -> Vec<u8> {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::fast()));
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, member, contents).unwrap();
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn current_platform_is_supported() {
        Platform::detect().expect("current platform should be supported");
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let err = Platform::for_target("plan9", "mips").unwrap_err();
        assert!(err.to_string().contains("plan9/mips"));
    }

    #[test]
    fn download_url_contains_version_and_archive() {
        let p = Platform::for_target("linux", "x86_64").unwrap();
        let url = p.download_url();
        assert!(
            url.ends_with("/chromium%2F7690/pdfium-linux-x64.tgz"),
            "{url}"
        );
    }

    #[test]
    fn cache_dir_is_deterministic() {
        let d1 = cache_dir_from(None);
        let d2 = cache_dir_from(None);
        assert_eq!(d1, d2);
        assert!(d1.to_str().unwrap().contains(CACHE_APP_DIR));
        assert!(d1.to_str().unwrap().contains(PDFIUM_VERSION));
    }

    #[test]
    fn cache_dir_override() {
        let d = cache_dir_from(Some("/tmp/pdfium_override".into()));
        let expected = format!("/tmp/pdfium_override/pdfium-{PDFIUM_VERSION}");
        assert_eq!(d, PathBuf::from(expected));
        // Empty override is ignored.
        assert_eq!(cache_dir_from(Some(OsString::new())), cache_dir_from(None));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("libpdfium-custom.so");
        std::fs::write(&lib, b"stub").unwrap();

        let located = PdfiumLocator::default()
            .library_path(&lib)
            .download(false)
            .locate(None)
            .unwrap();
        assert_eq!(located.path, lib);
        assert_eq!(located.source, LibrarySource::Explicit);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = PdfiumLocator::default()
            .library_path("/definitely/not/libpdfium.so")
            .locate(None)
            .unwrap_err();
        assert!(matches!(err, PdfiumAutoError::MissingExplicit { .. }));
    }

    #[test]
    fn cached_library_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Platform::detect().unwrap();
        std::fs::write(dir.path().join(platform.file_name), b"stub").unwrap();

        let locator = PdfiumLocator::default().cache_dir(dir.path()).download(false);
        assert!(locator.cached_library().is_some());
        let located = locator.locate(None).unwrap();
        assert_eq!(located.source, LibrarySource::Cached);
    }

    #[test]
    fn empty_cache_without_download_fails() {
        let dir = tempfile::tempdir().unwrap();
        let locator = PdfiumLocator::default().cache_dir(dir.path()).download(false);
        assert!(locator.cached_library().is_none());
        let err = locator.locate(None).unwrap_err();
        assert!(matches!(err, PdfiumAutoError::NotCached { .. }));
    }

    #[test]
    fn unpack_extracts_named_member() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("libpdfium.so");
        let archive = tgz_with("lib/libpdfium.so", b"ELF-ish bytes");

        unpack_member(&archive, "lib/libpdfium.so", &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"ELF-ish bytes");
        assert!(!dest.with_extension("partial").exists());
    }

    #[test]
    fn unpack_reports_missing_member() {
        let dir = tempfile::tempdir().unwrap();
        let archive = tgz_with("lib/other.so", b"x");
        let dest = dir.path().join("out");
        let err = unpack_member(&archive, "lib/libpdfium.so", &dest).unwrap_err();
        assert!(matches!(err, PdfiumAutoError::Extract(_)));
    }
}

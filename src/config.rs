//! Server configuration.
//!
//! Everything the HTTP layer needs at startup lives in [`ServerConfig`],
//! built through [`ServerConfigBuilder`]. The binary maps CLI flags and
//! environment variables onto the builder; tests build one directly.
//!
//! # Example
//! ```rust
//! use pdfcover::ServerConfig;
//!
//! let config = ServerConfig::builder()
//!     .host("127.0.0.1")
//!     .port(8080)
//!     .static_root("frontend/build")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.socket_addr().unwrap().port(), 8080);
//! ```

use crate::error::ConfigError;
use crate::pipeline::render::PdfiumLibrary;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Default upload ceiling: 150 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 150 * 1024 * 1024;

/// Smallest body limit the builder accepts.
const MIN_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind. Default: `0.0.0.0`.
    pub host: String,

    /// TCP port. Default: 5000.
    pub port: u16,

    /// Directory holding the prebuilt client bundle. Default: `frontend/build`.
    ///
    /// Requests that match no API route are served from here, with
    /// `index.html` as the fallback for unknown paths.
    pub static_root: PathBuf,

    /// Maximum request body size in bytes. Default: 150 MiB.
    pub max_body_bytes: usize,

    /// Optional JSON file replacing the built-in template table.
    pub templates_path: Option<PathBuf>,

    /// Which pdfium library to bind per render. Default: system loader path.
    pub pdfium: PdfiumLibrary,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_root: PathBuf::from("frontend/build"),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            templates_path: None,
            pdfium: PdfiumLibrary::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new builder for `ServerConfig`.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Address to bind the listener to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| ConfigError(format!("Invalid host '{}': {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn static_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.static_root = root.into();
        self
    }

    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    pub fn templates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.templates_path = Some(path.into());
        self
    }

    pub fn pdfium(mut self, library: PdfiumLibrary) -> Self {
        self.config.pdfium = library;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let c = &self.config;
        c.socket_addr()?;
        if c.max_body_bytes < MIN_MAX_BODY_BYTES {
            return Err(ConfigError(format!(
                "Body limit must be at least {} bytes, got {}",
                MIN_MAX_BODY_BYTES, c.max_body_bytes
            )));
        }
        Ok(self.config)
    }
}

//! Runtime configuration
//!
//! The environment surface is deliberately small: a static-assets directory
//! resolved from the working directory, and a bind host and port for the
//! listening transport. Paths under the reserved API prefix never fall
//! through to static serving.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Reserved prefix for API routes
pub const API_PREFIX: &str = "/api";

/// Service configuration with documented defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Static-assets directory, relative paths resolve from the working
    /// directory
    pub static_dir: PathBuf,
    /// Bind host; defaults to all interfaces
    pub host: IpAddr,
    /// Bind port
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 7860,
        }
    }
}

impl ServiceConfig {
    /// Socket address the transport should bind
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Static directory resolved against the working directory
    pub fn resolve_static_dir(&self) -> PathBuf {
        if self.static_dir.is_absolute() {
            self.static_dir.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.static_dir))
                .unwrap_or_else(|_| self.static_dir.clone())
        }
    }

    /// Entry file served for non-API paths
    pub fn index_file(&self) -> PathBuf {
        self.resolve_static_dir().join("index.html")
    }

    /// Whether a request path belongs to the reserved API prefix
    ///
    /// API paths that match no route get a not-found response instead of
    /// the static fallback.
    pub fn is_api_path(path: &str) -> bool {
        path == API_PREFIX || path.starts_with("/api/")
    }
}

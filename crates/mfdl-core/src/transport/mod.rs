//! HTTP transport seam used by the pipeline.
//!
//! The pipeline only depends on [`Transport`]; [`CurlTransport`] is the
//! libcurl-backed implementation used by the CLI.

mod libcurl;
mod status;

pub use libcurl::CurlTransport;
pub use status::{is_success, parse_status_line};

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection or transfer failure (DNS, refused, timeout, reset).
    #[error("{0}")]
    Network(String),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// Destination file could not be opened or written.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        TransportError::Network(e.to_string())
    }
}

/// Blocking HTTP operations for one URL at a time. Called from
/// `spawn_blocking`, hence `Send + Sync`.
pub trait Transport: Send + Sync {
    /// GET `url` and return the body as text. Non-2xx is an error.
    fn fetch_page(&self, url: &str) -> Result<String, TransportError>;

    /// GET `url` and stream the body into `dest`, returning bytes written.
    ///
    /// `dest` is created (or truncated) only once a 2xx status is known, so a
    /// failed status never touches the filesystem.
    fn download_to(&self, url: &str, dest: &Path) -> Result<u64, TransportError>;
}

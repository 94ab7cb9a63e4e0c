//! Error taxonomy: run-level usage errors and per-URL stage failures.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit status for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every URL was downloaded.
    Success,
    /// At least one URL failed.
    Failure,
    /// Configuration or setup problem detected before any URL was attempted.
    Usage,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Usage => 2,
        }
    }
}

/// Fatal errors detected before the first URL is processed. Always exit 2.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Sleep milliseconds value must be a non-negative integer (got {0})")]
    InvalidSleep(i64),

    #[error("URL(s) required when not using '--input'")]
    NoUrls,

    #[error("{:?} error opening input file: {}", .source.kind(), .path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading URLs from standard input: {0}")]
    Stdin(#[source] io::Error),

    #[error("{:?} error trying to make directory: {}", .source.kind(), .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file: {0:#}")]
    Config(anyhow::Error),
}

/// Coarse classification of a per-URL failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection or transport failure on either fetch.
    Network,
    /// Non-2xx status on either fetch.
    Protocol,
    /// Expected field missing from the page markup.
    Parse,
    /// Destination file could not be opened or written.
    Io,
}

/// A failed stage of the per-URL pipeline. The `Display` form is the line
/// reported to the user.
#[derive(Debug, Error)]
pub enum StageFailure {
    #[error("Network error fetching page URL: {url} ({detail})")]
    PageNetwork { url: String, detail: String },

    #[error("Fetching page URL returned {status}: {url}")]
    PageStatus { url: String, status: u32 },

    #[error("Could not find filename in HTML: {url}")]
    MissingFilename { url: String },

    #[error("Could not find download URL in HTML: {url}")]
    MissingDownloadUrl { url: String },

    #[error("Invalid download URL in HTML: {href} (page: {url})")]
    InvalidDownloadUrl { url: String, href: String },

    #[error("Network error fetching download URL: {download_url} (page: {url}) ({detail})")]
    ResourceNetwork {
        url: String,
        download_url: String,
        detail: String,
    },

    #[error("Fetching download URL returned {status}: {download_url} (page: {url})")]
    ResourceStatus {
        url: String,
        download_url: String,
        status: u32,
    },

    #[error("{:?} error trying to write file: {} (page: {url})", .source.kind(), .path.display())]
    Write {
        url: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StageFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            StageFailure::PageNetwork { .. } | StageFailure::ResourceNetwork { .. } => {
                FailureKind::Network
            }
            StageFailure::PageStatus { .. } | StageFailure::ResourceStatus { .. } => {
                FailureKind::Protocol
            }
            StageFailure::MissingFilename { .. }
            | StageFailure::MissingDownloadUrl { .. }
            | StageFailure::InvalidDownloadUrl { .. } => FailureKind::Parse,
            StageFailure::Write { .. } => FailureKind::Io,
        }
    }
}

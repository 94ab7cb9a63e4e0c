//! Sequential download pipeline.
//!
//! For each page URL, in input order: fetch page, extract filename and
//! download link, fetch the resource, stream it to disk, report. A failure in
//! any stage is reported and the loop moves on to the next URL. Blocking curl
//! work runs on `spawn_blocking` and is awaited before anything else starts, so
//! no two URLs (or two stages of one URL) are ever in flight together.

mod report;

pub use report::Reporter;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::RunConfig;
use crate::error::{ExitStatus, StageFailure, UsageError};
use crate::extract::{ExtractError, FieldExtractor};
use crate::filename;
use crate::transport::{Transport, TransportError};

/// Outcome of one URL. Lives only for one iteration.
#[derive(Debug)]
pub struct DownloadResult {
    pub source_url: String,
    /// Filename as advertised on the page, once extracted.
    pub filename: Option<String>,
    /// Absolute download link, once extracted and resolved.
    pub download_url: Option<String>,
    /// Destination path, once known.
    pub output_path: Option<PathBuf>,
    /// Bytes written on success.
    pub outcome: Result<u64, StageFailure>,
}

impl DownloadResult {
    pub fn new(source_url: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            filename: None,
            download_url: None,
            output_path: None,
            outcome: Ok(0),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Pass/fail accounting for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, result: &DownloadResult) {
        if result.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.failed == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

/// Create the output directory (and parents). An existing directory is fine.
pub async fn prepare_output_directory(dir: &Path) -> Result<(), UsageError> {
    match tokio::fs::create_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(UsageError::OutputDirectory {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Resolve a (possibly relative) link against the page it was found on.
pub fn resolve_download_url(page_url: &str, href: &str) -> Result<String, url::ParseError> {
    match url::Url::parse(href) {
        Ok(absolute) => Ok(absolute.into()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(url::Url::parse(page_url)?.join(href)?.into())
        }
        Err(e) => Err(e),
    }
}

/// Runs blocking transport work off the async thread and waits for it.
async fn run_blocking<T, R, F>(transport: &Arc<T>, f: F) -> Result<R, TransportError>
where
    T: Transport + 'static,
    R: Send + 'static,
    F: FnOnce(&T) -> Result<R, TransportError> + Send + 'static,
{
    let transport = Arc::clone(transport);
    tokio::task::spawn_blocking(move || f(&transport))
        .await
        .map_err(|e| TransportError::Network(format!("transfer task failed: {}", e)))?
}

async fn run_stages<T, E>(
    result: &mut DownloadResult,
    output_directory: &Path,
    transport: &Arc<T>,
    extractor: &E,
) -> Result<u64, StageFailure>
where
    T: Transport + 'static,
    E: FieldExtractor + ?Sized,
{
    let url = result.source_url.clone();

    // 1. page
    let page = {
        let page_url = url.clone();
        run_blocking(transport, move |t| t.fetch_page(&page_url))
            .await
            .map_err(|e| match e {
                TransportError::Status(status) => StageFailure::PageStatus {
                    url: url.clone(),
                    status,
                },
                other => StageFailure::PageNetwork {
                    url: url.clone(),
                    detail: other.to_string(),
                },
            })?
    };

    // 2. fields
    let fields = extractor.extract(&page).map_err(|e| match e {
        ExtractError::MissingFilename => StageFailure::MissingFilename { url: url.clone() },
        ExtractError::MissingDownloadUrl => StageFailure::MissingDownloadUrl { url: url.clone() },
    })?;
    tracing::debug!(
        "page {} advertises {:?} at {}",
        url,
        fields.filename,
        fields.download_url
    );
    result.filename = Some(fields.filename.clone());

    let download_url = resolve_download_url(&url, &fields.download_url).map_err(|_| {
        StageFailure::InvalidDownloadUrl {
            url: url.clone(),
            href: fields.download_url.clone(),
        }
    })?;
    result.download_url = Some(download_url.clone());

    let dest = filename::destination_path(output_directory, &fields.filename, &download_url);
    if dest.file_name().and_then(|n| n.to_str()) != Some(fields.filename.as_str()) {
        tracing::warn!(
            "advertised filename {:?} from {} saved as {}",
            fields.filename,
            url,
            dest.display()
        );
    }
    result.output_path = Some(dest.clone());

    // 3 + 4. resource, streamed to disk
    let bytes = {
        let download_url = download_url.clone();
        let dest = dest.clone();
        run_blocking(transport, move |t| t.download_to(&download_url, &dest)).await
    }
    .map_err(|e| match e {
        TransportError::Status(status) => StageFailure::ResourceStatus {
            url: url.clone(),
            download_url: download_url.clone(),
            status,
        },
        TransportError::Network(detail) => StageFailure::ResourceNetwork {
            url: url.clone(),
            download_url: download_url.clone(),
            detail,
        },
        TransportError::Io { path, source } => StageFailure::Write {
            url: url.clone(),
            path,
            source,
        },
    })?;

    tracing::info!("saved {} ({} bytes) from {}", dest.display(), bytes, url);
    Ok(bytes)
}

/// Run the five stages for one URL. Never fails; the outcome is in the result.
pub async fn process_url<T, E>(
    url: &str,
    output_directory: &Path,
    transport: &Arc<T>,
    extractor: &E,
) -> DownloadResult
where
    T: Transport + 'static,
    E: FieldExtractor + ?Sized,
{
    let mut result = DownloadResult::new(url);
    let outcome = run_stages(&mut result, output_directory, transport, extractor).await;
    if let Err(failure) = &outcome {
        tracing::warn!("{} failed ({:?}): {}", url, failure.kind(), failure);
    }
    result.outcome = outcome;
    result
}

/// Entry point: prepare the output directory, then process `urls` strictly in
/// order, sleeping `cfg.sleep_ms` between consecutive URLs.
///
/// Returns `Err` only for setup problems detected before any URL is attempted.
pub async fn run_pipeline<T, E, O, W>(
    urls: &[String],
    cfg: &RunConfig,
    transport: Arc<T>,
    extractor: &E,
    reporter: &mut Reporter<O, W>,
) -> Result<RunSummary, UsageError>
where
    T: Transport + 'static,
    E: FieldExtractor + ?Sized,
    O: Write,
    W: Write,
{
    prepare_output_directory(&cfg.output_directory).await?;

    let delay = cfg.delay();
    let mut summary = RunSummary::default();
    for (index, url) in urls.iter().enumerate() {
        tracing::info!("[{}/{}] {}", index + 1, urls.len(), url);
        let result = process_url(url, &cfg.output_directory, &transport, extractor).await;
        if let Err(e) = reporter.report(&result) {
            tracing::warn!("could not write report line for {}: {}", url, e);
        }
        summary.record(&result);

        if index + 1 != urls.len() && !delay.is_zero() {
            tracing::debug!("sleeping {} ms", cfg.sleep_ms);
            tokio::time::sleep(delay).await;
        }
    }

    tracing::info!(
        "run finished: {} succeeded, {} failed",
        summary.succeeded,
        summary.failed
    );
    Ok(summary)
}

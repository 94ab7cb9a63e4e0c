//! URL list resolution: positional arguments, an input file, or standard input.

use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::UsageError;

/// Designator for "read URLs from standard input".
pub const STDIN_DESIGNATOR: &str = "-";

/// Where the URL list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    /// One URL per line from standard input until EOF.
    Stdin,
    /// One URL per line from a file.
    File(PathBuf),
    /// URLs given directly on the command line.
    Args(Vec<String>),
}

impl UrlSource {
    /// `--input` takes precedence over positional URLs; `-` selects stdin.
    pub fn from_args(input: Option<&str>, urls: Vec<String>) -> Self {
        match input {
            Some(STDIN_DESIGNATOR) => UrlSource::Stdin,
            Some(path) => UrlSource::File(PathBuf::from(path)),
            None => UrlSource::Args(urls),
        }
    }
}

/// Reject negative delays; the CLI accepts them syntactically so this check reports them.
pub fn validate_sleep_ms(sleep_ms: i64) -> Result<u64, UsageError> {
    u64::try_from(sleep_ms).map_err(|_| UsageError::InvalidSleep(sleep_ms))
}

/// Read one URL per line. Line terminators and surrounding whitespace are
/// stripped; blank lines are skipped.
pub async fn read_url_lines<R>(reader: R) -> io::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut urls = Vec::new();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if !line.is_empty() {
            urls.push(line.to_string());
        }
    }
    Ok(urls)
}

/// Produce the ordered URL list for a run.
///
/// An explicit file or stdin source may legitimately yield zero URLs; an empty
/// positional list is a usage error.
pub async fn resolve_urls(source: UrlSource) -> Result<Vec<String>, UsageError> {
    let urls = match source {
        UrlSource::Stdin => read_url_lines(BufReader::new(tokio::io::stdin()))
            .await
            .map_err(UsageError::Stdin)?,
        UrlSource::File(path) => {
            let file = match tokio::fs::File::open(&path).await {
                Ok(f) => f,
                Err(source) => return Err(UsageError::InputFile { path, source }),
            };
            match read_url_lines(BufReader::new(file)).await {
                Ok(urls) => urls,
                Err(source) => return Err(UsageError::InputFile { path, source }),
            }
        }
        UrlSource::Args(urls) => {
            if urls.is_empty() {
                return Err(UsageError::NoUrls);
            }
            urls
        }
    };
    tracing::debug!("resolved {} URL(s)", urls.len());
    Ok(urls)
}

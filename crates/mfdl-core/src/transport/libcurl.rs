//! libcurl-backed transport (curl crate, one Easy handle per request).

use curl::easy::Easy;
use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use super::status::{is_success, parse_status_line};
use super::{Transport, TransportError};
use crate::config::HttpConfig;

/// Runs in the current thread; call from `spawn_blocking` if used from async code.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    http: HttpConfig,
}

impl CurlTransport {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }

    fn easy(&self, url: &str) -> Result<Easy, TransportError> {
        check_scheme(url)?;
        let mut easy = Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.http.max_redirections)?;
        easy.useragent(&self.http.user_agent)?;
        easy.connect_timeout(Duration::from_secs(self.http.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.http.timeout_secs))?;
        Ok(easy)
    }
}

/// Only HTTP(S) responses carry the status line `download_to` keys on.
fn check_scheme(url: &str) -> Result<(), TransportError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| TransportError::Network(format!("invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TransportError::Network(format!(
            "unsupported URL scheme {other:?}: {url}"
        ))),
    }
}

fn create_sink(dest: &Path) -> std::io::Result<BufWriter<File>> {
    tracing::debug!("opening {} for writing", dest.display());
    File::create(dest).map(BufWriter::new)
}

impl Transport for CurlTransport {
    fn fetch_page(&self, url: &str) -> Result<String, TransportError> {
        let mut easy = self.easy(url)?;
        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !is_success(code) {
            return Err(TransportError::Status(code));
        }
        tracing::debug!("page {} returned {} bytes", url, body.len());
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<u64, TransportError> {
        let mut easy = self.easy(url)?;
        // Status of the most recent response; redirects overwrite it.
        let status = Cell::new(0u32);
        let mut sink: Option<BufWriter<File>> = None;
        let mut written = 0u64;
        let mut write_error: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|line| {
                if let Some(code) = parse_status_line(line) {
                    status.set(code);
                }
                true
            })?;
            transfer.write_function(|data| {
                if !is_success(status.get()) {
                    // error body, never written to disk
                    return Ok(data.len());
                }
                if sink.is_none() {
                    match create_sink(dest) {
                        Ok(file) => sink = Some(file),
                        Err(e) => {
                            write_error = Some(e);
                            return Ok(0); // abort transfer
                        }
                    }
                }
                if let Some(file) = sink.as_mut() {
                    if let Err(e) = file.write_all(data) {
                        write_error = Some(e);
                        return Ok(0);
                    }
                }
                written += data.len() as u64;
                Ok(data.len())
            })?;
            transfer.perform()
        };

        let io_err = |source| TransportError::Io {
            path: dest.to_path_buf(),
            source,
        };

        if let Some(source) = write_error {
            return Err(io_err(source));
        }
        performed?;

        let code = easy.response_code()?;
        if !is_success(code) {
            return Err(TransportError::Status(code));
        }

        // 2xx with an empty body still produces an (empty) file.
        let mut file = match sink {
            Some(file) => file,
            None => create_sink(dest).map_err(io_err)?,
        };
        file.flush().map_err(io_err)?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn non_http_download_is_rejected_without_creating_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("listing.txt");

        let err = CurlTransport::default()
            .download_to("ftp://127.0.0.1/pub/listing.txt", &dest)
            .unwrap_err();

        assert!(matches!(err, TransportError::Network(ref m) if m.contains("\"ftp\"")));
        assert!(!dest.exists());
    }

    #[test]
    fn non_http_page_is_rejected() {
        let err = CurlTransport::default()
            .fetch_page("file:///etc/hostname")
            .unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[test]
    fn scheme_check() {
        assert!(check_scheme("https://www.mediafire.com/file/abc").is_ok());
        assert!(check_scheme("HTTP://example.com/").is_ok());
        assert!(check_scheme("not a url").is_err());
    }
}

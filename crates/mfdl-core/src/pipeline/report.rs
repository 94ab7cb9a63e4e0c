//! Per-URL report lines on explicit writer handles.

use std::io::{self, Write};

use super::DownloadResult;
use crate::error::UsageError;

/// Writes saved paths to `out` and failure lines to `err`.
///
/// The CLI hands in stdout/stderr; tests hand in `Vec<u8>`.
pub struct Reporter<O, E> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// One line per URL: the destination path on success, the failure otherwise.
    pub fn report(&mut self, result: &DownloadResult) -> io::Result<()> {
        match (&result.outcome, &result.output_path) {
            (Ok(_), Some(path)) => {
                writeln!(self.out, "{}", path.display())?;
                self.out.flush()
            }
            (Ok(_), None) => Ok(()),
            (Err(failure), _) => {
                writeln!(self.err, "{}", failure)?;
                self.err.flush()
            }
        }
    }

    pub fn usage(&mut self, error: &UsageError) -> io::Result<()> {
        writeln!(self.err, "{}", error)?;
        self.err.flush()
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageFailure;
    use std::path::PathBuf;

    fn reporter() -> Reporter<Vec<u8>, Vec<u8>> {
        Reporter::new(Vec::new(), Vec::new())
    }

    #[test]
    fn success_prints_path_to_out() {
        let mut r = reporter();
        let mut result = DownloadResult::new("https://example.com/p");
        result.output_path = Some(PathBuf::from("out/a.zip"));
        result.outcome = Ok(3);
        r.report(&result).unwrap();
        let (out, err) = r.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "out/a.zip\n");
        assert!(err.is_empty());
    }

    #[test]
    fn failure_prints_line_to_err() {
        let mut r = reporter();
        let mut result = DownloadResult::new("https://example.com/p");
        result.outcome = Err(StageFailure::MissingFilename {
            url: "https://example.com/p".to_string(),
        });
        r.report(&result).unwrap();
        let (out, err) = r.into_inner();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Could not find filename in HTML: https://example.com/p\n"
        );
    }

    #[test]
    fn usage_goes_to_err() {
        let mut r = reporter();
        r.usage(&UsageError::NoUrls).unwrap();
        let (_, err) = r.into_inner();
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "URL(s) required when not using '--input'\n"
        );
    }
}

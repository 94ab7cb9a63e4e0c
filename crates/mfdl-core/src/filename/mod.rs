//! Destination filename derivation.
//!
//! The advertised filename comes from page markup and is untrusted: it is
//! sanitized so the destination always stays directly inside the output
//! directory.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

use std::path::{Path, PathBuf};

/// Used when neither the page nor the download URL yields a usable name.
pub const DEFAULT_FILENAME: &str = "download.bin";

fn usable(name: String) -> Option<String> {
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}

/// Derives the local filename for a download.
///
/// Prefers the page's advertised `display_name`; falls back to the last path
/// segment of `download_url`, then to [`DEFAULT_FILENAME`].
///
/// # Examples
///
/// - `safe_filename("report.pdf", "https://dl.example.com/x/y")` → `"report.pdf"`
/// - `safe_filename("../../etc/passwd", "https://dl.example.com/x/y")` → `"_.._etc_passwd"`
pub fn safe_filename(display_name: &str, download_url: &str) -> String {
    usable(sanitize_filename(display_name))
        .or_else(|| {
            filename_from_url_path(download_url)
                .map(|s| sanitize_filename(&s))
                .and_then(usable)
        })
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// Full destination path for a download: `output_directory` joined with the
/// sanitized filename.
pub fn destination_path(output_directory: &Path, display_name: &str, download_url: &str) -> PathBuf {
    output_directory.join(safe_filename(display_name, download_url))
}

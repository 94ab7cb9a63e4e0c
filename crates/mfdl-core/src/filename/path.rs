//! Fallback name taken from the download link itself.

/// Last non-empty path segment of a download link, used when the page's
/// advertised name sanitizes to nothing.
///
/// Query and fragment never contribute. `None` for unparseable links and for
/// links whose path has no named segment.
pub fn filename_from_url_path(download_url: &str) -> Option<String> {
    let link = url::Url::parse(download_url).ok()?;
    link.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

//! Status-line parsing for the streamed GET.

use std::str;

/// Parses the status code out of a raw `HTTP/x.y CODE reason` header line.
/// Returns `None` for ordinary header lines.
pub fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = str::from_utf8(line).ok()?.trim();
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse::<u32>().ok()
}

pub fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

//! Filename sanitization for names taken from page markup.

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

/// Sanitizes a candidate filename so it names a single entry in a directory.
///
/// - Replaces `/`, `\`, NUL and control characters with `_` (runs of them
///   collapse to a single `_`)
/// - Trims leading/trailing whitespace and dots
/// - Limits length to 255 bytes on a char boundary
///
/// Spaces and other printable characters are kept so the saved file keeps the
/// advertised name.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.trim().chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(|c: char| c.is_whitespace() || c == '.');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_slash_and_backslash() {
        assert_eq!(sanitize_filename("a/b\\c.txt"), "a_b_c.txt");
    }

    #[test]
    fn keeps_spaces_and_unicode() {
        assert_eq!(sanitize_filename("Café menu (v2).pdf"), "Café menu (v2).pdf");
    }

    #[test]
    fn trims_dots_and_whitespace() {
        assert_eq!(sanitize_filename("  ..  file.txt  ..  "), "file.txt");
        assert_eq!(sanitize_filename("\n report.pdf \n"), "report.pdf");
    }

    #[test]
    fn collapses_replaced_runs_only() {
        assert_eq!(sanitize_filename("a//\\b"), "a_b");
        assert_eq!(sanitize_filename("file___name.txt"), "file___name.txt");
    }

    #[test]
    fn traversal_sequences_neutralized() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename(".."), "");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_filename("file\x00name.txt"), "file_name.txt");
    }

    #[test]
    fn long_names_truncated_on_char_boundary() {
        let name = "é".repeat(200);
        let out = sanitize_filename(&name);
        assert!(out.len() <= NAME_MAX);
        assert_eq!(out.len() % 2, 0);
    }
}

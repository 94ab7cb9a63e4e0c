//! Filename and download-link extraction from a hosting page.
//!
//! Two interchangeable strategies sit behind [`FieldExtractor`]: a structured
//! CSS-selector query over the parsed document, and a regex match over the raw
//! markup. Both find the first occurrence of each field.

mod entities;
mod pattern;
mod selector;

pub use pattern::PatternExtractor;
pub use selector::SelectorExtractor;

use thiserror::Error;

/// CSS selector for the element whose text is the advertised filename.
pub const FILENAME_SELECTOR: &str = ".filename";
/// CSS selector for the element whose `href` is the direct download link.
pub const DOWNLOAD_LINK_SELECTOR: &str = "#download_link .input";

/// The two fields every page must yield before the resource fetch starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    /// Display name as advertised on the page (unsanitized, whitespace-trimmed).
    pub filename: String,
    /// Download link exactly as found in the markup (may be relative).
    pub download_url: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("filename not found")]
    MissingFilename,
    #[error("download URL not found")]
    MissingDownloadUrl,
}

/// Pulls [`PageFields`] out of page markup.
pub trait FieldExtractor {
    fn extract(&self, html: &str) -> Result<PageFields, ExtractError>;
}

/// Which extraction strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractorKind {
    /// Parse into a DOM tree and query by CSS selector.
    #[default]
    Selector,
    /// Regular expressions against the raw text.
    Pattern,
}

impl ExtractorKind {
    /// Build the extractor for this strategy.
    pub fn build(self) -> Box<dyn FieldExtractor> {
        match self {
            ExtractorKind::Selector => Box::new(SelectorExtractor::default()),
            ExtractorKind::Pattern => Box::new(PatternExtractor),
        }
    }
}

/// Trimmed, non-empty field value or `None`.
fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn both() -> Vec<Box<dyn FieldExtractor>> {
        vec![
            ExtractorKind::Selector.build(),
            ExtractorKind::Pattern.build(),
        ]
    }

    #[test]
    fn strategies_agree_on_real_page() {
        for extractor in both() {
            let fields = extractor.extract(fixtures::PAGE).unwrap();
            assert_eq!(fields.filename, "holiday photos.zip");
            assert_eq!(
                fields.download_url,
                "https://download1234.mediafire.com/abc/xyz/holiday+photos.zip?a=1&b=2"
            );
        }
    }

    #[test]
    fn strategies_agree_on_nested_and_single_quoted_markup() {
        for extractor in both() {
            let fields = extractor.extract(fixtures::PAGE_WITH_NESTED_FILENAME).unwrap();
            assert_eq!(fields.filename, "Q&A notes.txt");
            assert_eq!(fields.download_url, "/files/qa.txt");
        }
    }

    #[test]
    fn strategies_agree_on_inline_markup_in_filename() {
        for extractor in both() {
            let fields = extractor
                .extract(fixtures::PAGE_WITH_INLINE_MARKUP_FILENAME)
                .unwrap();
            assert_eq!(fields.filename, "part-two.zip");
        }
    }

    #[test]
    fn strategies_agree_input_outside_download_block_is_missing() {
        for extractor in both() {
            assert_eq!(
                extractor.extract(fixtures::PAGE_WITH_EMPTY_DOWNLOAD_BLOCK),
                Err(ExtractError::MissingDownloadUrl)
            );
        }
    }

    #[test]
    fn strategies_report_missing_filename() {
        for extractor in both() {
            assert_eq!(
                extractor.extract(fixtures::PAGE_WITHOUT_FILENAME),
                Err(ExtractError::MissingFilename)
            );
        }
    }

    #[test]
    fn strategies_report_missing_download_url() {
        for extractor in both() {
            assert_eq!(
                extractor.extract(fixtures::PAGE_WITHOUT_LINK),
                Err(ExtractError::MissingDownloadUrl)
            );
        }
    }

    #[test]
    fn empty_filename_counts_as_missing() {
        let html = r#"<div class="filename">   </div><div id="download_link"><a class="input" href="x">x</a></div>"#;
        for extractor in both() {
            assert_eq!(extractor.extract(html), Err(ExtractError::MissingFilename));
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        for extractor in both() {
            let a = extractor.extract(fixtures::PAGE).unwrap();
            let b = extractor.extract(fixtures::PAGE).unwrap();
            assert_eq!(a, b);
        }
    }
}

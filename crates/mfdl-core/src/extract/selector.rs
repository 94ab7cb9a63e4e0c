//! Structured extraction: parse the page into a DOM tree and query it.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::{non_empty, ExtractError, FieldExtractor, PageFields};
use super::{DOWNLOAD_LINK_SELECTOR, FILENAME_SELECTOR};

static DEFAULT_FILENAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(FILENAME_SELECTOR).unwrap());
static DEFAULT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DOWNLOAD_LINK_SELECTOR).unwrap());

/// Extracts fields with CSS selectors (scraper / html5ever).
#[derive(Debug, Clone)]
pub struct SelectorExtractor {
    filename: Selector,
    link: Selector,
}

impl Default for SelectorExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FILENAME.clone(), DEFAULT_LINK.clone())
    }
}

impl SelectorExtractor {
    /// `filename` picks the element whose text is the filename; `link` picks
    /// the element whose `href` is the download link.
    pub fn new(filename: Selector, link: Selector) -> Self {
        Self { filename, link }
    }
}

impl FieldExtractor for SelectorExtractor {
    fn extract(&self, html: &str) -> Result<PageFields, ExtractError> {
        let document = Html::parse_document(html);

        let filename = document
            .select(&self.filename)
            .next()
            .and_then(|el| non_empty(&el.text().collect::<String>()))
            .ok_or(ExtractError::MissingFilename)?;

        let download_url = document
            .select(&self.link)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(non_empty)
            .ok_or(ExtractError::MissingDownloadUrl)?;

        Ok(PageFields {
            filename,
            download_url,
        })
    }
}

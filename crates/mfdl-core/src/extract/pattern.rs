//! Textual extraction: regular expressions against the raw markup.
//!
//! Mirrors the selector strategy without building a tree. The filename is the
//! text of the first element whose class list contains `filename`; the link is
//! the `href` of the first element with class `input` inside the first element
//! with `id="download_link"`. Element bounds come from counting same-name open
//! and close tags, so an element's window ends at its own closing tag.

use regex::Regex;
use std::sync::LazyLock;

use super::entities::decode_entities;
use super::{non_empty, ExtractError, FieldExtractor, PageFields};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Class attribute (either quote style) whose token list contains `name`.
fn class_token(name: &str) -> String {
    format!(
        r#"\sclass\s*=\s*(?:"(?:[^"]*\s)?{name}(?:\s[^"]*)?"|'(?:[^']*\s)?{name}(?:\s[^']*)?')"#
    )
}

static FILENAME_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)<([a-z][a-z0-9]*)\b[^>]*?{}[^>]*>",
        class_token("filename")
    ))
    .unwrap()
});

static DOWNLOAD_BLOCK_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<([a-z][a-z0-9]*)\b[^>]*?\sid\s*=\s*["']download_link["'][^>]*>"#).unwrap()
});

static INPUT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)<[a-z][a-z0-9]*\b[^>]*?{}[^>]*>",
        class_token("input")
    ))
    .unwrap()
});

static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\shref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Any open or close tag; group 1 is `/` for close tags, group 2 the name.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(/?)([a-z][a-z0-9]*)\b[^>]*>").unwrap());

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Markup between the opening tag matched by `open` (first match in `html`)
/// and its matching close tag. An unclosed element runs to the end of input.
fn first_element_content<'h>(open: &Regex, html: &'h str) -> Option<&'h str> {
    let caps = open.captures(html)?;
    let tag = caps.get(0)?;
    let name = caps.get(1)?.as_str();
    if tag.as_str().ends_with("/>") || VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name)) {
        return Some("");
    }

    let rest = &html[tag.end()..];
    let mut depth = 0usize;
    for inner in TAG.captures_iter(rest) {
        if !inner[2].eq_ignore_ascii_case(name) {
            continue;
        }
        let whole = &inner[0];
        if &inner[1] == "/" {
            if depth == 0 {
                let close = inner.get(0)?.start();
                return Some(&rest[..close]);
            }
            depth -= 1;
        } else if !whole.ends_with("/>") {
            depth += 1;
        }
    }
    Some(rest)
}

/// Extracts fields with regular expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    fn find_filename(&self, html: &str) -> Option<String> {
        let inner = first_element_content(&FILENAME_OPEN, html)?;
        let text = MARKUP.replace_all(inner, "");
        non_empty(&decode_entities(&text))
    }

    fn find_download_url(&self, html: &str) -> Option<String> {
        let block = first_element_content(&DOWNLOAD_BLOCK_OPEN, html)?;
        let tag = INPUT_OPEN.find(block)?.as_str();
        let caps = HREF.captures(tag)?;
        let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
        non_empty(&decode_entities(raw))
    }
}

impl FieldExtractor for PatternExtractor {
    fn extract(&self, html: &str) -> Result<PageFields, ExtractError> {
        let filename = self
            .find_filename(html)
            .ok_or(ExtractError::MissingFilename)?;
        let download_url = self
            .find_download_url(html)
            .ok_or(ExtractError::MissingDownloadUrl)?;
        Ok(PageFields {
            filename,
            download_url,
        })
    }
}

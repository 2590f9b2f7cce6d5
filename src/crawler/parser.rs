//! HTML parser for extracting anchor links
//!
//! Link extraction is modelled as a capability that reports whether it
//! worked. A page whose links cannot be extracted is treated as a dead end;
//! it never aborts the crawl.

use scraper::{Html, Selector};

/// Links pulled out of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLinks {
    /// Raw `href` values, in document order
    pub links: Vec<String>,

    /// False when the page could not be parsed for links
    pub ok: bool,
}

impl ParsedLinks {
    /// A failed extraction; carries no links
    pub fn failed() -> Self {
        Self {
            links: Vec::new(),
            ok: false,
        }
    }
}

/// Extracts anchor `href` values from an HTML body
pub trait LinkParser: Send + Sync {
    fn extract_links(&self, html: &str) -> ParsedLinks;
}

/// [`LinkParser`] backed by `scraper`
///
/// Returns the raw `href` of every `<a>` element, except those whose
/// lowercase form ends with one of the configured skip extensions
/// (documents, images, archives). No resolution happens here; see
/// [`normalize_link`](crate::url::normalize_link).
#[derive(Debug, Clone, Default)]
pub struct HtmlLinkParser {
    skip_extensions: Vec<String>,
}

impl HtmlLinkParser {
    /// Creates a parser that drops links ending with any of `skip_extensions`
    pub fn new(skip_extensions: Vec<String>) -> Self {
        let skip_extensions = skip_extensions
            .into_iter()
            .map(|ext| ext.to_lowercase())
            .collect();
        Self { skip_extensions }
    }

    fn is_skipped(&self, href: &str) -> bool {
        let lower = href.to_lowercase();
        self.skip_extensions.iter().any(|ext| lower.ends_with(ext))
    }
}

impl LinkParser for HtmlLinkParser {
    fn extract_links(&self, html: &str) -> ParsedLinks {
        let selector = match Selector::parse("a[href]") {
            Ok(selector) => selector,
            Err(e) => {
                tracing::warn!("Failed to build anchor selector: {:?}", e);
                return ParsedLinks::failed();
            }
        };

        let document = Html::parse_document(html);

        let links = document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| !self.is_skipped(href))
            .map(str::to_string)
            .collect();

        ParsedLinks { links, ok: true }
    }
}

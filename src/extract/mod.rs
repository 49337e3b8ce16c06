//! Declarative CSS-selector extraction of search results from HTML.
//!
//! Each scraping adapter owns a constant [`SelectorConfig`] describing where
//! results live in its provider's markup; [`extract`] walks the parsed
//! document once and produces normalized results in document order.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, SearchError};
use crate::html::resolve_url;
use crate::providers::ProviderId;
use crate::results::SearchResult;

/// Custom per-field extraction, for providers whose markup needs more than
/// a selector (redirect-wrapped URLs, nested title nodes). Plain fn pointers
/// so configs stay `'static` constants.
pub type FieldExtractor = fn(&ElementRef<'_>) -> Option<String>;

/// Where to find results inside one provider's result page.
#[derive(Clone)]
pub struct SelectorConfig {
    /// Selector for one result container node.
    pub container: &'static str,
    /// Selector for the title, relative to the container.
    pub title: Option<&'static str>,
    /// Selector for the link, relative to the container. The `href`
    /// attribute of the first match is taken.
    pub url: Option<&'static str>,
    /// Selector for the snippet, relative to the container.
    pub snippet: Option<&'static str>,
    /// Overrides taking precedence over the field selectors above.
    pub title_extractor: Option<FieldExtractor>,
    pub url_extractor: Option<FieldExtractor>,
    pub snippet_extractor: Option<FieldExtractor>,
    /// Containers matching any of these are skipped (ads, related-search
    /// widgets).
    pub exclude: &'static [&'static str],
    /// Base for resolving relative result URLs.
    pub base_url: Option<&'static str>,
}

impl SelectorConfig {
    pub const fn new(container: &'static str) -> Self {
        Self {
            container,
            title: None,
            url: None,
            snippet: None,
            title_extractor: None,
            url_extractor: None,
            snippet_extractor: None,
            exclude: &[],
            base_url: None,
        }
    }
}

/// Extract results from a provider result page.
///
/// Empty or whitespace-only input is the one condition treated as malformed;
/// a well-formed page that simply matches nothing yields an empty vec.
/// Selector strings are compile-time constants, so a parse failure there is
/// a programming error and panics.
pub fn extract(html: &str, config: &SelectorConfig, source: ProviderId) -> Result<Vec<SearchResult>> {
    if html.trim().is_empty() {
        return Err(SearchError::MalformedHtml {
            provider: source.to_string(),
        });
    }

    let document = Html::parse_document(html);
    let container = parse_selector(config.container);
    let title_sel = config.title.map(parse_selector);
    let url_sel = config.url.map(parse_selector);
    let snippet_sel = config.snippet.map(parse_selector);
    let exclude: Vec<Selector> = config.exclude.iter().copied().map(parse_selector).collect();

    let mut results = Vec::new();
    for node in document.select(&container) {
        if exclude.iter().any(|sel| sel.matches(&node)) {
            continue;
        }

        let title = field(&node, config.title_extractor, title_sel.as_ref(), text_of);
        let raw_url = field(&node, config.url_extractor, url_sel.as_ref(), href_of);
        let snippet = field(&node, config.snippet_extractor, snippet_sel.as_ref(), text_of);

        // A node with neither a title nor a link is navigation chrome.
        if title.is_none() && raw_url.is_none() {
            continue;
        }

        let url = match raw_url {
            Some(raw) => match resolve_url(&raw, config.base_url) {
                Some(url) => url,
                // Unresolvable link: drop this result, keep the rest.
                None => continue,
            },
            None => String::new(),
        };

        let mut result = SearchResult::new(title.unwrap_or_default(), url, source);
        if let Some(snippet) = snippet {
            result = result.with_snippet(snippet);
        }
        results.push(result);
    }

    Ok(results)
}

fn parse_selector(sel: &str) -> Selector {
    Selector::parse(sel).expect("constant selector parses")
}

fn field(
    node: &ElementRef<'_>,
    extractor: Option<FieldExtractor>,
    selector: Option<&Selector>,
    default: FieldExtractor,
) -> Option<String> {
    if let Some(f) = extractor {
        return f(node).filter(|s| !s.is_empty());
    }
    let target = node.select(selector?).next()?;
    default(&target).filter(|s| !s.is_empty())
}

/// Joined, whitespace-normalized text of a node.
pub fn text_of(node: &ElementRef<'_>) -> Option<String> {
    let text = node.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// The node's own `href` attribute.
pub fn href_of(node: &ElementRef<'_>) -> Option<String> {
    node.value().attr("href").map(str::to_string)
}

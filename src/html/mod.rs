//! HTML pre-processing applied before selector extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("valid regex")
});
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("valid regex"));
static NOSCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<noscript\b[^>]*>.*?</noscript>").expect("valid regex")
});
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip script/style/noscript blocks and comments, then collapse runs of
/// whitespace. Scraped result pages carry megabytes of inline JS that the
/// selector walk never needs; dropping it up front keeps parsing cheap.
pub fn strip_noise(html: &str) -> String {
    let html = SCRIPT_RE.replace_all(html, " ");
    let html = STYLE_RE.replace_all(&html, " ");
    let html = NOSCRIPT_RE.replace_all(&html, " ");
    let html = COMMENT_RE.replace_all(&html, " ");
    WHITESPACE_RE.replace_all(&html, " ").trim().to_string()
}

/// Resolve a possibly relative URL against a base. Returns `None` when the
/// input is neither absolute nor joinable.
pub fn resolve_url(raw: &str, base: Option<&str>) -> Option<String> {
    match Url::parse(raw) {
        Ok(url) => Some(url.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(base?).ok()?;
            base.join(raw).ok().map(|u| u.to_string())
        }
        Err(_) => None,
    }
}

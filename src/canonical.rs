//! URL identity for crawl deduplication.

use url::Url;

/// Strips the query string and fragment from `url`.
///
/// Scheme, host and path are kept exactly as written: no case folding and no
/// trailing slash normalization. Input that is not a well-formed URL goes
/// through the same textual cut.
pub fn canonicalize(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].to_string()
}

/// Makes a suggestion link fetchable relative to the page it was found on.
///
/// Absolute links are returned untouched. Relative links are joined onto
/// `base` when one is known; otherwise they are kept as given.
pub fn resolve_link(base: Option<&str>, link: &str) -> String {
    let link = link.trim();
    if Url::parse(link).is_ok() {
        return link.to_string();
    }

    base.and_then(|base| Url::parse(base).ok())
        .and_then(|base| base.join(link).ok())
        .map(String::from)
        .unwrap_or_else(|| link.to_string())
}

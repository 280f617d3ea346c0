use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves an href against a base URL
///
/// Relative hrefs are joined onto `base`; absolute hrefs replace it. Only
/// http and https results are accepted.
///
/// # Examples
///
/// ```
/// use column_scribe::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/column/01.md").unwrap();
/// let url = resolve_href(&base, "images/a.png").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/column/images/a.png");
/// ```
pub fn resolve_href(base: &Url, href: &str) -> UrlResult<Url> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

/// Percent-decodes an href
///
/// Next-page links on the site are emitted percent-encoded; they are decoded
/// before being joined onto the base URL. Sequences that do not decode to
/// UTF-8 leave the href unchanged.
pub fn decode_href(href: &str) -> String {
    match urlencoding::decode(href) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            tracing::debug!("href {} is not valid percent-encoded UTF-8, using as-is", href);
            href.to_string()
        }
    }
}

/// Parses a user-supplied start URL, which may be absolute or site-relative
pub fn parse_start_url(input: &str, base: &Url) -> UrlResult<Url> {
    let input = input.trim();

    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    match Url::parse(input) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(url),
        Ok(url) => Err(UrlError::InvalidScheme(url.scheme().to_string())),
        Err(::url::ParseError::RelativeUrlWithoutBase) => resolve_href(base, input),
        Err(e) => Err(UrlError::Parse(format!("{}: {}", input, e))),
    }
}

use crate::url::decode_href;
use std::path::Path;
use url::Url;

/// Derives the local filename for a downloaded image
///
/// The filename is the percent-decoded last segment of the URL path, so
/// `/img/%E6%9E%B6%E6%9E%84.png` is stored as `架构.png`. Returns `None` when
/// the path ends in `/`, has no segments, or decodes to something that is not
/// a single path component.
///
/// # Examples
///
/// ```
/// use column_scribe::url::asset_filename;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/img/diagram.png?v=2").unwrap();
/// assert_eq!(asset_filename(&url), Some("diagram.png".to_string()));
/// ```
pub fn asset_filename(url: &Url) -> Option<String> {
    let decoded = decode_href(last_segment(url)?);

    if decoded.contains('/') || decoded.contains('\\') || !is_plain_component(&decoded) {
        tracing::debug!("Image path segment in {} is not a usable filename", url);
        return None;
    }

    Some(decoded)
}

/// Derives a human-readable name from the last path segment of a URL
///
/// The segment is percent-decoded and its extension removed, so
/// `/col/01%20Intro.md` yields `01 Intro`.
pub fn url_basename(url: &Url) -> Option<String> {
    let decoded = decode_href(last_segment(url)?);

    Path::new(&decoded)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
        .filter(|stem| !stem.is_empty())
}

/// The raw, still-encoded last path segment
fn last_segment(url: &Url) -> Option<&str> {
    url.path_segments()?
        .last()
        .filter(|segment| is_plain_component(segment))
}

fn is_plain_component(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_filename() {
        let url = Url::parse("https://example.com/a/b/photo.jpg").unwrap();
        assert_eq!(asset_filename(&url), Some("photo.jpg".to_string()));
    }

    #[test]
    fn test_asset_filename_ignores_query() {
        let url = Url::parse("https://example.com/photo.jpg?size=large#x").unwrap();
        assert_eq!(asset_filename(&url), Some("photo.jpg".to_string()));
    }

    #[test]
    fn test_asset_filename_directory() {
        let url = Url::parse("https://example.com/images/").unwrap();
        assert_eq!(asset_filename(&url), None);

        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(asset_filename(&url), None);
    }

    #[test]
    fn test_asset_filename_decodes_segment() {
        let url = Url::parse("https://example.com/col/assets/架构图.png").unwrap();
        assert_eq!(url.path(), "/col/assets/%E6%9E%B6%E6%9E%84%E5%9B%BE.png");
        assert_eq!(asset_filename(&url), Some("架构图.png".to_string()));

        let url = Url::parse("https://example.com/img/a%20b(1).png").unwrap();
        assert_eq!(asset_filename(&url), Some("a b(1).png".to_string()));
    }

    #[test]
    fn test_asset_filename_rejects_separators() {
        let url = Url::parse("https://example.com/img/..%2Fescape.png").unwrap();
        assert_eq!(asset_filename(&url), None);

        let url = Url::parse("https://example.com/img/a%5Cb.png").unwrap();
        assert_eq!(asset_filename(&url), None);

        let url = Url::parse("https://example.com/img/%2E%2E").unwrap();
        assert_eq!(asset_filename(&url), None);
    }

    #[test]
    fn test_url_basename() {
        let url = Url::parse("https://example.com/col/01%20Intro.md").unwrap();
        assert_eq!(url_basename(&url), Some("01 Intro".to_string()));

        let url = Url::parse("https://example.com/col/").unwrap();
        assert_eq!(url_basename(&url), None);
    }
}

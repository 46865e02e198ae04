/// URL recovery from share-target query parameters
use regex::Regex;
use std::sync::LazyLock;
use url::{Url, form_urlencoded};

static EMBEDDED_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("embedded URL pattern is valid"));

/// True if `candidate` parses as an absolute http:// or https:// URL
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Find the first http(s) URL embedded in free text, up to the next whitespace
pub fn extract_url_from_text(text: &str) -> Option<&str> {
    EMBEDDED_URL.find(text).map(|m| m.as_str())
}

/// Recover the shared URL from a share-target query string
///
/// Apps disagree on where they put the link. YouTube and X send it inside
/// `text`, browsers usually use `url`, a few put it in `title`. Order:
/// 1. `url`, if it is a valid URL
/// 2. first URL embedded in `text`, else `text` itself if valid
/// 3. `title`, if it is a valid URL
/// 4. empty string (the user types it in)
pub fn extract_shared_url(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    let param = |name: &str| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if let Some(url) = param("url").filter(|u| is_valid_url(u)) {
        return url;
    }

    if let Some(text) = param("text") {
        if let Some(embedded) = extract_url_from_text(&text) {
            return embedded.to_string();
        }
        if is_valid_url(&text) {
            return text;
        }
    }

    param("title")
        .filter(|t| is_valid_url(t))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("just some words"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("mailto:someone@example.com"));
    }

    #[test]
    fn test_extract_url_from_text() {
        assert_eq!(
            extract_url_from_text("look https://youtu.be/abc?t=10 cool"),
            Some("https://youtu.be/abc?t=10")
        );
        assert_eq!(extract_url_from_text("no link here"), None);
    }

    #[test]
    fn test_extract_from_url_param() {
        assert_eq!(
            extract_shared_url("?url=https%3A%2F%2Fexample.com%2Fa&text=https://other.com"),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_extract_from_text_param() {
        assert_eq!(
            extract_shared_url("?text=Check this out https://example.com/x"),
            "https://example.com/x"
        );
        assert_eq!(
            extract_shared_url("?title=Video&text=Watch+this%3A+https%3A%2F%2Fyoutu.be%2Fabc"),
            "https://youtu.be/abc"
        );
    }

    #[test]
    fn test_extract_falls_back_to_title() {
        assert_eq!(
            extract_shared_url("?url=not a url&title=https://example.com"),
            "https://example.com"
        );
        assert_eq!(
            extract_shared_url("?text=nothing here&title=https://example.com"),
            "https://example.com"
        );
    }

    #[test]
    fn test_extract_nothing_usable() {
        assert_eq!(extract_shared_url(""), "");
        assert_eq!(extract_shared_url("?"), "");
        assert_eq!(extract_shared_url("?url=nope&text=hello&title=world"), "");
        assert_eq!(extract_shared_url("?url=ftp://example.com"), "");
    }

    #[test]
    fn test_extract_without_leading_question_mark() {
        assert_eq!(extract_shared_url("url=https://example.com"), "https://example.com");
    }
}

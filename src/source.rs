/// Source type detection for shared URLs
use serde::{Deserialize, Serialize};
use url::Url;

const YOUTUBE_HOSTS: [&str; 3] = ["youtube.com", "youtu.be", "m.youtube.com"];
const X_HOSTS: [&str; 3] = ["x.com", "twitter.com", "mobile.twitter.com"];

/// Display classification of the site a URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    #[default]
    Webpage,
    Youtube,
    XPost,
}

impl SourceType {
    pub fn glyph(&self) -> &'static str {
        match self {
            SourceType::Youtube => "▶",
            SourceType::XPost => "𝕏",
            SourceType::Webpage => "🌐",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceType::Youtube => "YouTube",
            SourceType::XPost => "X / Twitter",
            SourceType::Webpage => "Webpage",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SourceType::Youtube => "youtube",
            SourceType::XPost => "x-post",
            SourceType::Webpage => "webpage",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Youtube => "youtube",
            SourceType::XPost => "x_post",
            SourceType::Webpage => "webpage",
        }
    }
}

/// Classify a URL by hostname
///
/// Algorithm:
/// 1. Parse the URL; anything unparsable (or host-less) is a webpage
/// 2. Lower-case the hostname and strip a leading "www."
/// 3. Match against the YouTube hosts, then the X/Twitter hosts
///
/// Examples:
/// - https://www.youtube.com/watch?v=abc → Youtube
/// - https://mobile.twitter.com/user/status/1 → XPost
/// - https://example.com → Webpage
pub fn detect_source_type(url: &str) -> SourceType {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|h| h.to_lowercase()))
    else {
        return SourceType::Webpage;
    };

    let host = host.strip_prefix("www.").unwrap_or(host.as_str());

    if YOUTUBE_HOSTS.contains(&host) {
        SourceType::Youtube
    } else if X_HOSTS.contains(&host) {
        SourceType::XPost
    } else {
        SourceType::Webpage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_youtube_hosts() {
        assert_eq!(detect_source_type("https://youtube.com/watch?v=1"), SourceType::Youtube);
        assert_eq!(detect_source_type("https://www.youtube.com/watch?v=1"), SourceType::Youtube);
        assert_eq!(detect_source_type("https://youtu.be/abc"), SourceType::Youtube);
        assert_eq!(detect_source_type("https://m.youtube.com/watch?v=1"), SourceType::Youtube);
        assert_eq!(detect_source_type("https://WWW.YouTube.COM/shorts/x"), SourceType::Youtube);
    }

    #[test]
    fn test_detect_x_hosts() {
        assert_eq!(detect_source_type("https://x.com/rustlang/status/1"), SourceType::XPost);
        assert_eq!(detect_source_type("https://www.x.com/rustlang"), SourceType::XPost);
        assert_eq!(detect_source_type("https://twitter.com/rustlang"), SourceType::XPost);
        assert_eq!(detect_source_type("https://Mobile.Twitter.com/rustlang"), SourceType::XPost);
    }

    #[test]
    fn test_detect_webpage() {
        assert_eq!(detect_source_type("https://example.com"), SourceType::Webpage);
        assert_eq!(detect_source_type("https://music.youtube.com"), SourceType::Webpage);
        assert_eq!(detect_source_type("https://notx.com/post"), SourceType::Webpage);
        assert_eq!(detect_source_type("http://localhost:3000"), SourceType::Webpage);
    }

    #[test]
    fn test_detect_unparsable() {
        assert_eq!(detect_source_type(""), SourceType::Webpage);
        assert_eq!(detect_source_type("not a url"), SourceType::Webpage);
        assert_eq!(detect_source_type("youtube.com/watch"), SourceType::Webpage);
    }

    #[test]
    fn test_display_mapping() {
        assert_eq!(SourceType::Youtube.glyph(), "▶");
        assert_eq!(SourceType::XPost.label(), "X / Twitter");
        assert_eq!(SourceType::Webpage.css_class(), "webpage");
        assert_eq!(SourceType::XPost.as_str(), "x_post");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&SourceType::XPost).unwrap();
        assert_eq!(json, "\"x_post\"");
    }
}

use percent_encoding::percent_decode_str;
use url::Url;

/// Click source recorded when the request carries no `src` parameter.
pub const DEFAULT_SOURCE: &str = "direct";

/// Base used to resolve relative request paths. Only the path and query of
/// the result are ever read.
const PATH_BASE: &str = "http://pocketlink.local/";

/// An incoming visit of `/<shortcode>[?src=<source>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectRequest {
    pub shortcode: Option<String>,
    pub source: Option<String>,
    pub referrer: Option<String>,
}

impl RedirectRequest {
    pub fn new(shortcode: impl Into<String>) -> Self {
        Self {
            shortcode: Some(shortcode.into()),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Parses a request path such as `/abc123?src=qr`.
    ///
    /// The path must be a single non-empty segment, optionally followed by
    /// one trailing slash. Any other path yields a request without a
    /// shortcode. Absolute URLs are accepted too, in which case only their
    /// path and query are used.
    pub fn from_path(path: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(PATH_BASE)?.join(path.trim())?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(Iterator::collect)
            .unwrap_or_default();
        let segments = match segments.as_slice() {
            [rest @ .., ""] => rest,
            all => all,
        };
        let shortcode = match segments {
            [single] if !single.is_empty() => Some(percent_decode(single)),
            _ => None,
        };

        let source = url
            .query_pairs()
            .find(|(key, _)| key == "src")
            .map(|(_, value)| value.into_owned());

        Ok(Self {
            shortcode,
            source,
            referrer: None,
        })
    }

    /// The click source: the `src` parameter, or `"direct"` when it is
    /// absent or empty.
    pub fn source_or_default(&self) -> &str {
        self.source
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SOURCE)
    }

    /// The referrer, if one was supplied and is not blank.
    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref().filter(|r| !r.trim().is_empty())
    }
}

fn percent_decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_code_and_source() {
        let request = RedirectRequest::from_path("/abc123?src=qr").unwrap();
        assert_eq!(request.shortcode.as_deref(), Some("abc123"));
        assert_eq!(request.source_or_default(), "qr");
        assert_eq!(request.referrer(), None);
    }

    #[test]
    fn missing_source_defaults_to_direct() {
        let request = RedirectRequest::from_path("/abc123").unwrap();
        assert_eq!(request.source, None);
        assert_eq!(request.source_or_default(), "direct");

        let request = RedirectRequest::from_path("/abc123?src=").unwrap();
        assert_eq!(request.source_or_default(), "direct");
    }

    #[test]
    fn empty_path_has_no_code() {
        for path in ["", "/", "/?src=qr"] {
            let request = RedirectRequest::from_path(path).unwrap();
            assert_eq!(request.shortcode, None, "{path:?}");
        }
    }

    #[test]
    fn accepts_relative_paths_and_absolute_urls() {
        let request = RedirectRequest::from_path("abc123").unwrap();
        assert_eq!(request.shortcode.as_deref(), Some("abc123"));

        let request =
            RedirectRequest::from_path("http://localhost:3000/my-alias?src=email").unwrap();
        assert_eq!(request.shortcode.as_deref(), Some("my-alias"));
        assert_eq!(request.source_or_default(), "email");
    }

    #[test]
    fn decodes_escaped_segments() {
        let request = RedirectRequest::from_path("/a%20b").unwrap();
        assert_eq!(request.shortcode.as_deref(), Some("a b"));
    }

    #[test]
    fn plus_in_a_segment_is_literal() {
        let request = RedirectRequest::from_path("/a+b?src=x+y").unwrap();
        assert_eq!(request.shortcode.as_deref(), Some("a+b"));
        // the query string is form encoded
        assert_eq!(request.source_or_default(), "x y");
    }

    #[test]
    fn only_single_segment_paths_carry_a_code() {
        for path in ["/docs/extra/stuff", "/docs/extra", "/docs//"] {
            let request = RedirectRequest::from_path(path).unwrap();
            assert_eq!(request.shortcode, None, "{path:?}");
        }

        let request = RedirectRequest::from_path("/docs/?src=qr").unwrap();
        assert_eq!(request.shortcode.as_deref(), Some("docs"));
        assert_eq!(request.source_or_default(), "qr");
    }

    #[test]
    fn blank_referrer_is_ignored() {
        let request = RedirectRequest::new("abc").with_referrer("  ");
        assert_eq!(request.referrer(), None);

        let request = RedirectRequest::new("abc").with_referrer("https://news.example");
        assert_eq!(request.referrer(), Some("https://news.example"));
    }

    #[test]
    fn unparsable_paths_fail() {
        assert!(RedirectRequest::from_path("http://[::1").is_err());
    }
}

// src/validate.rs
//! URL gate for incoming extraction requests.
//!
//! A URL is accepted only when it is absolute, uses `http` or `https`, and the
//! scheme is spelled out by the caller. `example.com/post` or `//example.com`
//! are rejected even though a browser would happily complete them. No
//! top-level domain is required, so `http://localhost/x` passes.

use url::Url;

const ALLOWED_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Parse `raw` into a [`Url`] if it passes the gate, `None` otherwise.
pub fn parse_article_url(raw: &str) -> Option<Url> {
    if raw.is_empty() || raw.chars().any(char::is_whitespace) {
        return None;
    }
    if !has_explicit_scheme(raw) {
        return None;
    }

    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}

pub fn is_valid_article_url(raw: &str) -> bool {
    parse_article_url(raw).is_some()
}

fn has_explicit_scheme(raw: &str) -> bool {
    ALLOWED_PREFIXES.iter().any(|prefix| {
        raw.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(is_valid_article_url("https://example.com/article"));
        assert!(is_valid_article_url("http://blog.example.org/2024/01/post?id=3#top"));
        assert!(is_valid_article_url("HTTPS://Example.com/"));
    }

    #[test]
    fn single_label_and_ip_hosts_pass() {
        assert!(is_valid_article_url("http://localhost/x"));
        assert!(is_valid_article_url("http://intranet:8080/blog/post"));
        assert!(is_valid_article_url("http://127.0.0.1/post"));
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        for raw in [
            "",
            "example.com/article",
            "/relative/path",
            "//example.com/article",
            "ftp://example.com/file.txt",
            "mailto:someone@example.com",
            "javascript:alert(1)",
            "http:example.com",
            "https:/example.com",
        ] {
            assert!(!is_valid_article_url(raw), "should reject {raw:?}");
        }
    }

    #[test]
    fn rejects_whitespace_and_missing_host() {
        assert!(!is_valid_article_url(" https://example.com"));
        assert!(!is_valid_article_url("https://exa mple.com"));
        assert!(!is_valid_article_url("https://"));
    }

    #[test]
    fn parsed_url_keeps_path_and_query() {
        let url = parse_article_url("https://example.com/a/b?c=d").expect("valid");
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/a/b");
        assert_eq!(url.query(), Some("c=d"));
    }
}

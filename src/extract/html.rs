// src/extract/html.rs
//! Page fetching and small DOM lookups shared by both extractors.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::FetchSettings;

/// A downloaded page plus the URL it was finally served from (after redirects).
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: Url,
    pub html: String,
}

/// Thin wrapper over a `reqwest::Client`. Each extractor owns one so the two
/// fetches of a request stay independent.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        let resp = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} non-2xx"))?;

        let final_url = resp.url().clone();
        let html = resp.text().await.context("reading response body")?;
        if html.trim().is_empty() {
            bail!("empty body from {final_url}");
        }
        Ok(FetchedPage { final_url, html })
    }
}

/// Run a synchronous parse on the blocking pool. A panicking parser becomes
/// an ordinary error for the extractor that ran it.
pub async fn parse_blocking<T, F>(what: &'static str, parse: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .with_context(|| format!("{what} parse task"))?
}

/// `content` of the first `<meta>` whose `property`, `name` or `itemprop`
/// equals one of `keys`, tried in order.
pub fn meta_content(doc: &Html, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let css = format!(
            r#"meta[property="{key}"], meta[name="{key}"], meta[itemprop="{key}"]"#
        );
        let sel = Selector::parse(&css).ok()?;
        doc.select(&sel)
            .filter_map(|el| el.value().attr("content"))
            .map(str::trim)
            .find(|c| !c.is_empty())
            .map(str::to_string)
    })
}

/// First element matching any of `selectors`, tried in order.
pub fn first_match<'a>(doc: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|css| {
        let sel = Selector::parse(css).ok()?;
        doc.select(&sel).next()
    })
}

/// First non-empty attribute value among elements matching `css`.
pub fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Whitespace-collapsed text of an element.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a possibly relative `href` against `base`; only http(s) results are kept.
pub fn absolutize(base: &Url, href: &str) -> Option<String> {
    let joined = base.join(href.trim()).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}

pub fn non_empty(s: String) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <title>  Plain title </title>
        <meta property="og:title" content="OG title">
        <meta name="description" content="">
        <meta name="twitter:description" content="From twitter">
        <link rel="icon" href="/static/icon.png">
    </head><body><h1>Heading <em>one</em></h1></body></html>"#;

    #[test]
    fn meta_lookup_respects_key_order_and_skips_empty() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(
            meta_content(&doc, &["og:title", "twitter:title"]).as_deref(),
            Some("OG title")
        );
        assert_eq!(
            meta_content(&doc, &["description", "twitter:description"]).as_deref(),
            Some("From twitter")
        );
        assert!(meta_content(&doc, &["author"]).is_none());
    }

    #[test]
    fn text_and_attr_helpers() {
        let doc = Html::parse_document(PAGE);
        let h1 = first_match(&doc, &["article h1", "h1"]).expect("h1");
        assert_eq!(element_text(h1), "Heading one");
        assert_eq!(
            first_attr(&doc, r#"link[rel~="icon"]"#, "href").as_deref(),
            Some("/static/icon.png")
        );
    }

    #[test]
    fn absolutize_resolves_relative_and_drops_other_schemes() {
        let base = Url::parse("https://example.com/blog/post").unwrap();
        assert_eq!(
            absolutize(&base, "/static/icon.png").as_deref(),
            Some("https://example.com/static/icon.png")
        );
        assert_eq!(
            absolutize(&base, "other").as_deref(),
            Some("https://example.com/blog/other")
        );
        assert!(absolutize(&base, "mailto:me@example.com").is_none());
    }

    #[tokio::test]
    async fn blocking_parse_passes_results_and_catches_panics() {
        let n = parse_blocking("count", || Ok(PAGE.len())).await.unwrap();
        assert_eq!(n, PAGE.len());

        let err = parse_blocking("fail", || -> Result<()> { bail!("no body") })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no body");

        let err = parse_blocking("boom", || -> Result<()> { panic!("parser blew up") })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom parse task");
    }
}

// src/extract/metadata.rs
//! Metadata-first extractor.
//!
//! Reads Open Graph / Twitter / plain `<meta>` tags for the descriptive fields
//! and takes the body from the first article-like container. Pages without
//! such a container are treated as "not an article" and fail.

use anyhow::{bail, Result};
use async_trait::async_trait;
use scraper::Html;
use url::Url;

use super::html::{
    absolutize, element_text, first_attr, first_match, meta_content, non_empty, parse_blocking,
    PageFetcher,
};
use super::types::{ArticleExtractor, PrimaryArticle};

pub const NAME: &str = "metadata-extractor";

/// Reading speed used for `ttr`.
const WORDS_PER_MINUTE: u64 = 300;

const BODY_SELECTORS: &[&str] = &[
    "article",
    r#"[itemprop="articleBody"]"#,
    "main",
    r#"[role="main"]"#,
];

pub struct MetadataExtractor {
    fetcher: PageFetcher,
}

impl MetadataExtractor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ArticleExtractor for MetadataExtractor {
    type Article = PrimaryArticle;

    async fn extract(&self, url: &Url) -> Result<PrimaryArticle> {
        let page = self.fetcher.fetch(url).await?;
        let requested = url.clone();
        parse_blocking(NAME, move || parse_article(&page.html, &requested, &page.final_url)).await
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

/// Build a [`PrimaryArticle`] from raw HTML. `requested` is what the client
/// asked for, `served` is where the page actually came from.
pub fn parse_article(html: &str, requested: &Url, served: &Url) -> Result<PrimaryArticle> {
    let doc = Html::parse_document(html);

    let Some(body) = first_match(&doc, BODY_SELECTORS) else {
        bail!("no article body in {served}");
    };
    let text = element_text(body);
    if text.is_empty() {
        bail!("article body in {served} has no text");
    }
    let content = non_empty(body.inner_html());

    let canonical = first_attr(&doc, r#"link[rel="canonical"]"#, "href")
        .and_then(|href| absolutize(served, &href));
    let og_url = meta_content(&doc, &["og:url"]).and_then(|href| absolutize(served, &href));
    let shortlink = first_attr(&doc, r#"link[rel="shortlink"]"#, "href")
        .and_then(|href| absolutize(served, &href));

    let url = canonical
        .clone()
        .or_else(|| og_url.clone())
        .unwrap_or_else(|| served.to_string());

    let title = meta_content(&doc, &["og:title", "twitter:title"])
        .or_else(|| first_match(&doc, &["title"]).and_then(|t| non_empty(element_text(t))))
        .or_else(|| first_match(&doc, &["h1"]).and_then(|h| non_empty(element_text(h))));

    let author = meta_content(&doc, &["author", "article:author", "byl", "parsely-author"])
        .or_else(|| {
            first_match(&doc, &[r#"[rel="author"]"#, r#"[itemprop="author"]"#])
                .and_then(|a| non_empty(element_text(a)))
        });

    let published = meta_content(
        &doc,
        &[
            "article:published_time",
            "datePublished",
            "date",
            "pubdate",
            "dc.date",
        ],
    )
    .or_else(|| first_attr(&doc, "time[datetime]", "datetime"));

    let image = meta_content(&doc, &["og:image", "og:image:url", "twitter:image"])
        .and_then(|src| absolutize(served, &src));

    let source = meta_content(&doc, &["og:site_name", "application-name"])
        .or_else(|| served.host_str().map(str::to_string));

    let description = meta_content(&doc, &["og:description", "description", "twitter:description"]);

    let favicon = first_attr(&doc, r#"link[rel~="icon"]"#, "href")
        .and_then(|href| absolutize(served, &href))
        .or_else(|| absolutize(served, "/favicon.ico"));

    let kind = meta_content(&doc, &["og:type"]).or_else(|| Some("article".to_string()));

    let words = text.split_whitespace().count() as u64;
    let ttr = (words * 60).div_ceil(WORDS_PER_MINUTE);

    Ok(PrimaryArticle {
        url: Some(url.clone()),
        title,
        author,
        published,
        image,
        content,
        source,
        description,
        favicon,
        ttr: Some(ttr),
        kind,
        links: Some(alias_links([
            Some(requested.to_string()),
            Some(served.to_string()),
            Some(url),
            canonical,
            og_url,
            shortlink,
        ])),
    })
}

fn alias_links<const N: usize>(candidates: [Option<String>; N]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(N);
    for link in candidates.into_iter().flatten() {
        if !out.contains(&link) {
            out.push(link);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html><head>
  <title>Fallback title | Example Blog</title>
  <meta property="og:title" content="Ownership in Practice">
  <meta property="og:site_name" content="Example Blog">
  <meta property="og:type" content="article">
  <meta property="og:image" content="/img/cover.jpg">
  <meta property="og:description" content="How borrowing shapes APIs.">
  <meta name="author" content="Jane Doe">
  <meta property="article:published_time" content="2024-05-01T10:00:00Z">
  <link rel="canonical" href="https://example.com/posts/ownership">
  <link rel="icon" href="/favicon-32.png">
</head><body>
  <nav>Home About</nav>
  <article><h1>Ownership in Practice</h1><p>one two three four five six seven eight nine ten</p></article>
</body></html>"#;

    fn urls() -> (Url, Url) {
        (
            Url::parse("https://example.com/p?id=1").unwrap(),
            Url::parse("https://example.com/posts/ownership?id=1").unwrap(),
        )
    }

    #[test]
    fn extracts_meta_fields_and_body() {
        let (requested, served) = urls();
        let a = parse_article(PAGE, &requested, &served).expect("article");

        assert_eq!(a.title.as_deref(), Some("Ownership in Practice"));
        assert_eq!(a.author.as_deref(), Some("Jane Doe"));
        assert_eq!(a.published.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(a.image.as_deref(), Some("https://example.com/img/cover.jpg"));
        assert_eq!(a.source.as_deref(), Some("Example Blog"));
        assert_eq!(a.description.as_deref(), Some("How borrowing shapes APIs."));
        assert_eq!(a.kind.as_deref(), Some("article"));
        assert_eq!(a.url.as_deref(), Some("https://example.com/posts/ownership"));
        assert_eq!(a.favicon.as_deref(), Some("https://example.com/favicon-32.png"));

        let content = a.content.expect("content");
        assert!(content.contains("<p>one two"));
        assert!(!content.contains("Home About"));
    }

    #[test]
    fn ttr_rounds_up_to_whole_seconds() {
        let (requested, served) = urls();
        let a = parse_article(PAGE, &requested, &served).unwrap();
        // 13 words ("Ownership in Practice" + ten) at 300 wpm -> 2.6s -> 3s
        assert_eq!(a.ttr, Some(3));
    }

    #[test]
    fn links_are_deduplicated_in_discovery_order() {
        let (requested, served) = urls();
        let a = parse_article(PAGE, &requested, &served).unwrap();
        assert_eq!(
            a.links.unwrap(),
            vec![
                "https://example.com/p?id=1".to_string(),
                "https://example.com/posts/ownership?id=1".to_string(),
                "https://example.com/posts/ownership".to_string(),
            ]
        );
    }

    #[test]
    fn falls_back_to_title_tag_host_and_default_favicon() {
        let html = "<html><head><title>Just a title</title></head>\
                    <body><main><p>Body text here.</p></main></body></html>";
        let u = Url::parse("https://news.example.org/x").unwrap();
        let a = parse_article(html, &u, &u).unwrap();
        assert_eq!(a.title.as_deref(), Some("Just a title"));
        assert_eq!(a.source.as_deref(), Some("news.example.org"));
        assert_eq!(a.favicon.as_deref(), Some("https://news.example.org/favicon.ico"));
        assert!(a.author.is_none());
        assert!(a.published.is_none());
    }

    #[test]
    fn page_without_article_container_fails() {
        let u = Url::parse("https://example.com/").unwrap();
        let err = parse_article("<html><body><div>hello</div></body></html>", &u, &u);
        assert!(err.is_err());
    }
}

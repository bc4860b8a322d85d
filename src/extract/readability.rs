// src/extract/readability.rs
//! Readability extractor backed by `dom_smoothie`.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use dom_smoothie::{Config, Readability};
use scraper::Html;
use url::Url;

use super::html::{absolutize, meta_content, non_empty, parse_blocking, PageFetcher};
use super::types::{ArticleExtractor, SecondaryArticle};

pub const NAME: &str = "readability";

const MAX_ELEMENTS: usize = 9000;

pub struct ReadabilityExtractor {
    fetcher: PageFetcher,
}

impl ReadabilityExtractor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ArticleExtractor for ReadabilityExtractor {
    type Article = SecondaryArticle;

    async fn extract(&self, url: &Url) -> Result<SecondaryArticle> {
        let page = self.fetcher.fetch(url).await?;
        parse_blocking(NAME, move || parse_article(&page.html, &page.final_url)).await
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

/// Run Readability over `html`. Multi-page articles are not followed, so the
/// page counts are always 1.
pub fn parse_article(html: &str, served: &Url) -> Result<SecondaryArticle> {
    let cfg = Config {
        max_elements_to_parse: MAX_ELEMENTS,
        ..Default::default()
    };

    let mut readability = Readability::new(html, Some(served.as_str()), Some(cfg))
        .map_err(|e| anyhow!("readability init for {served}: {e}"))?;
    let article = readability
        .parse()
        .map_err(|e| anyhow!("readability parse for {served}: {e}"))?;

    let text = article.text_content.to_string();
    let word_count = text.split_whitespace().count() as u64;
    let content = non_empty(article.content.to_string());
    if word_count == 0 && content.is_none() {
        bail!("readability found no content in {served}");
    }

    // Lead image is not part of the Readability output; read it off the head.
    let image = {
        let doc = Html::parse_document(html);
        meta_content(&doc, &["og:image", "og:image:url", "twitter:image"])
            .and_then(|src| absolutize(served, &src))
    };

    Ok(SecondaryArticle {
        url: Some(served.to_string()),
        title: non_empty(article.title),
        author: article.byline.and_then(non_empty),
        date_published: article.published_time.and_then(non_empty),
        image,
        content,
        source: article
            .site_name
            .and_then(non_empty)
            .or_else(|| served.host_str().map(str::to_string)),
        excerpt: article.excerpt.and_then(non_empty),
        word_count: Some(word_count),
        direction: Some(article.dir.and_then(non_empty).unwrap_or_else(|| "ltr".to_string())),
        total_pages: Some(1),
        rendered_pages: Some(1),
    })
}

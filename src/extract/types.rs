// src/extract/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// What the metadata-first extractor returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryArticle {
    pub url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
    pub image: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub favicon: Option<String>,
    pub ttr: Option<u64>, // seconds
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub links: Option<Vec<String>>, // every URL the article is known under
}

/// What the Readability extractor returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryArticle {
    pub url: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub date_published: Option<String>,
    pub image: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub excerpt: Option<String>,
    pub word_count: Option<u64>,
    pub direction: Option<String>,
    pub total_pages: Option<u64>,
    pub rendered_pages: Option<u64>,
}

/// One extraction engine. Each call does its own network fetch; a returned
/// error is final for that engine within the current request.
#[async_trait::async_trait]
pub trait ArticleExtractor: Send + Sync {
    type Article: Send;

    async fn extract(&self, url: &Url) -> Result<Self::Article>;
    fn name(&self) -> &'static str;
}

// src/extract/mod.rs
//! Dual extraction: both engines run concurrently against the same URL and
//! the request proceeds once both have settled, whatever their outcome.

pub mod html;
pub mod metadata;
pub mod readability;
pub mod types;

use std::sync::Arc;

use metrics::counter;
use url::Url;

use crate::config::FetchSettings;
use crate::extract::html::PageFetcher;
use crate::extract::metadata::MetadataExtractor;
use crate::extract::readability::ReadabilityExtractor;
use crate::extract::types::{ArticleExtractor, PrimaryArticle, SecondaryArticle};

pub type DynPrimary = Arc<dyn ArticleExtractor<Article = PrimaryArticle>>;
pub type DynSecondary = Arc<dyn ArticleExtractor<Article = SecondaryArticle>>;

/// Final state of one extractor call.
#[derive(Debug)]
pub enum Settled<T> {
    Fulfilled(T),
    Rejected(anyhow::Error),
}

impl<T> From<anyhow::Result<T>> for Settled<T> {
    fn from(res: anyhow::Result<T>) -> Self {
        match res {
            Ok(v) => Settled::Fulfilled(v),
            Err(e) => Settled::Rejected(e),
        }
    }
}

impl<T> Settled<T> {
    /// Value if fulfilled. A rejection is reported to the operator log here and
    /// goes no further.
    fn into_value(self, extractor: &'static str, url: &Url) -> Option<T> {
        match self {
            Settled::Fulfilled(v) => Some(v),
            Settled::Rejected(e) => {
                tracing::warn!(error = ?e, extractor, %url, "extractor failed");
                counter!("extractor_failures_total", "extractor" => extractor).increment(1);
                None
            }
        }
    }
}

/// Outcome of a request where at least one extractor succeeded.
#[derive(Debug, Clone)]
pub struct DualExtraction {
    pub primary: Option<PrimaryArticle>,
    pub secondary: Option<SecondaryArticle>,
    /// Name of the extractor whose data leads the merge.
    pub winner: &'static str,
}

/// Neither extractor produced anything.
#[derive(Debug, thiserror::Error)]
#[error("no extractor produced data for {url}")]
pub struct ExtractionFailed {
    pub url: String,
}

/// The pair of extraction engines used for every request.
#[derive(Clone)]
pub struct Extractors {
    primary: DynPrimary,
    secondary: DynSecondary,
}

impl Extractors {
    pub fn new(primary: DynPrimary, secondary: DynSecondary) -> Self {
        Self { primary, secondary }
    }

    /// Production pair: metadata extractor first, Readability second, each
    /// with its own HTTP client.
    pub fn from_settings(settings: &FetchSettings) -> anyhow::Result<Self> {
        let primary = MetadataExtractor::new(PageFetcher::new(settings)?);
        let secondary = ReadabilityExtractor::new(PageFetcher::new(settings)?);
        Ok(Self::new(Arc::new(primary), Arc::new(secondary)))
    }

    pub fn primary_name(&self) -> &'static str {
        self.primary.name()
    }

    pub fn secondary_name(&self) -> &'static str {
        self.secondary.name()
    }

    /// Run both extractors and wait for both. Fails only when both fail.
    pub async fn extract_both(&self, url: &Url) -> Result<DualExtraction, ExtractionFailed> {
        let (primary, secondary) =
            tokio::join!(self.primary.extract(url), self.secondary.extract(url));
        let primary = Settled::from(primary).into_value(self.primary_name(), url);
        let secondary = Settled::from(secondary).into_value(self.secondary_name(), url);

        let winner = match (&primary, &secondary) {
            (Some(_), _) => self.primary_name(),
            (None, Some(_)) => self.secondary_name(),
            (None, None) => {
                return Err(ExtractionFailed {
                    url: url.to_string(),
                })
            }
        };

        Ok(DualExtraction {
            primary,
            secondary,
            winner,
        })
    }
}

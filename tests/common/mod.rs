// tests/common/mod.rs
//
// Scripted extractors for driving the orchestrator and router without network.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use blog_extractor::extract::types::{ArticleExtractor, PrimaryArticle, SecondaryArticle};
use blog_extractor::extract::Extractors;
use url::Url;

/// Returns a fixed value (or a fixed failure) after an optional delay, and
/// counts how often it was called.
pub struct Scripted<A> {
    name: &'static str,
    outcome: Option<A>,
    delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl<A> Scripted<A> {
    pub fn ok(name: &'static str, value: A) -> Self {
        Self {
            name,
            outcome: Some(value),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            outcome: None,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait::async_trait]
impl<A: Clone + Send + Sync + 'static> ArticleExtractor for Scripted<A> {
    type Article = A;

    async fn extract(&self, url: &Url) -> Result<A> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome
            .clone()
            .ok_or_else(|| anyhow!("{} could not parse {url}", self.name))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

pub const PRIMARY: &str = "metadata-extractor";
pub const SECONDARY: &str = "readability";

pub fn extractors(
    primary: Scripted<PrimaryArticle>,
    secondary: Scripted<SecondaryArticle>,
) -> Extractors {
    Extractors::new(Arc::new(primary), Arc::new(secondary))
}

pub fn sample_primary() -> PrimaryArticle {
    PrimaryArticle {
        title: Some("A".into()),
        author: None,
        content: Some("<p>hi</p>".into()),
        ..Default::default()
    }
}

pub fn sample_secondary() -> SecondaryArticle {
    SecondaryArticle {
        title: Some("B".into()),
        author: Some("Jane".into()),
        word_count: Some(42),
        ..Default::default()
    }
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

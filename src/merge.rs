// src/merge.rs
//! Field-by-field merge of the two extractor outputs.
//!
//! Every output field is resolved from an ordered list of candidates: the first
//! one that is present wins, otherwise the field is `null`. The candidate lists
//! are the whole policy; the primary extractor is listed first for every field
//! both engines know about.

use serde::{Deserialize, Serialize};

use crate::extract::types::{PrimaryArticle, SecondaryArticle};

/// The single record returned to clients. Every key is always serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedArticle {
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
    pub favicon: Option<String>,
    pub ttr: Option<u64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub links: Option<Vec<String>>,
}

/// Whether a value counts as "there". Empty strings and zero counts do not.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for u64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        true
    }
}

/// First candidate that exists and is present.
pub fn first_present<T, I>(candidates: I) -> Option<T>
where
    T: Presence,
    I: IntoIterator<Item = Option<T>>,
{
    candidates.into_iter().flatten().find(Presence::is_present)
}

/// Merge both extractor outputs. Never fails; either side may be missing.
pub fn merge_articles(
    primary: Option<&PrimaryArticle>,
    secondary: Option<&SecondaryArticle>,
) -> NormalizedArticle {
    let p = |f: fn(&PrimaryArticle) -> &Option<String>| primary.and_then(|a| f(a).clone());
    let s = |f: fn(&SecondaryArticle) -> &Option<String>| secondary.and_then(|a| f(a).clone());
    let s_count = |f: fn(&SecondaryArticle) -> Option<u64>| secondary.and_then(f);

    NormalizedArticle {
        url: first_present([p(|a| &a.url), s(|a| &a.url)]),
        title: first_present([p(|a| &a.title), s(|a| &a.title)]),
        author: first_present([p(|a| &a.author), s(|a| &a.author)]),
        date_published: first_present([p(|a| &a.published), s(|a| &a.date_published)]),
        image: first_present([p(|a| &a.image), s(|a| &a.image)]),
        content: first_present([p(|a| &a.content), s(|a| &a.content)]),
        source: first_present([p(|a| &a.source), s(|a| &a.source)]),
        excerpt: first_present([p(|a| &a.description), s(|a| &a.excerpt)]),

        // Readability-only
        word_count: first_present([s_count(|a| a.word_count)]),
        direction: first_present([s(|a| &a.direction)]),
        total_pages: first_present([s_count(|a| a.total_pages)]),
        rendered_pages: first_present([s_count(|a| a.rendered_pages)]),

        // Metadata-only, never backfilled
        favicon: first_present([p(|a| &a.favicon)]),
        ttr: first_present([primary.and_then(|a| a.ttr)]),
        kind: first_present([p(|a| &a.kind)]),
        links: first_present([primary.and_then(|a| a.links.clone())]),
    }
}

// src/model.rs
//! Wire types for the digest pipeline: candidate items in, curated digest out.
//!
//! The digest shape is the UI contract; field names must not drift.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SCHEMA_VERSION: &str = "v1";

/// One article/feed entry eligible for the digest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateItem {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CandidateItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: None,
            date: None,
            snippet: None,
            content: None,
            author: None,
            tags: Vec::new(),
        }
    }

    /// Longest available body: content, then snippet, then nothing.
    /// Empty strings count as absent.
    pub fn body_text(&self) -> &str {
        non_empty(self.content.as_deref())
            .or_else(|| non_empty(self.snippet.as_deref()))
            .unwrap_or("")
    }

    /// Identity used for cache fingerprints.
    pub fn identity_key(&self) -> String {
        format!("{}|{}", self.title, self.url)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

/// Closed section taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionName {
    Models,
    Agents,
    Multimodal,
    Systems,
    Safety,
    Evaluation,
    Product,
    OpenSource,
    Policy,
    Other,
}

impl SectionName {
    pub const ALL: [SectionName; 10] = [
        SectionName::Models,
        SectionName::Agents,
        SectionName::Multimodal,
        SectionName::Systems,
        SectionName::Safety,
        SectionName::Evaluation,
        SectionName::Product,
        SectionName::OpenSource,
        SectionName::Policy,
        SectionName::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Models => "Models",
            SectionName::Agents => "Agents",
            SectionName::Multimodal => "Multimodal",
            SectionName::Systems => "Systems",
            SectionName::Safety => "Safety",
            SectionName::Evaluation => "Evaluation",
            SectionName::Product => "Product",
            SectionName::OpenSource => "OpenSource",
            SectionName::Policy => "Policy",
            SectionName::Other => "Other",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Importance / credibility / freshness, each 1..=5 once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub importance: u8,
    pub credibility: u8,
    pub freshness: u8,
}

impl Scores {
    pub const NEUTRAL: Scores = Scores {
        importance: 3,
        credibility: 3,
        freshness: 3,
    };

    pub(crate) fn fields(&self) -> [(&'static str, u8); 3] {
        [
            ("importance", self.importance),
            ("credibility", self.credibility),
            ("freshness", self.freshness),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestStats {
    pub items_in: usize,
    pub items_kept: usize,
    pub top_stories_count: usize,
    pub duplicates_count: usize,
}

/// Full top-story card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopStory {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub url: String,
    pub source: String,
    pub date: String,
    pub section: SectionName,
    pub one_liner: String,
    pub bullets: Vec<String>,
    pub why_it_matters: String,
    pub action_items: Vec<String>,
    pub read_time_min: u32,
    pub scores: Scores,
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionItem {
    pub ref_id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub date: String,
    pub one_liner: String,
    pub scores: Scores,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: SectionName,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub query_hint: String,
    pub matching_tags: Vec<String>,
    pub top_refs: Vec<String>,
    pub one_sentence_map: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub title: String,
    pub url: String,
    pub merged_into: String,
    pub reason: String,
}

/// Root digest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedDigest {
    pub schema_version: String,
    pub generated_at: String,
    pub stats: DigestStats,
    pub top_stories: Vec<TopStory>,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub tag_index: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub search_summaries: Vec<SearchSummary>,
    #[serde(default)]
    pub duplicates: Vec<DuplicateRecord>,
}

// src/ingest/types.rs
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input must contain a JSON array of items")]
    NotAnArray,

    #[error("item #{index} is invalid: {source}")]
    InvalidItem {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// How an article entered the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestKind {
    Manual,
    Rss,
}

impl IngestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestKind::Manual => "manual",
            IngestKind::Rss => "rss",
        }
    }
}

/// `meta.json` written next to each stored article.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleMeta {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    pub fetched_at: NaiveDateTime,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: IngestKind,
}

// src/ingest/library.rs
//! Library layout: `<library>/<YYYY>/<MM>/<slug>/{meta.json, content.txt}`.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::ingest::types::{ArticleMeta, InputError};
use crate::model::CandidateItem;

/// Articles fetched on `date`, mapped to candidates.
///
/// A missing month directory yields an empty list. Unreadable `meta.json`
/// files are skipped with a warning.
pub fn load_library_for_date(
    library_dir: &Path,
    date: NaiveDate,
) -> Result<Vec<CandidateItem>, InputError> {
    let month_dir = library_dir
        .join(date.format("%Y").to_string())
        .join(date.format("%m").to_string());
    if !month_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&month_dir).map_err(|source| InputError::Io {
        path: month_dir.clone(),
        source,
    })?;

    let mut dirs: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    // read_dir order is platform-dependent.
    dirs.sort();

    let mut items = Vec::new();
    for dir in dirs {
        let meta_path = dir.join("meta.json");
        let Ok(raw) = fs::read_to_string(&meta_path) else {
            continue;
        };
        let meta: ArticleMeta = match serde_json::from_str(&raw) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %meta_path.display(), error = %e, "invalid meta.json, skipping");
                continue;
            }
        };
        if meta.fetched_at.date() != date {
            continue;
        }
        let content = fs::read_to_string(dir.join("content.txt")).ok();
        items.push(to_candidate(meta, content));
    }

    info!(date = %date, count = items.len(), "loaded library articles");
    Ok(items)
}

fn to_candidate(meta: ArticleMeta, content: Option<String>) -> CandidateItem {
    let date = meta
        .published_date
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| meta.fetched_at.format("%Y-%m-%d").to_string());
    CandidateItem {
        title: meta.title,
        url: meta.url,
        source: Some(meta.source.as_str().to_string()),
        date: Some(date),
        snippet: None,
        content,
        author: meta.author,
        tags: meta.tags,
    }
}

// src/curate/validate.rs
//! Strict acceptance check for digests coming back from the generation service.
//!
//! Two steps: typed deserialization (shape, required fields, closed section
//! set) and then the rules below.
//! - `schema_version` is `v1`
//! - `stats.items_kept == top_stories.len()`
//! - every story id is non-empty and unique
//! - 3..=5 bullets per story
//! - every score in 1..=5, for stories and section items
//! - every `ref_id` in `sections` and `tag_index` names a top story

use std::collections::HashSet;
use thiserror::Error;

use crate::model::{CuratedDigest, Scores, SCHEMA_VERSION};

pub const MIN_BULLETS: usize = 3;
pub const MAX_BULLETS: usize = 5;
pub const SCORE_MIN: u8 = 1;
pub const SCORE_MAX: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("response is not a digest document: {0}")]
    Malformed(String),

    #[error("unsupported schema_version {0:?}")]
    SchemaVersion(String),

    #[error("stats.items_kept is {kept} but there are {stories} top stories")]
    ItemsKeptMismatch { kept: usize, stories: usize },

    #[error("top story #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate top story id {0:?}")]
    DuplicateId(String),

    #[error("story {id:?} has {count} bullets (want 3..=5)")]
    BulletCount { id: String, count: usize },

    #[error("{owner}: score {field}={value} outside 1..=5")]
    ScoreOutOfRange {
        owner: String,
        field: &'static str,
        value: u8,
    },

    #[error("{location} references unknown story id {ref_id:?}")]
    DanglingRef { location: String, ref_id: String },
}

/// Deserialize raw model output, then validate it.
pub fn parse_digest(raw: &str) -> Result<CuratedDigest, ValidationError> {
    let digest: CuratedDigest =
        serde_json::from_str(raw).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    validate(&digest)?;
    Ok(digest)
}

/// Check every rule; the first violation is returned.
pub fn validate(d: &CuratedDigest) -> Result<(), ValidationError> {
    if d.schema_version != SCHEMA_VERSION {
        return Err(ValidationError::SchemaVersion(d.schema_version.clone()));
    }

    if d.stats.items_kept != d.top_stories.len() {
        return Err(ValidationError::ItemsKeptMismatch {
            kept: d.stats.items_kept,
            stories: d.top_stories.len(),
        });
    }

    let mut ids: HashSet<&str> = HashSet::with_capacity(d.top_stories.len());
    for (index, story) in d.top_stories.iter().enumerate() {
        if story.id.trim().is_empty() {
            return Err(ValidationError::EmptyId { index });
        }
        if !ids.insert(story.id.as_str()) {
            return Err(ValidationError::DuplicateId(story.id.clone()));
        }
        let count = story.bullets.len();
        if !(MIN_BULLETS..=MAX_BULLETS).contains(&count) {
            return Err(ValidationError::BulletCount {
                id: story.id.clone(),
                count,
            });
        }
        check_scores(&story.scores, || format!("story {:?}", story.id))?;
    }

    for section in &d.sections {
        for item in &section.items {
            check_scores(&item.scores, || {
                format!("section {} item {:?}", section.name, item.ref_id)
            })?;
            if !ids.contains(item.ref_id.as_str()) {
                return Err(ValidationError::DanglingRef {
                    location: format!("section {}", section.name),
                    ref_id: item.ref_id.clone(),
                });
            }
        }
    }

    for (tag, refs) in &d.tag_index {
        if let Some(bad) = refs.iter().find(|r| !ids.contains(r.as_str())) {
            return Err(ValidationError::DanglingRef {
                location: format!("tag_index[{tag:?}]"),
                ref_id: bad.clone(),
            });
        }
    }

    Ok(())
}

fn check_scores<F>(scores: &Scores, owner: F) -> Result<(), ValidationError>
where
    F: Fn() -> String,
{
    for (field, value) in scores.fields() {
        if !(SCORE_MIN..=SCORE_MAX).contains(&value) {
            return Err(ValidationError::ScoreOutOfRange {
                owner: owner(),
                field,
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn story(id: &str) -> Value {
        json!({
            "id": id, "title": "T", "subtitle": "S", "url": "https://x.test",
            "source": "src", "date": "2024-01-01", "section": "Models",
            "one_liner": "one", "bullets": ["a", "b", "c"],
            "why_it_matters": "w", "action_items": ["try it"],
            "read_time_min": 3,
            "scores": {"importance": 4, "credibility": 5, "freshness": 3},
            "tags": ["llm"], "notes": ""
        })
    }

    fn base() -> Value {
        json!({
            "schema_version": "v1",
            "generated_at": "2024-01-02",
            "stats": {
                "items_in": 5, "items_kept": 2, "top_stories_count": 2, "duplicates_count": 0
            },
            "top_stories": [story("a"), story("b")],
            "sections": [{"name": "Models", "items": [{
                "ref_id": "a", "title": "T", "url": "https://x.test", "source": "src",
                "date": "2024-01-01", "one_liner": "one",
                "scores": {"importance": 4, "credibility": 5, "freshness": 3}, "tags": []
            }]}],
            "tag_index": {"llm": ["a", "b"]},
            "search_summaries": [],
            "duplicates": []
        })
    }

    fn check(v: Value) -> Result<CuratedDigest, ValidationError> {
        parse_digest(&v.to_string())
    }

    #[test]
    fn well_formed_digest_passes() {
        let d = check(base()).unwrap();
        assert_eq!(d.top_stories.len(), 2);
    }

    #[test]
    fn optional_collections_may_be_missing() {
        let mut v = base();
        let obj = v.as_object_mut().unwrap();
        obj.remove("tag_index");
        obj.remove("search_summaries");
        obj.remove("duplicates");
        assert!(check(v).is_ok());
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let mut v = base();
        v.as_object_mut().unwrap().remove("stats");
        assert!(matches!(check(v), Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn unknown_section_is_malformed() {
        let mut v = base();
        v["top_stories"][0]["section"] = json!("Robotics");
        assert!(matches!(check(v), Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn items_kept_must_match() {
        let mut v = base();
        v["stats"]["items_kept"] = json!(3);
        assert_eq!(
            check(v).unwrap_err(),
            ValidationError::ItemsKeptMismatch { kept: 3, stories: 2 }
        );
    }

    #[test]
    fn bullet_bounds() {
        let mut v = base();
        v["top_stories"][1]["bullets"] = json!(["only", "two"]);
        assert!(matches!(check(v), Err(ValidationError::BulletCount { count: 2, .. })));

        let mut v = base();
        v["top_stories"][0]["bullets"] = json!(["1", "2", "3", "4", "5", "6"]);
        assert!(matches!(check(v), Err(ValidationError::BulletCount { count: 6, .. })));

        let mut v = base();
        v["top_stories"][0]["bullets"] = json!(["1", "2", "3", "4", "5"]);
        assert!(check(v).is_ok());
    }

    #[test]
    fn scores_must_be_in_range() {
        let mut v = base();
        v["top_stories"][0]["scores"]["importance"] = json!(0);
        assert!(matches!(
            check(v),
            Err(ValidationError::ScoreOutOfRange { field: "importance", value: 0, .. })
        ));

        let mut v = base();
        v["sections"][0]["items"][0]["scores"]["freshness"] = json!(6);
        assert!(matches!(
            check(v),
            Err(ValidationError::ScoreOutOfRange { field: "freshness", value: 6, .. })
        ));
    }

    #[test]
    fn fractional_score_is_malformed() {
        let mut v = base();
        v["top_stories"][0]["scores"]["credibility"] = json!(4.5);
        assert!(matches!(check(v), Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn dangling_refs_are_rejected() {
        let mut v = base();
        v["sections"][0]["items"][0]["ref_id"] = json!("ghost");
        assert!(matches!(check(v), Err(ValidationError::DanglingRef { .. })));

        let mut v = base();
        v["tag_index"]["llm"] = json!(["a", "ghost"]);
        let err = check(v).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DanglingRef {
                location: "tag_index[\"llm\"]".into(),
                ref_id: "ghost".into()
            }
        );
    }

    #[test]
    fn duplicate_and_empty_ids_are_rejected() {
        let mut v = base();
        v["top_stories"][1]["id"] = json!("a");
        assert_eq!(check(v).unwrap_err(), ValidationError::DuplicateId("a".into()));

        let mut v = base();
        v["top_stories"][0]["id"] = json!("");
        assert_eq!(check(v).unwrap_err(), ValidationError::EmptyId { index: 0 });
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let mut v = base();
        v["schema_version"] = json!("v2");
        assert_eq!(
            check(v).unwrap_err(),
            ValidationError::SchemaVersion("v2".into())
        );
    }
}

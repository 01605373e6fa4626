// src/curate/fallback.rs
//! Deterministic stand-in digest, built without any generation service.
//!
//! Used when no credential is configured and whenever generation fails. The
//! output is always schema-valid: at most 12 stories, each with 3 bullets and
//! neutral 3/3/3 scores, all filed under `Other`.

use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tracing::info;

use crate::model::{
    CandidateItem, CuratedDigest, DigestStats, Scores, Section, SectionItem, SectionName,
    TopStory, SCHEMA_VERSION,
};

pub const MAX_FALLBACK_STORIES: usize = 12;
pub const SLUG_MAX_CHARS: usize = 60;
pub const SUBTITLE_MAX_CHARS: usize = 40;
pub const ONE_LINER_MAX_CHARS: usize = 26;
pub const BULLET_MAX_CHARS: usize = 22;
pub const CHARS_PER_READ_MINUTE: usize = 1500;

const UNKNOWN: &str = "unknown";
const UNTAGGED: &str = "untagged";
const WHY_PLACEHOLDER: &str = "Detailed analysis needs a configured generation service";
const ACTION_PLACEHOLDER: &str = "Set OPENAI_API_KEY to get full curation";
const NOTES_PLACEHOLDER: &str = "Fallback entry, structural placeholder only";

/// Build the fallback digest dated today (UTC).
pub fn fallback_digest(items: &[CandidateItem], total_input_count: usize) -> CuratedDigest {
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    fallback_digest_dated(items, total_input_count, &today)
}

/// Build the fallback digest with an explicit `generated_at`.
pub fn fallback_digest_dated(
    items: &[CandidateItem],
    total_input_count: usize,
    generated_at: &str,
) -> CuratedDigest {
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut top_stories = Vec::new();
    let mut sections: BTreeMap<SectionName, Vec<SectionItem>> = BTreeMap::new();

    for (i, item) in items.iter().take(MAX_FALLBACK_STORIES).enumerate() {
        let id = unique_id(&item.title, i, &mut used_ids);
        let story = story_for(item, id);

        sections
            .entry(story.section)
            .or_default()
            .push(SectionItem {
                ref_id: story.id.clone(),
                title: story.title.clone(),
                url: story.url.clone(),
                source: story.source.clone(),
                date: story.date.clone(),
                one_liner: story.one_liner.clone(),
                scores: story.scores,
                tags: item.tags.clone(),
            });
        top_stories.push(story);
    }

    let kept = top_stories.len();
    info!(items_in = total_input_count, kept, "built fallback digest");

    CuratedDigest {
        schema_version: SCHEMA_VERSION.to_string(),
        generated_at: generated_at.to_string(),
        stats: DigestStats {
            items_in: total_input_count,
            items_kept: kept,
            top_stories_count: kept,
            duplicates_count: 0,
        },
        top_stories,
        sections: sections
            .into_iter()
            .map(|(name, items)| Section { name, items })
            .collect(),
        tag_index: BTreeMap::new(),
        search_summaries: Vec::new(),
        duplicates: Vec::new(),
    }
}

fn story_for(item: &CandidateItem, id: String) -> TopStory {
    let source = label_or_unknown(item.source.as_deref());
    let date = label_or_unknown(item.date.as_deref());
    let lead = item
        .snippet
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&item.title);

    let body_len = item.body_text().chars().count();
    let read_time_min =
        u32::try_from((body_len / CHARS_PER_READ_MINUTE).max(1)).unwrap_or(u32::MAX);

    let tags = if item.tags.is_empty() {
        vec![UNTAGGED.to_string()]
    } else {
        item.tags.clone()
    };

    TopStory {
        id,
        title: item.title.clone(),
        subtitle: truncate_chars(&item.title, SUBTITLE_MAX_CHARS),
        url: item.url.clone(),
        section: SectionName::Other,
        one_liner: truncate_chars(&item.title, ONE_LINER_MAX_CHARS),
        bullets: vec![
            truncate_chars(lead, BULLET_MAX_CHARS),
            truncate_chars(&format!("Source: {source}"), BULLET_MAX_CHARS),
            truncate_chars(&format!("Date: {date}"), BULLET_MAX_CHARS),
        ],
        source,
        date,
        why_it_matters: WHY_PLACEHOLDER.to_string(),
        action_items: vec![ACTION_PLACEHOLDER.to_string()],
        read_time_min,
        scores: Scores::NEUTRAL,
        tags,
        notes: NOTES_PLACEHOLDER.to_string(),
    }
}

fn label_or_unknown(v: Option<&str>) -> String {
    v.filter(|s| !s.trim().is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Slug id for position `i`; repeated slugs get `-2`, `-3`, ...
fn unique_id(title: &str, i: usize, used: &mut HashSet<String>) -> String {
    let base = match slugify(title) {
        s if s.is_empty() => format!("item-{i}"),
        s => s,
    };
    let mut id = base.clone();
    let mut n = 2;
    while used.contains(&id) {
        id = format!("{base}-{n}");
        n += 1;
    }
    used.insert(id.clone());
    id
}

/// Lowercase, collapse runs outside `[a-z0-9]` and CJK ideographs into `-`,
/// trim `-`, cap at 60 chars. Accented Latin letters count as separators.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.trim().to_lowercase().chars() {
        if is_slug_char(ch) {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    truncate_chars(&out, SLUG_MAX_CHARS)
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ('\u{4e00}'..='\u{9fff}').contains(&ch)
}

/// First `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curate::validate::validate;

    fn item(title: &str) -> CandidateItem {
        CandidateItem::new(title, format!("https://ex.test/{}", title.len()))
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("  Hello, World!!  GPT-5 "), "hello-world-gpt-5");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("多模态 模型"), "多模态-模型");
        assert_eq!(slugify(&"a".repeat(80)).chars().count(), SLUG_MAX_CHARS);
    }

    #[test]
    fn slugify_keeps_only_ascii_and_cjk() {
        assert_eq!(slugify("Café"), "caf");
        assert_eq!(slugify("Über Model 2"), "ber-model-2");
        assert_eq!(slugify("Ｇpt"), "pt");
        assert_eq!(slugify("東京 AI"), "東京-ai");
        // Hangul is outside the kept block.
        assert_eq!(slugify("한국어"), "");
    }

    #[test]
    fn caps_at_twelve_and_keeps_stats_consistent() {
        let items: Vec<CandidateItem> = (0..20).map(|i| item(&format!("Story {i}"))).collect();
        let d = fallback_digest_dated(&items, 50, "2024-01-02");
        assert_eq!(d.top_stories.len(), MAX_FALLBACK_STORIES);
        assert_eq!(d.stats.items_in, 50);
        assert_eq!(d.stats.items_kept, d.top_stories.len());
        assert_eq!(d.stats.top_stories_count, d.top_stories.len());
        assert_eq!(d.stats.duplicates_count, 0);
        assert!(d.tag_index.is_empty() && d.search_summaries.is_empty());
        validate(&d).unwrap();
    }

    #[test]
    fn stories_follow_placeholder_shape() {
        let mut it = item("A fairly long headline about a brand new model release");
        it.snippet = Some("Short snippet text that runs long".into());
        it.source = Some("Example Wire Service".into());
        it.content = Some("z".repeat(4600));
        let d = fallback_digest_dated(&[it], 1, "2024-01-02");
        let s = &d.top_stories[0];

        assert_eq!(s.section, SectionName::Other);
        assert_eq!(s.scores, Scores::NEUTRAL);
        assert_eq!(s.bullets.len(), 3);
        assert_eq!(s.bullets[0], "Short snippet text tha");
        assert_eq!(s.bullets[1], "Source: Example Wire S");
        assert_eq!(s.bullets[2], "Date: unknown");
        assert!(s.bullets.iter().all(|b| b.chars().count() <= BULLET_MAX_CHARS));
        assert_eq!(s.subtitle.chars().count(), SUBTITLE_MAX_CHARS);
        assert_eq!(s.one_liner.chars().count(), ONE_LINER_MAX_CHARS);
        assert_eq!(s.read_time_min, 3);
        assert_eq!(s.tags, vec!["untagged".to_string()]);
        assert_eq!(s.date, "unknown");
        assert_eq!(d.sections.len(), 1);
        assert_eq!(d.sections[0].name, SectionName::Other);
        assert_eq!(d.sections[0].items[0].ref_id, s.id);
    }

    #[test]
    fn read_time_is_at_least_one_minute() {
        let d = fallback_digest_dated(&[item("tiny")], 1, "2024-01-02");
        assert_eq!(d.top_stories[0].read_time_min, 1);
    }

    #[test]
    fn empty_slug_and_collisions_get_distinct_ids() {
        let items = vec![item("!!!"), item("Same"), item("Same")];
        let d = fallback_digest_dated(&items, 3, "2024-01-02");
        let ids: Vec<&str> = d.top_stories.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["item-0", "same", "same-2"]);
        validate(&d).unwrap();
    }

    #[test]
    fn empty_input_gives_empty_valid_digest() {
        let d = fallback_digest_dated(&[], 0, "2024-01-02");
        assert!(d.top_stories.is_empty());
        assert!(d.sections.is_empty());
        validate(&d).unwrap();
    }
}

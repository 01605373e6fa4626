// src/analyze/rerank.rs
//! Pre-ranking: reduce an arbitrary batch to the Top-K candidates sent to curation.
//!
//! - Every item gets a composite score (`scoring::score_at`).
//! - Sort by score descending; equal scores keep their input order.
//! - Truncate to `top_k`. `top_k == 0` yields an empty list.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::cmp::Ordering;
use tracing::info;

use crate::analyze::scoring::score_at;
use crate::model::CandidateItem;

/// Default number of candidates promoted to curation.
pub const DEFAULT_TOP_K: usize = 30;

/// An item paired with its score and original position. Lives only during ranking.
#[derive(Clone, Debug)]
pub struct ScoredCandidate<'a> {
    pub item: &'a CandidateItem,
    pub score: f64,
    pub position: usize,
}

/// Rank against the current UTC instant.
pub fn pre_rank(items: &[CandidateItem], top_k: usize) -> Vec<CandidateItem> {
    pre_rank_at(items, top_k, Utc::now().naive_utc())
}

/// Rank as of midnight UTC of `today`.
pub fn pre_rank_on(items: &[CandidateItem], top_k: usize, today: NaiveDate) -> Vec<CandidateItem> {
    pre_rank_at(items, top_k, today.and_time(NaiveTime::MIN))
}

/// Rank against a fixed UTC instant; the input slice is not reordered.
pub fn pre_rank_at(
    items: &[CandidateItem],
    top_k: usize,
    now: NaiveDateTime,
) -> Vec<CandidateItem> {
    let ranked = score_all(items, now);
    let top: Vec<CandidateItem> = ranked
        .into_iter()
        .take(top_k)
        .map(|s| s.item.clone())
        .collect();

    info!(items_in = items.len(), kept = top.len(), top_k, "pre_rank");
    top
}

/// All items scored and sorted (score desc, position asc).
pub fn score_all(items: &[CandidateItem], now: NaiveDateTime) -> Vec<ScoredCandidate<'_>> {
    let mut scored: Vec<ScoredCandidate<'_>> = items
        .iter()
        .enumerate()
        .map(|(position, item)| ScoredCandidate {
            item,
            score: score_at(item, now),
            position,
        })
        .collect();

    scored.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.position.cmp(&b.position),
        other => other,
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn item(title: &str, source: Option<&str>, content_len: usize) -> CandidateItem {
        let mut it = CandidateItem::new(title, format!("https://example.org/{title}"));
        it.source = source.map(str::to_string);
        if content_len > 0 {
            it.content = Some("c".repeat(content_len));
        }
        it
    }

    #[test]
    fn orders_by_score_desc() {
        let items = vec![
            item("low", None, 0),
            item("high", Some("Anthropic"), 6000),
            item("mid", Some("TechCrunch"), 600),
        ];
        let out = pre_rank_on(&items, 10, today());
        let titles: Vec<&str> = out.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "mid", "low"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let items: Vec<CandidateItem> = (0..6).map(|i| item(&format!("t{i}"), None, 0)).collect();
        let out = pre_rank_on(&items, 4, today());
        let titles: Vec<&str> = out.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["t0", "t1", "t2", "t3"]);
    }

    #[test]
    fn truncates_and_handles_zero() {
        let items: Vec<CandidateItem> = (0..5).map(|i| item(&format!("t{i}"), None, 0)).collect();
        assert_eq!(pre_rank_on(&items, 3, today()).len(), 3);
        assert_eq!(pre_rank_on(&items, 50, today()).len(), 5);
        assert!(pre_rank_on(&items, 0, today()).is_empty());
        assert!(pre_rank_on(&[], 5, today()).is_empty());
    }

    #[test]
    fn late_timestamp_outranks_same_day_morning() {
        let mut morning = item("morning", None, 0);
        morning.date = Some("2024-05-30T00:00:00".into());
        let mut late = item("late", None, 0);
        late.date = Some("2024-05-30T23:00:00".into());
        // At 2024-06-01 00:30 the morning item is 2 days old, the late one 1 day.
        let now = today().and_hms_opt(0, 30, 0).unwrap();
        let out = pre_rank_at(&[morning, late], 2, now);
        assert_eq!(out[0].title, "late");
        assert_eq!(out[1].title, "morning");
    }

    #[test]
    fn input_is_not_reordered() {
        let items = vec![item("low", None, 0), item("high", Some("OpenAI"), 6000)];
        let before = items.clone();
        let _ = pre_rank_on(&items, 2, today());
        assert_eq!(items, before);
    }
}

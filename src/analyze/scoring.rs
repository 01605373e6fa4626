//! Local relevance scoring used by the pre-ranker.
//!
//! Three independent signals:
//! - `source`    : publisher authority, 1..=5 (see `source_weights`)
//! - `freshness` : age bucket of the item's date, 0..=5
//! - `volume`    : amount of available text, 1..=5
//!
//! Composite = 0.4 * source + 0.3 * freshness + 0.3 * volume.
//! The weights are fixed; there is no calibration file for them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::model::CandidateItem;
use crate::source_weights;

pub const W_SOURCE: f64 = 0.4;
pub const W_FRESHNESS: f64 = 0.3;
pub const W_VOLUME: f64 = 0.3;

/// Freshness used when the date is missing or unparseable.
pub const DEFAULT_FRESHNESS: f64 = 2.0;

/// Per-signal breakdown of an item's score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreBreakdown {
    pub source: f64,
    pub freshness: f64,
    pub volume: f64,
}

impl ScoreBreakdown {
    pub fn composite(&self) -> f64 {
        W_SOURCE * self.source + W_FRESHNESS * self.freshness + W_VOLUME * self.volume
    }
}

/// Composite score relative to the current UTC instant.
pub fn score(item: &CandidateItem) -> f64 {
    score_at(item, Utc::now().naive_utc())
}

/// Composite score as of midnight UTC of `today`.
pub fn score_on(item: &CandidateItem, today: NaiveDate) -> f64 {
    score_at(item, today.and_time(NaiveTime::MIN))
}

/// Composite score relative to a fixed UTC instant.
pub fn score_at(item: &CandidateItem, now: NaiveDateTime) -> f64 {
    breakdown_at(item, now).composite()
}

pub fn breakdown_at(item: &CandidateItem, now: NaiveDateTime) -> ScoreBreakdown {
    ScoreBreakdown {
        source: f64::from(source_weights::weight_for(
            item.source.as_deref(),
            &item.url,
        )),
        freshness: freshness_score(item.date.as_deref(), now),
        volume: volume_score(item.body_text()),
    }
}

/// Age bucket: <=1 day 5, <=3 4, <=7 3, <=30 2, older 1.
///
/// Age is whole elapsed days between `now` and the item timestamp, so the
/// time of day counts. Future timestamps land in the freshest bucket.
pub fn freshness_score(date: Option<&str>, now: NaiveDateTime) -> f64 {
    let Some(parsed) = date.and_then(parse_item_date) else {
        return DEFAULT_FRESHNESS;
    };
    let days = now.signed_duration_since(parsed).num_days();
    match days {
        d if d <= 1 => 5.0,
        d if d <= 3 => 4.0,
        d if d <= 7 => 3.0,
        d if d <= 30 => 2.0,
        _ => 1.0,
    }
}

/// Length bucket over characters: >5000 5, >2000 4, >500 3, >100 2, else 1.
pub fn volume_score(text: &str) -> f64 {
    match text.chars().count() {
        n if n > 5000 => 5.0,
        n if n > 2000 => 4.0,
        n if n > 500 => 3.0,
        n if n > 100 => 2.0,
        _ => 1.0,
    }
}

/// Try the known date shapes in order; `None` if none fits.
///
/// The plain-date and ISO-datetime shapes look at the first 19 characters so
/// fractional seconds and offsets do not get in the way. Plain dates map to
/// midnight; RFC 2822 feed dates are converted to UTC.
pub fn parse_item_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let head: String = raw.chars().take(19).collect();

    NaiveDate::parse_from_str(&head, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
        .or_else(|| NaiveDateTime::parse_from_str(&head, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ").ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).naive_utc())
        })
        .or_else(|| {
            DateTime::parse_from_rfc2822(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).naive_utc())
        })
}

//! # Source Weights
//!
//! Fixed mapping from publishers/platforms to an authority weight in `2..=5`.
//!
//! - Foundational AI labs and major platforms score 4–5.
//! - Tier-2 tech press scores 3.
//! - Aggregators and forums score 2.
//! - Anything unmatched gets [`DEFAULT_SOURCE_WEIGHT`].
//!
//! Lookup is a case-insensitive substring match against the source label
//! first and the URL second. The table is scanned in order; the first entry
//! that matches either wins.

/// Weight for a source not present in the table.
pub const DEFAULT_SOURCE_WEIGHT: u8 = 2;

/// Ordered authority table. Order matters for overlapping keys.
pub(crate) const SOURCE_WEIGHTS: &[(&str, u8)] = &[
    ("openai", 5),
    ("anthropic", 5),
    ("google", 5),
    ("deepmind", 5),
    ("meta", 5),
    ("microsoft", 4),
    ("nvidia", 4),
    ("arxiv", 4),
    ("huggingface", 4),
    ("stability", 4),
    ("mistral", 4),
    ("cohere", 4),
    ("together", 3),
    ("github", 3),
    ("techcrunch", 3),
    ("theverge", 3),
    ("venturebeat", 3),
    ("hacker news", 2),
    ("reddit", 2),
];

/// Authority weight for an item's source label and URL.
pub fn weight_for(source: Option<&str>, url: &str) -> u8 {
    let src = source.unwrap_or_default().to_lowercase();
    let url = url.to_lowercase();

    SOURCE_WEIGHTS
        .iter()
        .find(|(key, _)| src.contains(key) || url.contains(key))
        .map(|&(_, w)| w)
        .unwrap_or(DEFAULT_SOURCE_WEIGHT)
}

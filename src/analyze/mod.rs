// src/analyze/mod.rs
//! Local analysis: per-item scoring and Top-K pre-ranking. No I/O.

pub mod rerank;
pub mod scoring;

// Re-export convenient types.
pub use crate::analyze::rerank::{
    pre_rank, pre_rank_at, pre_rank_on, ScoredCandidate, DEFAULT_TOP_K,
};
pub use crate::analyze::scoring::{
    score, score_at, score_on, ScoreBreakdown, DEFAULT_FRESHNESS,
};

// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod config;
pub mod curate;
pub mod ingest;
pub mod model;
pub mod source_weights;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{pre_rank, DEFAULT_TOP_K};
pub use crate::config::DigestConfig;
pub use crate::curate::{Curation, CurationOutcome, Curator, FallbackReason};
pub use crate::model::{CandidateItem, CuratedDigest};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DIGEST_FILE_NAME: &str = "digest.json";

/// Full two-stage run: pre-rank `items` to `top_k`, then curate the survivors.
///
/// `stats.items_in` reflects the whole batch, not just the Top-K.
pub async fn build_digest(
    curator: &Curator,
    items: &[CandidateItem],
    top_k: usize,
    use_cache: bool,
) -> Curation {
    let ranked = pre_rank(items, top_k);
    curator.curate(&ranked, items.len(), use_cache).await
}

/// Write `digest` as pretty JSON to `<out_dir>/digest.json`.
pub fn write_digest(out_dir: &Path, digest: &CuratedDigest) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output dir {}", out_dir.display()))?;
    let path = out_dir.join(DIGEST_FILE_NAME);
    let json = serde_json::to_string_pretty(digest).context("serializing digest")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "digest written");
    Ok(path)
}

// src/curate/cache.rs
//! Content-addressed digest cache.
//!
//! Key: first 16 hex chars of SHA-256 over the sorted `title|url` labels of the
//! candidate set, so reordering the same set maps to the same entry.
//! Value: the digest JSON, one file per key. Writes replace the whole file.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::curate::validate::parse_digest;
use crate::model::{CandidateItem, CuratedDigest};

pub const FINGERPRINT_LEN: usize = 16;

/// Order-independent fingerprint of a candidate set.
///
/// Labels are serialized as a JSON array with `", "` separators before hashing,
/// which keeps keys identical to caches written by earlier tooling.
pub fn fingerprint(items: &[CandidateItem]) -> String {
    let mut keys: Vec<String> = items.iter().map(CandidateItem::identity_key).collect();
    keys.sort();

    let quoted: Vec<String> = keys
        .iter()
        .map(|k| serde_json::to_string(k).unwrap_or_default())
        .collect();
    let blob = format!("[{}]", quoted.join(", "));

    let digest = Sha256::digest(blob.as_bytes());
    let mut out = String::with_capacity(FINGERPRINT_LEN);
    for b in digest.iter().take(FINGERPRINT_LEN / 2) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Flat file store under `<output_dir>/cache`.
#[derive(Debug, Clone)]
pub struct DigestCache {
    dir: PathBuf,
}

impl DigestCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, fp: &str) -> PathBuf {
        self.dir.join(format!("digest_{fp}.json"))
    }

    /// Cached digest for `fp`. Missing, unparseable or schema-invalid entries
    /// are a miss.
    pub fn get(&self, fp: &str) -> Option<CuratedDigest> {
        let path = self.path_for(fp);
        let raw = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(_) => return None,
        };
        match parse_digest(&raw) {
            Ok(d) => {
                info!(fingerprint = fp, "digest cache hit");
                Some(d)
            }
            Err(e) => {
                warn!(fingerprint = fp, error = %e, "invalid cache entry, treating as miss");
                None
            }
        }
    }

    /// Store `digest` under `fp`, replacing any previous entry.
    pub fn put(&self, fp: &str, digest: &CuratedDigest) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cache dir {}", self.dir.display()))?;
        let path = self.path_for(fp);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(digest).context("serializing digest")?;
        fs::write(&tmp, json.as_bytes())
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("renaming into {}", path.display()))?;
        info!(fingerprint = fp, path = %path.display(), "digest cached");
        Ok(())
    }
}

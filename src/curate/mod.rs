// src/curate/mod.rs
//! Curation stage: Top-K candidates in, validated digest out.
//!
//! Order:
//! 1) cache lookup by candidate-set fingerprint (when enabled)
//! 2) no credential → fallback digest
//! 3) one generation call → strict parse + validate
//! 4) any failure in (3) → fallback digest, never an error to the caller
//! 5) cache write of whatever was produced (when enabled)

pub mod ai_adapter;
pub mod cache;
pub mod fallback;
pub mod prompt;
pub mod validate;

use anyhow::Result;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::fmt;
use tracing::{info, warn};

use crate::config::DigestConfig;
use crate::model::{CandidateItem, CuratedDigest};

pub use crate::curate::ai_adapter::{
    build_generator, DigestGenerator, DynGenerator, GenerationRequest,
};
pub use crate::curate::cache::{fingerprint, DigestCache};
pub use crate::curate::fallback::fallback_digest;
pub use crate::curate::validate::{parse_digest, validate, ValidationError};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("digest_cache_hits_total", "Digests served from the cache.");
        describe_counter!(
            "digest_generated_total",
            "Digests produced by the generation service and accepted."
        );
        describe_counter!(
            "digest_fallback_total",
            "Fallback digests, labelled by reason (no_credential, service, invalid)."
        );
    });
}

/// Why the fallback digest was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No generation credential configured.
    NoCredential,
    /// Transport error, non-2xx, or empty completion.
    Service(String),
    /// Reply did not parse or broke a schema rule.
    Invalid(ValidationError),
}

impl FallbackReason {
    pub fn label(&self) -> &'static str {
        match self {
            FallbackReason::NoCredential => "no_credential",
            FallbackReason::Service(_) => "service",
            FallbackReason::Invalid(_) => "invalid",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoCredential => f.write_str("no generation credential configured"),
            FallbackReason::Service(e) => write!(f, "generation failed: {e}"),
            FallbackReason::Invalid(e) => write!(f, "generated digest rejected: {e}"),
        }
    }
}

/// How the returned digest came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurationOutcome {
    CacheHit,
    Generated,
    Fallback(FallbackReason),
}

impl CurationOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, CurationOutcome::Fallback(_))
    }
}

/// Digest plus provenance.
#[derive(Debug, Clone)]
pub struct Curation {
    pub digest: CuratedDigest,
    pub outcome: CurationOutcome,
    pub fingerprint: String,
}

pub struct Curator {
    cache: DigestCache,
    generator: Option<DynGenerator>,
    max_content_chars: usize,
}

impl Curator {
    pub fn new(
        cache: DigestCache,
        generator: Option<DynGenerator>,
        max_content_chars: usize,
    ) -> Self {
        Self {
            cache,
            generator,
            max_content_chars,
        }
    }

    /// Wire cache dir, provider and caps from config.
    pub fn from_config(cfg: &DigestConfig) -> Result<Self> {
        let generator = build_generator(cfg)?;
        info!(
            provider = generator.as_ref().map(|g| g.name()).unwrap_or("none"),
            model = %cfg.model,
            "curator ready"
        );
        Ok(Self::new(
            DigestCache::new(cfg.cache_dir()),
            generator,
            cfg.max_content_chars,
        ))
    }

    pub fn cache(&self) -> &DigestCache {
        &self.cache
    }

    /// Produce a digest for `items` (already pre-ranked). Never fails.
    pub async fn curate(
        &self,
        items: &[CandidateItem],
        total_input_count: usize,
        use_cache: bool,
    ) -> Curation {
        ensure_metrics_described();
        let fp = fingerprint(items);

        if use_cache {
            if let Some(digest) = self.cache.get(&fp) {
                counter!("digest_cache_hits_total").increment(1);
                return Curation {
                    digest,
                    outcome: CurationOutcome::CacheHit,
                    fingerprint: fp,
                };
            }
        }

        let (digest, outcome) = match self.generate(items, total_input_count).await {
            Ok(digest) => {
                counter!("digest_generated_total").increment(1);
                info!(fingerprint = %fp, outcome = "generated", "digest generated");
                (digest, CurationOutcome::Generated)
            }
            Err(reason) => {
                counter!("digest_fallback_total", "reason" => reason.label()).increment(1);
                match &reason {
                    FallbackReason::NoCredential => {
                        info!(fingerprint = %fp, outcome = reason.label(), "using fallback digest")
                    }
                    _ => warn!(
                        fingerprint = %fp,
                        outcome = reason.label(),
                        error = %reason,
                        "falling back to placeholder digest"
                    ),
                }
                (
                    fallback_digest(items, total_input_count),
                    CurationOutcome::Fallback(reason),
                )
            }
        };

        if use_cache {
            if let Err(e) = self.cache.put(&fp, &digest) {
                warn!(fingerprint = %fp, error = ?e, "digest cache write failed");
            }
        }

        Curation {
            digest,
            outcome,
            fingerprint: fp,
        }
    }

    /// Single generation attempt. `Err` carries the reason to degrade.
    async fn generate(
        &self,
        items: &[CandidateItem],
        total_input_count: usize,
    ) -> Result<CuratedDigest, FallbackReason> {
        let generator = self.generator.as_ref().ok_or(FallbackReason::NoCredential)?;

        let request = GenerationRequest {
            system: prompt::DIGEST_SYSTEM_PROMPT.to_string(),
            user: prompt::build_user_prompt(items, total_input_count, self.max_content_chars),
        };

        let raw = generator
            .generate(&request)
            .await
            .map_err(|e| FallbackReason::Service(format!("{e:#}")))?;

        parse_digest(&raw).map_err(FallbackReason::Invalid)
    }
}

// src/config/digest.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/digest.toml";
pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";

const ENV_OUTPUT_DIR: &str = "DIGEST_OUTPUT_DIR";
const ENV_MODEL: &str = "DIGEST_MODEL";
const ENV_MAX_CONTENT_CHARS: &str = "DIGEST_MAX_CONTENT_CHARS";
const ENV_TIMEOUT_SECS: &str = "DIGEST_TIMEOUT_SECS";
const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Runtime settings for the digest pipeline. Built once at startup and passed
/// by reference to whatever needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Root for cache, library and web output.
    pub output_dir: PathBuf,
    /// Chat model used for curation.
    pub model: String,
    /// Base URL of the chat-completions API.
    pub api_base: String,
    /// Generation credential. `"ENV"` means: read from OPENAI_API_KEY.
    /// Absent or empty means fallback mode.
    pub api_key: Option<String>,
    /// Per-item content cap in the generation payload.
    pub max_content_chars: usize,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Default Top-K for pre-ranking.
    pub top_k: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./data"),
            model: "gpt-4o-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            max_content_chars: 3000,
            timeout_secs: 60,
            connect_timeout_secs: 5,
            top_k: crate::analyze::DEFAULT_TOP_K,
        }
    }
}

impl DigestConfig {
    /// Parse a TOML file. Env overrides are not applied here.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let cfg: DigestConfig = toml::from_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// Resolve the config the way the binary does:
    /// 1) explicit path, else $DIGEST_CONFIG_PATH, else config/digest.toml if present
    /// 2) defaults when no file is found
    /// 3) env overrides on top
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var(ENV_CONFIG_PATH) {
                Ok(p) => {
                    let pb = PathBuf::from(p);
                    if !pb.exists() {
                        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                    }
                    Some(pb)
                }
                Err(_) => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()),
            },
        };

        let mut cfg = match &path {
            Some(p) => {
                info!(path = %p.display(), "loading digest config");
                Self::load_from_file(p)?
            }
            None => {
                debug!("no config file found, using defaults");
                Self::default()
            }
        };
        cfg.apply_env_with(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    /// Apply env-style overrides from `lookup`. Split out so tests can feed a map.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_MODEL) {
            self.model = v;
        }
        if let Some(v) = lookup(ENV_MAX_CONTENT_CHARS) {
            self.max_content_chars = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_CONTENT_CHARS} must be an integer"))?;
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be an integer"))?;
        }

        // Resolve api key: env wins, "ENV" placeholder reads env as well.
        let env_key = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty());
        let wants_env = self
            .api_key
            .as_deref()
            .is_some_and(|k| k.trim().eq_ignore_ascii_case("env"));
        if env_key.is_some() {
            self.api_key = env_key;
        } else if wants_env {
            self.api_key = None;
        }
        Ok(())
    }

    /// Credential if one is configured and non-empty.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.output_dir.join("cache")
    }

    pub fn library_dir(&self) -> PathBuf {
        self.output_dir.join("library")
    }

    pub fn web_dir(&self) -> PathBuf {
        self.output_dir.join("web")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

//! Generation service abstraction + OpenAI chat-completions provider.
//!
//! One request per digest. The provider returns the model's raw text; parsing
//! and validation happen in the curator so every failure ends up in one place.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::DigestConfig;

pub const TEMPERATURE: f32 = 0.25;
pub const MAX_OUTPUT_TOKENS: u32 = 8000;

/// What goes over the wire: fixed system instruction + user payload.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
}

/// Low-level provider: one remote call, no retries.
#[async_trait]
pub trait DigestGenerator: Send + Sync {
    /// Return the model's raw reply text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynGenerator = Arc<dyn DigestGenerator>;

/// Build the configured provider, or `None` when no credential is set.
pub fn build_generator(cfg: &DigestConfig) -> Result<Option<DynGenerator>> {
    match cfg.credential() {
        Some(key) => {
            let provider = OpenAiGenerator::new(cfg, key)?;
            Ok(Some(Arc::new(provider)))
        }
        None => Ok(None),
    }
}

/// OpenAI provider (Chat Completions API, JSON object response format).
pub struct OpenAiGenerator {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(cfg: &DigestConfig, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ai-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout())
            .build()
            .context("building http client")?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint: format!("{}/chat/completions", cfg.api_base.trim_end_matches('/')),
            model: cfg.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl DigestGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &request.system,
                },
                Msg {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::info!(model = %self.model, "calling generation service");
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("generation request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(300).collect();
            bail!("generation service returned {status}: {snippet}");
        }

        let body: Resp = resp.json().await.context("decoding completion envelope")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| anyhow!("completion had no content"))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

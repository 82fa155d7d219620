//! Clients for the hosted text-generation and embedding models.

pub mod complete;
pub mod embeddings;
pub mod prompts;

use std::future::Future;

use anyhow::Result;

use crate::config::LlmConfig;

/// The external model services the assistant depends on.
///
/// Implemented over HTTP by [`LlmClient`]; tests script it in-process.
pub trait LanguageModel {
    /// Send a prompt and return the generated text.
    fn generate(&self, prompt: &str, temperature: f32)
        -> impl Future<Output = Result<String>> + Send;

    /// Embed each text, returning one vector per input in input order.
    fn embed(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>>> + Send;
}

/// HTTP-backed [`LanguageModel`] for Ollama or OpenAI-compatible providers.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(http: reqwest::Client, config: LlmConfig) -> Self {
        Self { http, config }
    }
}

impl LanguageModel for LlmClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        complete::generate(&self.http, &self.config, prompt, temperature).await
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        embeddings::embed_batch(&self.http, &self.config, texts).await
    }
}

/// Turn a non-success HTTP status into an error carrying the response body.
pub(crate) async fn ensure_success(resp: reqwest::Response, api: &str) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    anyhow::bail!("{api} returned {status}: {body}");
}

/// Attach a bearer token when one is configured.
pub(crate) fn with_auth(req: reqwest::RequestBuilder, config: &LlmConfig) -> reqwest::RequestBuilder {
    match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => req.header("Authorization", format!("Bearer {key}")),
        _ => req,
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{ensure_success, with_auth};
use crate::config::LlmConfig;

/// Maximum characters sent per text to the embedding API. Chunks are far
/// below this; it bounds questions pasted in by users.
const MAX_EMBED_CHARS: usize = 3_000;

const OLLAMA_BATCH: usize = 32;
const OPENAI_BATCH: usize = 64;

/// Generate embeddings for a batch of texts using the configured provider.
pub async fn embed_batch(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let truncated: Vec<String> = texts
        .iter()
        .map(|t| crate::document::prefix_chars(t, MAX_EMBED_CHARS).to_string())
        .collect();

    let embeddings = match config.provider.as_str() {
        "ollama" => embed_ollama(client, config, &truncated).await?,
        "openai" => embed_openai(client, config, &truncated).await?,
        other => anyhow::bail!("Unknown LLM provider: {other}"),
    };

    if embeddings.len() != texts.len() {
        anyhow::bail!(
            "Embedding API returned {} vectors for {} inputs",
            embeddings.len(),
            texts.len()
        );
    }

    Ok(embeddings)
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

async fn embed_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/api/embed", config.base_url);
    let mut all_embeddings = Vec::with_capacity(texts.len());

    for batch in texts.chunks(OLLAMA_BATCH) {
        let req = OllamaEmbedRequest {
            model: &config.embedding_model,
            input: batch,
            truncate: true,
        };

        let resp = client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to call Ollama embed API")?;
        let resp = ensure_success(resp, "Ollama embed API").await?;

        let body: OllamaEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse Ollama embed response")?;
        all_embeddings.extend(body.embeddings);
    }

    Ok(all_embeddings)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

async fn embed_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/v1/embeddings", config.base_url);
    let mut all_embeddings = Vec::with_capacity(texts.len());

    for batch in texts.chunks(OPENAI_BATCH) {
        let req = OpenAiEmbedRequest {
            model: &config.embedding_model,
            input: batch,
        };

        let resp = with_auth(client.post(&url), config)
            .json(&req)
            .send()
            .await
            .context("Failed to call OpenAI embed API")?;
        let resp = ensure_success(resp, "OpenAI embed API").await?;

        let body: OpenAiEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse OpenAI embed response")?;
        all_embeddings.extend(in_input_order(body.data));
    }

    Ok(all_embeddings)
}

/// OpenAI tags each vector with the index of its input; order by it.
fn in_input_order(mut data: Vec<OpenAiEmbedData>) -> Vec<Vec<f32>> {
    data.sort_by_key(|d| d.index);
    data.into_iter().map(|d| d.embedding).collect()
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{ensure_success, with_auth};
use crate::config::LlmConfig;

/// Send a single-turn prompt to the configured provider and return the reply text.
pub async fn generate(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &str,
    temperature: f32,
) -> Result<String> {
    let reply = match config.provider.as_str() {
        "ollama" => call_ollama(client, config, prompt, temperature).await?,
        "openai" => call_openai(client, config, prompt, temperature).await?,
        other => anyhow::bail!("Unknown LLM provider: {other}"),
    };

    tracing::debug!("Model reply ({} chars): {reply}", reply.len());
    Ok(reply)
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

fn user_message(prompt: &str) -> Vec<Message> {
    vec![Message {
        role: "user".to_string(),
        content: prompt.to_string(),
    }]
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

async fn call_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &str,
    temperature: f32,
) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url);

    let req = OllamaChatRequest {
        model: config.chat_model.clone(),
        messages: user_message(prompt),
        stream: false,
        options: OllamaOptions { temperature },
    };

    let resp = client
        .post(&url)
        .json(&req)
        .send()
        .await
        .context("Failed to call Ollama chat API")?;
    let resp = ensure_success(resp, "Ollama chat API").await?;

    let body: OllamaChatResponse = resp
        .json()
        .await
        .context("Failed to parse Ollama chat response")?;
    Ok(body.message.content)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

async fn call_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &str,
    temperature: f32,
) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url);

    let req = OpenAiChatRequest {
        model: config.chat_model.clone(),
        messages: user_message(prompt),
        temperature,
    };

    let resp = with_auth(client.post(&url), config)
        .json(&req)
        .send()
        .await
        .context("Failed to call OpenAI chat API")?;
    let resp = ensure_success(resp, "OpenAI chat API").await?;

    let body: OpenAiChatResponse = resp
        .json()
        .await
        .context("Failed to parse OpenAI chat response")?;
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("OpenAI chat API returned no choices")
}

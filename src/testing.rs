//! Scripted in-process model for unit tests.

use std::collections::VecDeque;

use anyhow::Result;
use parking_lot::Mutex;

use crate::llm::LanguageModel;

/// Replies to `generate` from a script, in order, and embeds text with a
/// deterministic bag-of-words hash.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    fail_embeddings: bool,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
            fail_embeddings: false,
        }
    }

    /// Queue a failing model call.
    pub fn then_error(self, message: &str) -> Self {
        self.replies.lock().push_back(Err(message.to_string()));
        self
    }

    pub fn failing_embeddings(mut self) -> Self {
        self.fail_embeddings = true;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        match self.replies.lock().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("script exhausted")),
        }
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail_embeddings {
            anyhow::bail!("embedding service unavailable");
        }
        Ok(texts.iter().map(|t| bag_of_words(t)).collect())
    }
}

const DIMENSIONS: usize = 64;

/// Hash each lowercase word into one of 64 buckets.
pub fn bag_of_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; DIMENSIONS];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let hash = word
            .to_lowercase()
            .bytes()
            .fold(2166136261u32, |h, b| (h ^ u32::from(b)).wrapping_mul(16777619));
        vector[hash as usize % DIMENSIONS] += 1.0;
    }
    vector
}

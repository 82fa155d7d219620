use anyhow::{Context, Result};

use crate::document::prefix_chars;
use crate::llm::prompts::summary_prompt;
use crate::llm::LanguageModel;

/// Characters of the document sent for summarization, bounding request size.
pub const SUMMARY_CONTEXT_CHARS: usize = 4000;

/// Summarize the beginning of a document in 150 words or fewer.
pub async fn summarize<M: LanguageModel>(model: &M, text: &str) -> Result<String> {
    let prompt = summary_prompt(prefix_chars(text, SUMMARY_CONTEXT_CHARS));
    let summary = model
        .generate(&prompt, 0.0)
        .await
        .context("Failed to generate summary")?;
    Ok(summary.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;

    #[tokio::test]
    async fn test_summary_uses_document_prefix_only() {
        let text = format!("{}TAIL", "word ".repeat(SUMMARY_CONTEXT_CHARS));
        let model = ScriptedModel::new(["\nA short summary.\n"]);

        let summary = summarize(&model, &text).await.unwrap();

        assert_eq!(summary, "A short summary.");
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("150 words or fewer"));
        assert!(!prompt.contains("TAIL"));
    }

    #[tokio::test]
    async fn test_summary_error_has_context() {
        let model = ScriptedModel::new(Vec::<String>::new()).then_error("401 unauthorized");
        let err = summarize(&model, "text").await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to generate summary"));
    }
}

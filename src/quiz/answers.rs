//! Checking selected options and evaluating free-form answers.

use anyhow::{Context, Result};

use crate::document::prefix_chars;
use crate::llm::prompts::evaluation_prompt;
use crate::llm::LanguageModel;
use crate::models::{AnswerLetter, QuizAttempt, QuizQuestion};

/// Characters of the document shown to the evaluator.
const EVALUATION_CONTEXT_CHARS: usize = 4000;

/// Resolve a selection to a letter: an exact option text picks that option,
/// otherwise the first character is read as the letter (`"b"`, `"B) y"`).
pub fn selected_letter(question: &QuizQuestion, selected: &str) -> Option<AnswerLetter> {
    let selected = selected.trim();

    if let Some(i) = question
        .options
        .iter()
        .position(|option| option.trim().eq_ignore_ascii_case(selected))
    {
        return Some(AnswerLetter::ALL[i]);
    }

    selected.chars().next().and_then(AnswerLetter::from_char)
}

pub fn check_answer(question: &QuizQuestion, selected: &str) -> QuizAttempt {
    let selected = selected_letter(question, selected);
    QuizAttempt {
        selected,
        correct: selected == Some(question.answer),
        correct_answer: question.answer,
        explanation: question.explanation.clone(),
    }
}

/// Ask the model to judge a user's free-form answer to a reasoning question.
pub async fn evaluate_response<M: LanguageModel>(
    model: &M,
    document: &str,
    question: &str,
    response: &str,
) -> Result<String> {
    let prompt = evaluation_prompt(
        prefix_chars(document, EVALUATION_CONTEXT_CHARS),
        question,
        response,
    );
    let evaluation = model
        .generate(&prompt, 0.0)
        .await
        .context("Failed to evaluate response")?;
    Ok(evaluation.trim().to_string())
}

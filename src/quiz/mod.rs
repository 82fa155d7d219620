//! Multiple-choice quiz generation.
//!
//! The model is asked for a JSON array of questions. Its reply goes through
//! three stages, any of which can fail the attempt:
//!
//! 1. [`repair`] locates the array and, if needed, repairs common JSON
//!    malformations before parsing.
//! 2. [`validate`] checks each element's shape and normalizes the answer letter.
//! 3. The batch is accepted when at least two questions survive.
//!
//! Failed attempts are retried with the same prompt. When every attempt
//! fails, the fixed questions from [`fallback`] are served instead, so
//! callers always receive a usable quiz.

pub mod answers;
pub mod fallback;
pub mod repair;
pub mod validate;

use crate::document::prefix_chars;
use crate::llm::prompts::quiz_prompt;
use crate::llm::LanguageModel;
use crate::models::{QuizQuestion, QuizSource};

/// Characters of the document the quiz is grounded in.
pub const QUIZ_CONTEXT_CHARS: usize = 3000;
pub const MAX_ATTEMPTS: usize = 3;
pub const MIN_VALID_QUESTIONS: usize = 2;
const QUIZ_TEMPERATURE: f32 = 0.1;

/// Why a single generation attempt was discarded.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("model call failed: {0:#}")]
    Model(anyhow::Error),
    #[error("no JSON array found in response")]
    NoJsonArray,
    #[error("JSON parsing error: {0}")]
    Json(serde_json::Error),
    #[error("response JSON is not an array")]
    NotAnArray,
    #[error("only {valid} of {parsed} questions were valid, need at least {MIN_VALID_QUESTIONS}")]
    TooFewValid { valid: usize, parsed: usize },
}

/// A quiz ready to be served.
#[derive(Debug, Clone)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    pub source: QuizSource,
    /// Model calls made to produce this quiz
    pub attempts: usize,
}

/// Generate a quiz for `document`. Never fails: after [`MAX_ATTEMPTS`]
/// rejected attempts the fallback questions are returned.
pub async fn generate_quiz<M: LanguageModel>(model: &M, document: &str) -> Quiz {
    let context = prefix_chars(document, QUIZ_CONTEXT_CHARS);
    let prompt = quiz_prompt(context);

    for attempt in 1..=MAX_ATTEMPTS {
        tracing::info!("Quiz generation attempt {attempt}/{MAX_ATTEMPTS}");

        match run_attempt(model, &prompt).await {
            Ok(questions) => {
                tracing::info!("Generated {} valid quiz questions", questions.len());
                return Quiz {
                    questions,
                    source: QuizSource::Generated,
                    attempts: attempt,
                };
            }
            Err(e) => tracing::warn!("Quiz attempt {attempt} failed: {e}"),
        }
    }

    tracing::warn!("All {MAX_ATTEMPTS} quiz attempts failed, serving fallback questions");
    Quiz {
        questions: fallback::fallback_questions(context),
        source: QuizSource::Fallback,
        attempts: MAX_ATTEMPTS,
    }
}

async fn run_attempt<M: LanguageModel>(
    model: &M,
    prompt: &str,
) -> Result<Vec<QuizQuestion>, AttemptError> {
    let response = model
        .generate(prompt, QUIZ_TEMPERATURE)
        .await
        .map_err(AttemptError::Model)?;
    tracing::debug!("Raw quiz response: {response}");
    parse_quiz_response(&response)
}

/// Parse and validate one model reply into a batch of questions.
pub fn parse_quiz_response(response: &str) -> Result<Vec<QuizQuestion>, AttemptError> {
    let items = repair::parse_question_array(response)?;
    let parsed = items.len();
    let questions = validate::validate_batch(&items);

    if questions.len() < MIN_VALID_QUESTIONS {
        return Err(AttemptError::TooFewValid {
            valid: questions.len(),
            parsed,
        });
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerLetter;
    use crate::testing::ScriptedModel;

    fn question_json(n: usize, answer: &str) -> String {
        format!(
            r#"{{"question": "Question {n}?", "options": ["A) a", "B) b", "C) c", "D) d"], "answer": "{answer}", "explanation": "Explanation {n}."}}"#
        )
    }

    fn reply(answers: &[&str]) -> String {
        let items: Vec<String> = answers
            .iter()
            .enumerate()
            .map(|(i, a)| question_json(i + 1, a))
            .collect();
        format!("Here is the quiz:\n[{}]\n", items.join(",\n"))
    }

    #[test]
    fn test_parse_accepts_three_valid() {
        let questions = parse_quiz_response(&reply(&["A", "c", "D"])).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[1].answer, AnswerLetter::C);
    }

    #[test]
    fn test_parse_accepts_two_of_three() {
        let questions = parse_quiz_response(&reply(&["A", "X", "B"])).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question, "Question 3?");
    }

    #[test]
    fn test_parse_rejects_single_valid_question() {
        let err = parse_quiz_response(&reply(&["A", "X", "Y"])).unwrap_err();
        assert!(matches!(err, AttemptError::TooFewValid { valid: 1, parsed: 3 }));
    }

    #[test]
    fn test_parse_single_quoted_example_is_one_valid_question() {
        let response = "[{'question': 'Q?', 'options': ['A) x','B) y','C) z','D) w'], 'answer': 'b', 'explanation': 'e'}]";
        let items = repair::parse_question_array(response).unwrap();
        assert_eq!(items.len(), 1);
        let question = validate::into_question(&items[0]).unwrap();
        assert_eq!(question.answer, AnswerLetter::B);
        // One valid question is below the acceptance threshold
        assert!(matches!(
            parse_quiz_response(response),
            Err(AttemptError::TooFewValid { valid: 1, parsed: 1 })
        ));
    }

    #[test]
    fn test_parse_rejects_non_array_json() {
        let err = parse_quiz_response("no brackets at all").unwrap_err();
        assert!(matches!(err, AttemptError::NoJsonArray));
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let model = ScriptedModel::new([reply(&["A", "B", "C"])]);
        let quiz = generate_quiz(&model, "The Nile flows north.").await;
        assert_eq!(quiz.source, QuizSource::Generated);
        assert_eq!(quiz.attempts, 1);
        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_model_errors_count_as_failed_attempts() {
        let model = ScriptedModel::new(["I'd rather not.".to_string(), reply(&["A", "Q", "R"])])
            .then_error("rate limited");
        let quiz = generate_quiz(&model, "text").await;
        // attempt 1: no array, attempt 2: one valid, attempt 3: model error
        assert_eq!(quiz.source, QuizSource::Fallback);
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn test_success_on_third_attempt() {
        let model = ScriptedModel::new(["nope".to_string(), "[]".to_string(), reply(&["b", "c"])]);
        let quiz = generate_quiz(&model, "text").await;
        assert_eq!(quiz.source, QuizSource::Generated);
        assert_eq!(quiz.attempts, 3);
        assert_eq!(quiz.questions.len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_after_exhausting_attempts() {
        let model = ScriptedModel::new(["nope", "still nope", "[{\"question\": 1}]"]);
        let quiz = generate_quiz(&model, "Historical records from the 12th century.").await;

        assert_eq!(quiz.source, QuizSource::Fallback);
        assert_eq!(quiz.attempts, MAX_ATTEMPTS);
        assert_eq!(quiz.questions.len(), 3);
        assert!(quiz.questions[0].question.contains("historical document"));
        for question in &quiz.questions {
            let value = serde_json::to_value(question).unwrap();
            assert!(validate::validate_question_format(&value));
            assert!(validate::into_question(&value).is_ok());
        }
    }

    #[tokio::test]
    async fn test_prompt_is_identical_across_attempts_and_truncated() {
        let document = format!("{}UNSEEN", "a".repeat(QUIZ_CONTEXT_CHARS));
        let model = ScriptedModel::new(["x", "y", "z"]);
        generate_quiz(&model, &document).await;

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p == &prompts[0]));
        assert!(!prompts[0].contains("UNSEEN"));
    }
}

//! Schema validation of parsed quiz questions.

use serde_json::Value;

use crate::models::{AnswerLetter, QuizQuestion};

pub const REQUIRED_KEYS: [&str; 4] = ["question", "options", "answer", "explanation"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("failed validation")]
    Malformed,
    #[error("invalid answer format: {0}")]
    InvalidAnswer(String),
    #[error("field `{0}` is empty or not text")]
    EmptyField(&'static str),
}

/// Shape check: an object with all required keys, exactly four options and a
/// string answer.
pub fn validate_question_format(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };

    if !REQUIRED_KEYS.iter().all(|key| object.contains_key(*key)) {
        return false;
    }

    if !matches!(object.get("options"), Some(Value::Array(options)) if options.len() == 4) {
        return false;
    }

    object.get("answer").is_some_and(Value::is_string)
}

/// Reduce an answer to its letter. Accepts a bare letter in either case,
/// optionally written as `X)`, `(X)` or `X.`; anything longer is rejected.
pub fn normalize_answer(raw: &str) -> Option<AnswerLetter> {
    let upper = raw.trim().to_uppercase();
    let inner = upper
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .or_else(|| upper.strip_suffix(')'))
        .or_else(|| upper.strip_suffix('.'))
        .unwrap_or(upper.as_str());

    let mut chars = inner.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => AnswerLetter::from_char(c),
        _ => None,
    }
}

/// Validate one parsed element and convert it into a typed question.
pub fn into_question(value: &Value) -> Result<QuizQuestion, Rejection> {
    if !validate_question_format(value) {
        return Err(Rejection::Malformed);
    }

    let raw_answer = value["answer"].as_str().unwrap_or_default();
    let answer = normalize_answer(raw_answer)
        .ok_or_else(|| Rejection::InvalidAnswer(raw_answer.trim().to_uppercase()))?;

    let question = non_empty_text(&value["question"], "question")?;
    let explanation = non_empty_text(&value["explanation"], "explanation")?;

    let options = value["options"].as_array().ok_or(Rejection::Malformed)?;
    let options: Vec<String> = options
        .iter()
        .map(|option| non_empty_text(option, "options"))
        .collect::<Result<_, _>>()?;
    let options: [String; 4] = options.try_into().map_err(|_| Rejection::Malformed)?;

    Ok(QuizQuestion {
        question,
        options,
        answer,
        explanation,
    })
}

/// Keep the elements that validate, logging why the others were dropped.
pub fn validate_batch(items: &[Value]) -> Vec<QuizQuestion> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match into_question(item) {
            Ok(question) => {
                tracing::debug!("Question {} validated", i + 1);
                Some(question)
            }
            Err(rejection) => {
                tracing::warn!("Question {} {rejection}", i + 1);
                None
            }
        })
        .collect()
}

fn non_empty_text(value: &Value, field: &'static str) -> Result<String, Rejection> {
    match value.as_str().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(Rejection::EmptyField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "question": "What is the main claim?",
            "options": ["A) x", "B) y", "C) z", "D) w"],
            "answer": "B",
            "explanation": "Because y."
        })
    }

    #[test]
    fn test_format_accepts_well_formed_question() {
        assert!(validate_question_format(&valid()));
    }

    #[test]
    fn test_format_rejects_non_objects() {
        assert!(!validate_question_format(&json!("question")));
        assert!(!validate_question_format(&json!(["A", "B", "C", "D"])));
        assert!(!validate_question_format(&Value::Null));
    }

    #[test]
    fn test_format_rejects_missing_keys() {
        for key in REQUIRED_KEYS {
            let mut q = valid();
            q.as_object_mut().unwrap().remove(key);
            assert!(!validate_question_format(&q), "missing {key} should be rejected");
        }
    }

    #[test]
    fn test_format_requires_exactly_four_options() {
        let mut q = valid();
        q["options"] = json!(["A) x", "B) y", "C) z"]);
        assert!(!validate_question_format(&q));
        q["options"] = json!(["A) x", "B) y", "C) z", "D) w", "E) v"]);
        assert!(!validate_question_format(&q));
        q["options"] = json!("A) x B) y C) z D) w");
        assert!(!validate_question_format(&q));
    }

    #[test]
    fn test_format_requires_string_answer() {
        let mut q = valid();
        q["answer"] = json!(1);
        assert!(!validate_question_format(&q));
    }

    #[test]
    fn test_normalize_answer_variants() {
        assert_eq!(normalize_answer("a"), Some(AnswerLetter::A));
        assert_eq!(normalize_answer(" B "), Some(AnswerLetter::B));
        assert_eq!(normalize_answer("(c)"), Some(AnswerLetter::C));
        assert_eq!(normalize_answer("D)"), Some(AnswerLetter::D));
        assert_eq!(normalize_answer("a."), Some(AnswerLetter::A));
        assert_eq!(normalize_answer("E"), None);
        assert_eq!(normalize_answer("AB"), None);
        assert_eq!(normalize_answer("Because"), None);
        assert_eq!(normalize_answer(""), None);
    }

    #[test]
    fn test_normalize_answer_rejects_loose_forms() {
        assert_eq!(normalize_answer("B) Option 2"), None);
        assert_eq!(normalize_answer("A: because"), None);
        assert_eq!(normalize_answer("(C"), None);
        assert_eq!(normalize_answer("((C))"), None);
        assert_eq!(normalize_answer("()"), None);
    }

    #[test]
    fn test_lowercase_answer_accepted_like_uppercase() {
        let mut lower = valid();
        lower["answer"] = json!("b");
        assert_eq!(into_question(&lower), into_question(&valid()));
        assert_eq!(into_question(&lower).unwrap().answer, AnswerLetter::B);
    }

    #[test]
    fn test_into_question_rejects_invalid_letter() {
        let mut q = valid();
        q["answer"] = json!("e");
        assert_eq!(into_question(&q), Err(Rejection::InvalidAnswer("E".into())));
    }

    #[test]
    fn test_into_question_rejects_empty_fields() {
        let mut q = valid();
        q["explanation"] = json!("  ");
        assert_eq!(into_question(&q), Err(Rejection::EmptyField("explanation")));

        let mut q = valid();
        q["options"] = json!(["A) x", "", "C) z", "D) w"]);
        assert_eq!(into_question(&q), Err(Rejection::EmptyField("options")));
    }

    #[test]
    fn test_validate_batch_keeps_only_valid() {
        let mut bad = valid();
        bad["answer"] = json!("Z");
        let batch = vec![valid(), bad, json!(42)];
        assert_eq!(validate_batch(&batch).len(), 1);
    }
}

//! Prompt templates. Every piece of user- or document-supplied text is passed
//! through [`sanitize_for_prompt`] before it is spliced in.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::ChatMessage;

/// Separates the answer from the restated supporting quotes.
pub const QUOTES_MARKER: &str = "SUPPORTING QUOTES:";

static SPECIAL_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\|[A-Za-z0-9_]+\|>").expect("valid special-token regex"));

/// Remove chat-template control tokens (`<|im_start|>`, `<|eot_id|>`, ...)
/// that could let document text impersonate another role.
pub fn sanitize_for_prompt(text: &str) -> String {
    SPECIAL_TOKEN_RE.replace_all(text, "").into_owned()
}

pub fn summary_prompt(content: &str) -> String {
    format!(
        "You are an AI assistant. Summarize the following document in 150 words or fewer:\n\n{}\n",
        sanitize_for_prompt(content)
    )
}

/// Retrieval-augmented answer prompt. `passages` are in retrieval order;
/// `history` is prepended as a transcript when non-empty.
pub fn answer_prompt(
    passages: &[&str],
    history: &[ChatMessage],
    question: &str,
    include_quotes: bool,
) -> String {
    let mut prompt = String::from(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n",
    );

    if !history.is_empty() {
        prompt.push_str("Conversation so far:\n");
        for turn in history {
            let speaker = if turn.role == "assistant" { "Assistant" } else { "User" };
            writeln!(prompt, "{speaker}: {}", sanitize_for_prompt(&turn.content)).unwrap();
        }
        prompt.push('\n');
    }

    prompt.push_str("Context:\n");
    for passage in passages {
        writeln!(prompt, "{}\n", sanitize_for_prompt(passage)).unwrap();
    }

    writeln!(prompt, "Question: {}", sanitize_for_prompt(question)).unwrap();

    if include_quotes {
        write!(
            prompt,
            "\nAfter your answer, write a line containing exactly \"{QUOTES_MARKER}\" and then list, \
             one per line and wrapped in double quotes, the sentences from the context that support \
             your answer, copied verbatim.\n"
        )
        .unwrap();
    }

    prompt.push_str("Helpful Answer:");
    prompt
}

pub fn quiz_prompt(context: &str) -> String {
    format!(
        r#"Based on the following document content, generate exactly 3 multiple choice questions that test logical reasoning and comprehension. Each question should be directly related to the content provided.

Document Content:
{}

Please generate questions in the following EXACT JSON format:
[
  {{
    "question": "Your question here?",
    "options": [
      "A) Option 1",
      "B) Option 2",
      "C) Option 3",
      "D) Option 4"
    ],
    "answer": "A",
    "explanation": "Brief explanation of why this is correct."
  }}
]

Requirements:
1. Questions must be based on the actual document content
2. Test comprehension, analysis, or logical reasoning
3. Include exactly 4 options (A, B, C, D)
4. Answer should be just the letter (A, B, C, or D)
5. Provide a clear explanation
6. Return ONLY the JSON array, no other text

JSON Response:
"#,
        sanitize_for_prompt(context)
    )
}

pub fn evaluation_prompt(document: &str, question: &str, response: &str) -> String {
    format!(
        "You are evaluating a user's answer to a reasoning question from a document.\n\n\
         Document: {}\n\
         Question: {}\n\
         User's Answer: {}\n\n\
         Evaluate the correctness of the user's answer, then briefly explain why it is right or wrong.\n",
        sanitize_for_prompt(document),
        sanitize_for_prompt(question),
        sanitize_for_prompt(response)
    )
}

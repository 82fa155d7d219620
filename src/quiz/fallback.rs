//! Fixed questions served when generation keeps failing.

use crate::models::{AnswerLetter, QuizQuestion};

/// Coarse document classification used to tailor the first fallback question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Historical,
    Scientific,
    Technical,
}

impl DocumentType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Historical => "historical document",
            Self::Scientific => "scientific document",
            Self::Technical => "technical document",
        }
    }
}

const HISTORY_KEYWORDS: [&str; 4] = ["history", "historical", "century", "year"];
const SCIENCE_KEYWORDS: [&str; 4] = ["science", "research", "study", "experiment"];

/// Substring keyword search, history first, then science; anything else is technical.
pub fn classify(content: &str) -> DocumentType {
    let lower = content.to_lowercase();
    if HISTORY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        DocumentType::Historical
    } else if SCIENCE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        DocumentType::Scientific
    } else {
        DocumentType::Technical
    }
}

fn question(text: String, options: [&str; 4], answer: AnswerLetter, explanation: &str) -> QuizQuestion {
    QuizQuestion {
        question: text,
        options: options.map(str::to_string),
        answer,
        explanation: explanation.to_string(),
    }
}

/// The three generic comprehension questions. Deterministic for a given input.
pub fn fallback_questions(content: &str) -> Vec<QuizQuestion> {
    let doc_type = classify(content);

    vec![
        question(
            format!("What is the primary focus of this {}?", doc_type.label()),
            [
                "A) Providing step-by-step instructions",
                "B) Explaining concepts and information",
                "C) Telling a story",
                "D) Listing facts without context",
            ],
            AnswerLetter::B,
            "Documents typically aim to explain concepts and provide information to help readers understand the subject matter.",
        ),
        question(
            "What reading strategy would be most effective for this content?".to_string(),
            [
                "A) Skimming quickly for keywords",
                "B) Reading only the conclusion",
                "C) Careful analysis and comprehension",
                "D) Memorizing without understanding",
            ],
            AnswerLetter::C,
            "Effective reading requires careful analysis and comprehension to fully understand the material.",
        ),
        question(
            "How should complex information in documents be approached?".to_string(),
            [
                "A) Ignore difficult sections",
                "B) Break down into smaller parts for analysis",
                "C) Accept without questioning",
                "D) Focus only on familiar terms",
            ],
            AnswerLetter::B,
            "Breaking complex information into smaller, manageable parts allows for better understanding and analysis.",
        ),
    ]
}

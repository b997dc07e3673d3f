// src/models/question.rs

use serde::{Deserialize, Serialize};

/// A multiple-choice question. Identified only by its position in the test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    /// The prompt shown to the student.
    #[serde(default)]
    pub question: String,

    /// List of options (e.g., ["42", "32"]).
    #[serde(default)]
    pub options: Vec<String>,

    /// Zero-based index into `options`.
    #[serde(default)]
    pub correct: usize,
}

impl Question {
    pub fn new(question: &str, options: &[&str], correct: usize) -> Self {
        Self {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct,
        }
    }
}

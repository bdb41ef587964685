//! Static quiz content: the ordered questions and the candidate result tags.
//!
//! Options carry no weight. Nothing downstream reads which option was picked,
//! so the data model has no place to store one.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

const BUILTIN_QUIZ: &str = include_str!("../data/default_quiz.toml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn option(&self, id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// Questions plus result tags, loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizData {
    #[serde(default)]
    pub title: String,
    pub questions: Vec<Question>,
    pub tags: Vec<String>,
}

impl QuizData {
    /// The quiz bundled with the library.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled file itself is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_QUIZ)
    }

    /// Parse and validate quiz data from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let data: QuizData = toml::from_str(content)?;
        data.validate()?;
        Ok(data)
    }

    /// Read, parse and validate a quiz file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check the invariants a session relies on.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an empty question list, a question
    /// without options, duplicate option ids within a question, or an empty
    /// or blank tag list.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions.is_empty() {
            return Err(ValidationError::EmptyCollection("questions".into()));
        }
        for question in &self.questions {
            if question.options.is_empty() {
                return Err(ValidationError::EmptyCollection(format!(
                    "options of question {}",
                    question.id
                )));
            }
            let mut seen = HashSet::new();
            for option in &question.options {
                if !seen.insert(option.id.as_str()) {
                    return Err(ValidationError::DuplicateId {
                        collection: format!("options of question {}", question.id),
                        id: option.id.clone(),
                    });
                }
            }
        }
        if self.tags.is_empty() {
            return Err(ValidationError::EmptyCollection("tags".into()));
        }
        if let Some(index) = self.tags.iter().position(|t| t.trim().is_empty()) {
            return Err(ValidationError::InvalidValue {
                field: format!("tags[{index}]"),
                message: "tag must not be blank".into(),
            });
        }
        Ok(())
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Index of the final question. Validated data always has at least one.
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelLabError;

/// NLP task catalog offered by the task picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    TextClassification,
    TextGeneration,
    QuestionAnswering,
    Summarization,
    Translation,
    TokenClassification,
}

impl Task {
    /// Identifier sent to the backend.
    pub fn id(&self) -> &'static str {
        match self {
            Task::TextClassification => "text-classification",
            Task::TextGeneration => "text-generation",
            Task::QuestionAnswering => "question-answering",
            Task::Summarization => "summarization",
            Task::Translation => "translation",
            Task::TokenClassification => "token-classification",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Task::TextClassification => "Text Classification (e.g., Sentiment)",
            Task::TextGeneration => "Text Generation",
            Task::QuestionAnswering => "Question Answering",
            Task::Summarization => "Summarization",
            Task::Translation => "Translation",
            Task::TokenClassification => "Token Classification (e.g., NER)",
        }
    }

    pub fn is_qa(&self) -> bool {
        matches!(self, Task::QuestionAnswering)
    }

    pub fn is_generation(&self) -> bool {
        matches!(self, Task::TextGeneration)
    }

    pub fn all() -> &'static [Task] {
        &[
            Task::TextClassification,
            Task::TextGeneration,
            Task::QuestionAnswering,
            Task::Summarization,
            Task::Translation,
            Task::TokenClassification,
        ]
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Task {
    type Err = ModelLabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Task::all()
            .iter()
            .copied()
            .find(|t| t.id() == s)
            .ok_or_else(|| ModelLabError::Config(format!("unknown task: {s}")))
    }
}

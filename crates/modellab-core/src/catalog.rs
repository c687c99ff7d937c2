//! Model catalog - static model suggestions per task and the picker selection

use crate::Task;
use serde::{Deserialize, Serialize};

/// Sentinel choice that switches the picker to a free-text model name.
pub const CUSTOM_MODEL: &str = "custom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelSuggestion {
    pub id: &'static str,
    pub display_name: &'static str,
}

const TEXT_CLASSIFICATION: &[ModelSuggestion] = &[
    ModelSuggestion {
        id: "distilbert-base-uncased-finetuned-sst-2-english",
        display_name: "DistilBERT SST-2 (Sentiment)",
    },
    ModelSuggestion {
        id: "bert-base-uncased",
        display_name: "BERT Base (Fine-tune for classification)",
    },
];

const TEXT_GENERATION: &[ModelSuggestion] = &[
    ModelSuggestion {
        id: "gpt2",
        display_name: "GPT-2",
    },
    ModelSuggestion {
        id: "distilgpt2",
        display_name: "DistilGPT-2 (Smaller)",
    },
];

const QUESTION_ANSWERING: &[ModelSuggestion] = &[ModelSuggestion {
    id: "distilbert-base-cased-distilled-squad",
    display_name: "DistilBERT SQuAD",
}];

/// Suggested models for a task. Tasks without suggestions only accept custom names.
pub fn catalog(task: Task) -> &'static [ModelSuggestion] {
    match task {
        Task::TextClassification => TEXT_CLASSIFICATION,
        Task::TextGeneration => TEXT_GENERATION,
        Task::QuestionAnswering => QUESTION_ANSWERING,
        Task::Summarization | Task::Translation | Task::TokenClassification => &[],
    }
}

pub fn find_suggestion(task: Task, id: &str) -> Option<&'static ModelSuggestion> {
    catalog(task).iter().find(|m| m.id == id)
}

/// What the model picker currently points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSelection {
    #[default]
    None,
    Catalog(String),
    Custom,
}

impl ModelSelection {
    /// Interpret a raw picker value: empty, the `custom` sentinel, or a catalog ID.
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "" => ModelSelection::None,
            CUSTOM_MODEL => ModelSelection::Custom,
            id => ModelSelection::Catalog(id.to_string()),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ModelSelection::Custom)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ModelSelection::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_per_task() {
        assert_eq!(catalog(Task::TextGeneration).len(), 2);
        assert_eq!(catalog(Task::QuestionAnswering)[0].id, "distilbert-base-cased-distilled-squad");
        assert!(catalog(Task::Translation).is_empty());
    }

    #[test]
    fn test_find_suggestion_is_scoped_to_task() {
        assert!(find_suggestion(Task::TextGeneration, "gpt2").is_some());
        assert!(find_suggestion(Task::TextClassification, "gpt2").is_none());
    }

    #[test]
    fn test_from_choice() {
        assert_eq!(ModelSelection::from_choice(""), ModelSelection::None);
        assert_eq!(ModelSelection::from_choice("custom"), ModelSelection::Custom);
        assert_eq!(
            ModelSelection::from_choice("gpt2"),
            ModelSelection::Catalog("gpt2".to_string())
        );
    }
}

//! Session form state and the reducer that drives it

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RequestOutcome;
use crate::config::DefaultsConfig;
use crate::params::{AnomalyParams, FineTuneParams, InferenceParams, Quantization};
use crate::{payload, ModelSelection, OperationMode, Task};

/// Everything the form holds for one session. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub operation_mode: OperationMode,
    pub task: Option<Task>,
    pub model_selection: ModelSelection,
    /// Only meaningful while `model_selection` is `Custom`.
    pub custom_model_name: String,
    pub inference: InferenceParams,
    pub finetune: FineTuneParams,
    pub anomaly: AnomalyParams,
    #[serde(skip)]
    pub outcome: RequestOutcome,
}

/// A discrete user or transport event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetMode(OperationMode),
    SetTask(Option<Task>),
    SelectModel(ModelSelection),
    SetCustomModelName(String),
    Edit(FieldEdit),
    RequestStarted,
    RequestSucceeded(Value),
    RequestFailed(String),
}

impl Action {
    /// Request lifecycle events, as opposed to form edits.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Action::RequestStarted | Action::RequestSucceeded(_) | Action::RequestFailed(_)
        )
    }
}

/// Edit of a single mode-specific field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    // inference
    InputText(String),
    ContextText(String),
    GenerationArg(String, i64),
    Quantization(Quantization),
    // fine-tune
    DatasetPath(String),
    TextColumn(String),
    LabelColumn(String),
    ContextColumn(String),
    Epochs(u32),
    BatchSize(u32),
    LearningRate(String),
    UseLora(bool),
    LoraRank(u32),
    LoraAlpha(u32),
    LoraDropout(f64),
    LoraTargetModules(String),
    MaxSeqLength(u32),
    NumLabels(String),
    // anomaly
    AnomalyText(String),
    EmbeddingModelName(String),
    AutoencoderModelPath(String),
    EmbeddingDim(String),
    EncodingDim(String),
    Threshold(String),
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the form from configured defaults.
    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        let mut state = Self {
            operation_mode: defaults.operation_mode,
            task: defaults.task,
            ..Self::default()
        };
        state.inference.quantization = defaults.quantization;
        state
    }

    /// Resolved model identifier. Derived on every call so it never drifts
    /// from the picker.
    pub fn effective_model_name(&self) -> &str {
        match &self.model_selection {
            ModelSelection::None => "",
            ModelSelection::Catalog(id) => id.as_str(),
            ModelSelection::Custom => self.custom_model_name.trim(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.outcome.is_loading()
    }

    /// Whether the submit control for the current mode is enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && payload::build(self).is_ok()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetMode(mode) => {
                self.operation_mode = mode;
                self.clear_model();
                self.outcome.clear_settled();
            }
            Action::SetTask(task) => {
                self.task = task;
                self.clear_model();
                self.inference.clear_text();
                self.outcome.clear_settled();
            }
            Action::SelectModel(selection) => {
                if !selection.is_custom() {
                    self.custom_model_name.clear();
                }
                self.model_selection = selection;
            }
            Action::SetCustomModelName(name) => self.custom_model_name = name,
            Action::Edit(edit) => self.apply_edit(edit),
            Action::RequestStarted => self.outcome = RequestOutcome::Loading,
            Action::RequestSucceeded(body) => self.outcome = RequestOutcome::Success(body),
            Action::RequestFailed(message) => self.outcome = RequestOutcome::Failure(message),
        }
    }

    fn clear_model(&mut self) {
        self.model_selection = ModelSelection::None;
        self.custom_model_name.clear();
    }

    fn apply_edit(&mut self, edit: FieldEdit) {
        let ft = &mut self.finetune;
        let an = &mut self.anomaly;
        match edit {
            FieldEdit::InputText(v) => self.inference.input_text = v,
            FieldEdit::ContextText(v) => self.inference.context_text = v,
            FieldEdit::GenerationArg(k, v) => {
                self.inference.generation_args.insert(k, v);
            }
            FieldEdit::Quantization(q) => self.inference.quantization = q,
            FieldEdit::DatasetPath(v) => ft.dataset_path = v,
            FieldEdit::TextColumn(v) => ft.text_column = v,
            FieldEdit::LabelColumn(v) => ft.label_column = v,
            FieldEdit::ContextColumn(v) => ft.context_column = v,
            FieldEdit::Epochs(v) => ft.epochs = v,
            FieldEdit::BatchSize(v) => ft.batch_size = v,
            FieldEdit::LearningRate(v) => ft.learning_rate = v,
            FieldEdit::UseLora(v) => ft.use_lora = v,
            FieldEdit::LoraRank(v) => ft.lora_config.r = v,
            FieldEdit::LoraAlpha(v) => ft.lora_config.alpha = v,
            FieldEdit::LoraDropout(v) => ft.lora_config.dropout = v,
            FieldEdit::LoraTargetModules(v) => ft.lora_config.target_modules = v,
            FieldEdit::MaxSeqLength(v) => ft.max_seq_length = v,
            FieldEdit::NumLabels(v) => ft.num_labels = v,
            FieldEdit::AnomalyText(v) => an.text = v,
            FieldEdit::EmbeddingModelName(v) => an.embedding_model_name = v,
            FieldEdit::AutoencoderModelPath(v) => an.autoencoder_model_path = v,
            FieldEdit::EmbeddingDim(v) => an.embedding_dim = v,
            FieldEdit::EncodingDim(v) => an.encoding_dim = v,
            FieldEdit::Threshold(v) => an.threshold = v,
        }
    }
}

/// Pure reducer: the next state after `action`, leaving `state` untouched.
pub fn reduce(state: &FormState, action: Action) -> FormState {
    let mut next = state.clone();
    next.apply(action);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_model(task: Task, model: &str) -> FormState {
        let mut state = FormState::new();
        state.apply(Action::SetTask(Some(task)));
        state.apply(Action::SelectModel(ModelSelection::from_choice(model)));
        state
    }

    #[test]
    fn test_custom_model_name_is_trimmed() {
        let mut state = with_model(Task::TextGeneration, "custom");
        state.apply(Action::SetCustomModelName("  openai-community/gpt2 ".to_string()));
        assert_eq!(state.effective_model_name(), "openai-community/gpt2");
    }

    #[test]
    fn test_catalog_pick_clears_custom_name() {
        let mut state = with_model(Task::TextGeneration, "custom");
        state.apply(Action::SetCustomModelName("my/model".to_string()));
        state.apply(Action::SelectModel(ModelSelection::from_choice("gpt2")));

        assert!(state.custom_model_name.is_empty());
        assert_eq!(state.effective_model_name(), "gpt2");
    }

    #[test]
    fn test_reselecting_custom_keeps_typed_name() {
        let mut state = with_model(Task::TextGeneration, "custom");
        state.apply(Action::SetCustomModelName("my/model".to_string()));
        state.apply(Action::SelectModel(ModelSelection::Custom));
        assert_eq!(state.effective_model_name(), "my/model");
    }

    #[test]
    fn test_task_switch_clears_model_and_text() {
        let mut state =
            with_model(Task::QuestionAnswering, "distilbert-base-cased-distilled-squad");
        state.apply(Action::Edit(FieldEdit::InputText("who?".to_string())));
        state.apply(Action::Edit(FieldEdit::ContextText("someone".to_string())));
        state.apply(Action::RequestFailed("old".to_string()));

        state.apply(Action::SetTask(Some(Task::Summarization)));

        assert_eq!(state.model_selection, ModelSelection::None);
        assert_eq!(state.effective_model_name(), "");
        assert!(state.inference.input_text.is_empty());
        assert!(state.inference.context_text.is_empty());
        assert_eq!(state.outcome, RequestOutcome::Idle);
    }

    #[test]
    fn test_mode_switch_clears_model_and_outcome() {
        let mut state = with_model(Task::TextGeneration, "custom");
        state.apply(Action::SetCustomModelName("x".to_string()));
        state.apply(Action::RequestSucceeded(json!({"ok": true})));

        state.apply(Action::SetMode(OperationMode::Finetune));

        assert_eq!(state.operation_mode, OperationMode::Finetune);
        assert_eq!(state.task, Some(Task::TextGeneration));
        assert!(state.model_selection.is_none());
        assert!(state.custom_model_name.is_empty());
        assert_eq!(state.outcome, RequestOutcome::Idle);
    }

    #[test]
    fn test_mode_switch_while_loading_keeps_loading() {
        let mut state = FormState::new();
        state.apply(Action::RequestStarted);
        state.apply(Action::SetMode(OperationMode::Anomaly));
        assert!(state.is_loading());
    }

    #[test]
    fn test_request_started_replaces_previous_result() {
        let mut state = FormState::new();
        state.apply(Action::RequestSucceeded(json!([1, 2])));
        state.apply(Action::RequestStarted);
        assert_eq!(state.outcome, RequestOutcome::Loading);
        assert!(state.outcome.result().is_none());
    }

    #[test]
    fn test_reduce_is_pure() {
        let state = FormState::new();
        let next = reduce(&state, Action::SetTask(Some(Task::Translation)));
        assert_eq!(state.task, None);
        assert_eq!(next.task, Some(Task::Translation));
    }

    #[test]
    fn test_can_submit_requires_task_and_model() {
        let mut state = FormState::new();
        state.apply(Action::Edit(FieldEdit::InputText("hello".to_string())));
        assert!(!state.can_submit());

        state.apply(Action::SetTask(Some(Task::TextClassification)));
        state.apply(Action::SelectModel(ModelSelection::from_choice("bert-base-uncased")));
        state.apply(Action::Edit(FieldEdit::InputText("hello".to_string())));
        assert!(state.can_submit());

        state.apply(Action::RequestStarted);
        assert!(!state.can_submit());
    }

    #[test]
    fn test_edits_reach_nested_lora_config() {
        let mut state = FormState::new();
        state.apply(Action::Edit(FieldEdit::LoraRank(16)));
        state.apply(Action::Edit(FieldEdit::LoraTargetModules("q_proj".to_string())));
        assert_eq!(state.finetune.lora_config.r, 16);
        assert_eq!(state.finetune.lora_config.target_modules, "q_proj");
    }

    #[test]
    fn test_lifecycle_actions_are_distinguished() {
        assert!(Action::RequestStarted.is_lifecycle());
        assert!(Action::RequestFailed("x".to_string()).is_lifecycle());
        assert!(!Action::SetMode(OperationMode::Anomaly).is_lifecycle());
        assert!(!Action::Edit(FieldEdit::Epochs(2)).is_lifecycle());
    }
}

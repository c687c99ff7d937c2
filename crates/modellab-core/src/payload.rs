//! Request bodies built from the form, one builder per action.
//!
//! Builders are pure: they read a [`FormState`] and either return the exact body
//! to POST or the first [`ValidationError`] found. Field names are snake_case
//! throughout; that is the backend contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::params::{LoraConfig, Quantization};
use crate::{FormState, OperationMode, Result, Task, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferencePayload {
    pub task: Task,
    pub model_name: String,
    pub input_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub quantization: Quantization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_args: Option<BTreeMap<String, i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTunePayload {
    pub task: Task,
    pub model_name: String,
    pub fine_tune_params: FineTuneRequestParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTuneRequestParams {
    pub dataset_path: String,
    pub text_column: String,
    pub label_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_column: Option<String>,
    pub epochs: u32,
    pub batch_size: u32,
    pub learning_rate: f64,
    pub use_lora: bool,
    /// `null` unless LoRA is enabled.
    pub lora_config: Option<LoraConfig>,
    pub max_seq_length: u32,
    pub num_labels: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPayload {
    pub text: String,
    pub embedding_model_name: String,
    pub autoencoder_model_path: String,
    pub autoencoder_embedding_dim: u32,
    pub autoencoder_encoding_dim: u32,
    pub threshold: f64,
}

/// A validated request body tagged with the action it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Inference(InferencePayload),
    FineTune(FineTunePayload),
    Anomaly(AnomalyPayload),
}

impl Payload {
    pub fn mode(&self) -> OperationMode {
        match self {
            Payload::Inference(_) => OperationMode::Inference,
            Payload::FineTune(_) => OperationMode::Finetune,
            Payload::Anomaly(_) => OperationMode::Anomaly,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.mode().endpoint()
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Build the body for whichever mode the form is in.
pub fn build(state: &FormState) -> std::result::Result<Payload, ValidationError> {
    match state.operation_mode {
        OperationMode::Inference => build_inference(state).map(Payload::Inference),
        OperationMode::Finetune => build_finetune(state).map(Payload::FineTune),
        OperationMode::Anomaly => build_anomaly(state).map(Payload::Anomaly),
    }
}

pub fn build_inference(
    state: &FormState,
) -> std::result::Result<InferencePayload, ValidationError> {
    let (task, model_name) = require_task_and_model(state)?;
    let params = &state.inference;

    if is_blank(&params.input_text) {
        return Err(ValidationError::EmptyInputText);
    }
    if task.is_qa() && is_blank(&params.context_text) {
        return Err(ValidationError::EmptyContext);
    }

    Ok(InferencePayload {
        task,
        model_name,
        input_text: params.input_text.clone(),
        context: task.is_qa().then(|| params.context_text.clone()),
        quantization: params.quantization,
        generation_args: task.is_generation().then(|| params.generation_args.clone()),
    })
}

pub fn build_finetune(state: &FormState) -> std::result::Result<FineTunePayload, ValidationError> {
    let (task, model_name) = require_task_and_model(state)?;
    let params = &state.finetune;

    if is_blank(&params.dataset_path) {
        return Err(ValidationError::EmptyDatasetPath);
    }
    if params.epochs == 0 {
        return Err(ValidationError::InvalidEpochs);
    }
    if params.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize);
    }
    let learning_rate =
        parse_float(&params.learning_rate).ok_or(ValidationError::InvalidLearningRate)?;
    let num_labels = match params.num_labels.trim() {
        "" => None,
        raw => Some(
            raw.parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ValidationError::InvalidNumLabels)?,
        ),
    };

    Ok(FineTunePayload {
        task,
        model_name,
        fine_tune_params: FineTuneRequestParams {
            dataset_path: params.dataset_path.clone(),
            text_column: params.text_column.clone(),
            label_column: params.label_column.clone(),
            context_column: task.is_qa().then(|| params.context_column.clone()),
            epochs: params.epochs,
            batch_size: params.batch_size,
            learning_rate,
            use_lora: params.use_lora,
            lora_config: params.use_lora.then(|| params.lora_config.clone()),
            max_seq_length: params.max_seq_length,
            num_labels,
        },
    })
}

pub fn build_anomaly(state: &FormState) -> std::result::Result<AnomalyPayload, ValidationError> {
    let params = &state.anomaly;

    if is_blank(&params.text) {
        return Err(ValidationError::EmptyAnomalyText);
    }
    if is_blank(&params.autoencoder_model_path) {
        return Err(ValidationError::EmptyAutoencoderPath);
    }

    if is_negative_int(&params.embedding_dim) || is_negative_int(&params.encoding_dim) {
        return Err(ValidationError::NegativeAnomalyDimension);
    }

    let (Some(embedding_dim), Some(encoding_dim), Some(threshold)) = (
        parse_int(&params.embedding_dim),
        parse_int(&params.encoding_dim),
        parse_float(&params.threshold),
    ) else {
        return Err(ValidationError::InvalidAnomalyNumbers);
    };

    Ok(AnomalyPayload {
        text: params.text.clone(),
        embedding_model_name: params.embedding_model_name.clone(),
        autoencoder_model_path: params.autoencoder_model_path.clone(),
        autoencoder_embedding_dim: embedding_dim,
        autoencoder_encoding_dim: encoding_dim,
        threshold,
    })
}

fn require_task_and_model(
    state: &FormState,
) -> std::result::Result<(Task, String), ValidationError> {
    let model = state.effective_model_name();
    match state.task {
        Some(task) if !model.is_empty() => Ok((task, model.to_string())),
        _ => Err(ValidationError::MissingTaskOrModel),
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn parse_int(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

fn is_negative_int(s: &str) -> bool {
    s.trim().parse::<i64>().is_ok_and(|v| v < 0)
}

fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

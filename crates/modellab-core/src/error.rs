use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelLabError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Http(String),

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelLabError>;

/// Client-side rejection of a form before anything is sent.
///
/// The messages are shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a task and model for inference/fine-tuning.")]
    MissingTaskOrModel,

    #[error("Input text (question for QA) cannot be empty for inference.")]
    EmptyInputText,

    #[error("Context text cannot be empty for Question Answering.")]
    EmptyContext,

    #[error("Dataset path cannot be empty for fine-tuning.")]
    EmptyDatasetPath,

    #[error("Epochs must be a positive integer.")]
    InvalidEpochs,

    #[error("Batch size must be a positive integer.")]
    InvalidBatchSize,

    #[error("Learning rate must be a valid number.")]
    InvalidLearningRate,

    #[error("Number of labels must be a positive integer if specified.")]
    InvalidNumLabels,

    #[error("Text for anomaly detection cannot be empty.")]
    EmptyAnomalyText,

    #[error("Autoencoder model path cannot be empty.")]
    EmptyAutoencoderPath,

    #[error("Autoencoder dimensions and threshold must be valid numbers.")]
    InvalidAnomalyNumbers,

    #[error("Autoencoder dimensions must be non-negative integers.")]
    NegativeAnomalyDimension,
}

impl ValidationError {
    /// Name of the form field the failure points at.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingTaskOrModel => "model_name",
            ValidationError::EmptyInputText => "input_text",
            ValidationError::EmptyContext => "context",
            ValidationError::EmptyDatasetPath => "dataset_path",
            ValidationError::InvalidEpochs => "epochs",
            ValidationError::InvalidBatchSize => "batch_size",
            ValidationError::InvalidLearningRate => "learning_rate",
            ValidationError::InvalidNumLabels => "num_labels",
            ValidationError::EmptyAnomalyText => "text",
            ValidationError::EmptyAutoencoderPath => "autoencoder_model_path",
            ValidationError::InvalidAnomalyNumbers => "threshold",
            ValidationError::NegativeAnomalyDimension => "autoencoder_embedding_dim",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passes_through() {
        let err: ModelLabError = ValidationError::InvalidLearningRate.into();
        assert_eq!(err.to_string(), "Learning rate must be a valid number.");
    }

    #[test]
    fn test_backend_error_displays_message_only() {
        let err = ModelLabError::Backend {
            status: 404,
            message: "model not found".to_string(),
        };
        assert_eq!(err.to_string(), "model not found");
    }
}

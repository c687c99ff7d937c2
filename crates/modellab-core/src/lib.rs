// Domain modules
pub mod catalog;
pub mod config;
pub mod error;
pub mod operation_mode;
pub mod params;
pub mod payload;
pub mod state;
pub mod task;

pub use catalog::{catalog, find_suggestion, ModelSelection, ModelSuggestion, CUSTOM_MODEL};
pub use config::{BackendConfig, DefaultsConfig, ModelLabConfig, BACKEND_URL_ENV};
pub use error::{ModelLabError, Result, ValidationError};
pub use operation_mode::OperationMode;
pub use params::{AnomalyParams, FineTuneParams, InferenceParams, LoraConfig, Quantization};
pub use payload::{
    AnomalyPayload, FineTunePayload, FineTuneRequestParams, InferencePayload, Payload,
};
pub use state::{reduce, Action, FieldEdit, FormState, RequestOutcome};
pub use task::Task;

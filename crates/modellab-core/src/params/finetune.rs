use serde::{Deserialize, Serialize};

/// LoRA adapter settings, forwarded to the backend as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraConfig {
    /// Rank
    pub r: u32,
    pub alpha: u32,
    pub dropout: f64,
    /// Comma-separated module names, e.g. `q_proj,v_proj`.
    pub target_modules: String,
}

impl Default for LoraConfig {
    fn default() -> Self {
        Self {
            r: 8,
            alpha: 16,
            dropout: 0.05,
            target_modules: "q_proj,v_proj".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineTuneParams {
    pub dataset_path: String,
    pub text_column: String,
    pub label_column: String,
    pub context_column: String,
    pub epochs: u32,
    pub batch_size: u32,
    /// Kept as typed so inputs like `2e-5` survive until submit.
    pub learning_rate: String,
    pub use_lora: bool,
    pub lora_config: LoraConfig,
    pub max_seq_length: u32,
    /// Blank means "let the backend infer it".
    pub num_labels: String,
}

impl Default for FineTuneParams {
    fn default() -> Self {
        Self {
            dataset_path: String::new(),
            text_column: "text".to_string(),
            label_column: "label".to_string(),
            context_column: "context".to_string(),
            epochs: 3,
            batch_size: 8,
            learning_rate: "2e-5".to_string(),
            use_lora: true,
            lora_config: LoraConfig::default(),
            max_seq_length: 384,
            num_labels: String::new(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Anomaly detector inputs. Numeric fields stay as typed text and are parsed at submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyParams {
    pub text: String,
    pub embedding_model_name: String,
    /// Resolved on the backend host.
    pub autoencoder_model_path: String,
    pub embedding_dim: String,
    pub encoding_dim: String,
    pub threshold: String,
}

impl Default for AnomalyParams {
    fn default() -> Self {
        Self {
            text: String::new(),
            embedding_model_name: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            autoencoder_model_path: "./saved_autoencoder.pth".to_string(),
            embedding_dim: "384".to_string(),
            encoding_dim: "64".to_string(),
            threshold: "0.1".to_string(),
        }
    }
}

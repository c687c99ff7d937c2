use crate::params::Quantization;
use crate::{ModelLabError, OperationMode, Result, Task};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const BACKEND_URL_ENV: &str = "MODELLAB_BACKEND_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelLabConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Initial form values for a new session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub operation_mode: OperationMode,
    #[serde(default)]
    pub task: Option<Task>,
    #[serde(default)]
    pub quantization: Quantization,
}

impl ModelLabConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: ModelLabConfig = serde_json::from_str(&raw)?;
        Ok(config.normalized())
    }

    /// Layer file, environment and flag values over the defaults, in that order.
    pub fn resolve(
        file: Option<&Path>,
        env_url: Option<String>,
        flag_url: Option<String>,
    ) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };

        if let Some(url) = flag_url.or(env_url) {
            config.backend.base_url = url;
        }

        let config = config.normalized();
        if config.backend.base_url.is_empty() {
            return Err(ModelLabError::Config("backend base URL is empty".to_string()));
        }
        Ok(config)
    }

    fn normalized(mut self) -> Self {
        self.backend.base_url = self.backend.base_url.trim().trim_end_matches('/').to_string();
        self
    }
}

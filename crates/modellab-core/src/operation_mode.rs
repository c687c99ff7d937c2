use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelLabError;

/// Which backend capability the form targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    #[default]
    Inference,
    Finetune,
    Anomaly,
}

impl OperationMode {
    pub fn id(&self) -> &'static str {
        match self {
            OperationMode::Inference => "inference",
            OperationMode::Finetune => "finetune",
            OperationMode::Anomaly => "anomaly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationMode::Inference => "Inference",
            OperationMode::Finetune => "Fine-Tune",
            OperationMode::Anomaly => "Anomaly Detect",
        }
    }

    /// Backend path the mode submits to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            OperationMode::Inference => "/api/v1/infer",
            OperationMode::Finetune => "/api/v1/finetune",
            OperationMode::Anomaly => "/api/v1/detect_anomaly",
        }
    }

    /// Anomaly detection does not use the task/model pickers.
    pub fn uses_model(&self) -> bool {
        !matches!(self, OperationMode::Anomaly)
    }

    pub fn all() -> &'static [OperationMode] {
        &[
            OperationMode::Inference,
            OperationMode::Finetune,
            OperationMode::Anomaly,
        ]
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OperationMode {
    type Err = ModelLabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inference" | "infer" => Ok(OperationMode::Inference),
            "finetune" | "fine-tune" => Ok(OperationMode::Finetune),
            "anomaly" | "detect_anomaly" => Ok(OperationMode::Anomaly),
            other => Err(ModelLabError::Config(format!(
                "unknown operation mode: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(OperationMode::Inference.endpoint(), "/api/v1/infer");
        assert_eq!(OperationMode::Finetune.endpoint(), "/api/v1/finetune");
        assert_eq!(OperationMode::Anomaly.endpoint(), "/api/v1/detect_anomaly");
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("fine-tune".parse::<OperationMode>().unwrap(), OperationMode::Finetune);
        assert_eq!("Anomaly".parse::<OperationMode>().unwrap(), OperationMode::Anomaly);
        assert!("train".parse::<OperationMode>().is_err());
    }
}

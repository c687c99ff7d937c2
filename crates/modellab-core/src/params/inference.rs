use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::ModelLabError;

/// Quantization hint forwarded to the backend; applied while it loads the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantization {
    #[default]
    None,
    DynamicInt8Cpu,
}

impl Quantization {
    pub fn id(&self) -> &'static str {
        match self {
            Quantization::None => "none",
            Quantization::DynamicInt8Cpu => "dynamic_int8_cpu",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quantization::None => "None",
            Quantization::DynamicInt8Cpu => "Dynamic INT8 (CPU PyTorch)",
        }
    }

    pub fn all() -> &'static [Quantization] {
        &[Quantization::None, Quantization::DynamicInt8Cpu]
    }
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Quantization {
    type Err = ModelLabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Quantization::all()
            .iter()
            .copied()
            .find(|q| q.id() == s)
            .ok_or_else(|| ModelLabError::Config(format!("unknown quantization option: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceParams {
    pub input_text: String,
    /// Only read for question answering.
    pub context_text: String,
    /// Only sent for text generation.
    pub generation_args: BTreeMap<String, i64>,
    pub quantization: Quantization,
}

impl Default for InferenceParams {
    fn default() -> Self {
        let mut generation_args = BTreeMap::new();
        generation_args.insert("max_length".to_string(), 50);
        generation_args.insert("num_beams".to_string(), 1);

        Self {
            input_text: String::new(),
            context_text: String::new(),
            generation_args,
            quantization: Quantization::None,
        }
    }
}

impl InferenceParams {
    pub fn clear_text(&mut self) {
        self.input_text.clear();
        self.context_text.clear();
    }
}

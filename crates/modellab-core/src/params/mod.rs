mod anomaly;
mod finetune;
mod inference;

pub use anomaly::AnomalyParams;
pub use finetune::{FineTuneParams, LoraConfig};
pub use inference::{InferenceParams, Quantization};

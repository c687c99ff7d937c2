use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of the last submit. Exactly one variant at a time, so a stale result
/// and a fresh error can never be shown together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum RequestOutcome {
    #[default]
    Idle,
    Loading,
    Success(Value),
    Failure(String),
}

impl RequestOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestOutcome::Loading)
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            RequestOutcome::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestOutcome::Failure(msg) => Some(msg),
            _ => None,
        }
    }

    /// Drop a settled result or error. An in-flight request keeps its loading state.
    pub fn clear_settled(&mut self) {
        if !self.is_loading() {
            *self = RequestOutcome::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors_are_exclusive() {
        let ok = RequestOutcome::Success(json!({"label": "POSITIVE"}));
        assert!(ok.result().is_some());
        assert!(ok.error().is_none());

        let err = RequestOutcome::Failure("boom".to_string());
        assert!(err.result().is_none());
        assert_eq!(err.error(), Some("boom"));
    }

    #[test]
    fn test_clear_settled_keeps_loading() {
        let mut outcome = RequestOutcome::Loading;
        outcome.clear_settled();
        assert!(outcome.is_loading());

        let mut outcome = RequestOutcome::Failure("x".to_string());
        outcome.clear_settled();
        assert_eq!(outcome, RequestOutcome::Idle);
    }
}

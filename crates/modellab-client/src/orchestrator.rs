//! Form controller - owns the session state and runs one request at a time

use modellab_core::{payload, Action, FormState, RequestOutcome, Result};
use serde_json::Value;
use uuid::Uuid;

use crate::Transport;

/// A validated request handed out by [`Orchestrator::begin_submit`].
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: Uuid,
    pub endpoint: &'static str,
    pub body: Value,
}

pub struct Orchestrator<T: Transport> {
    transport: T,
    state: FormState,
    in_flight: Option<Uuid>,
}

impl<T: Transport> Orchestrator<T> {
    pub fn new(transport: T) -> Self {
        Self::with_state(transport, FormState::new())
    }

    pub fn with_state(transport: T, state: FormState) -> Self {
        Self {
            transport,
            state,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.state.outcome
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Apply a user event to the form.
    ///
    /// Lifecycle actions are ignored here; only [`Self::begin_submit`] and
    /// [`Self::complete`] move the request outcome.
    pub fn dispatch(&mut self, action: Action) {
        if action.is_lifecycle() {
            tracing::warn!("Ignoring lifecycle action outside a submit: {:?}", action);
            return;
        }
        self.state.apply(action);
    }

    /// Validate the form and enter the loading state.
    ///
    /// Returns `None` when a request is already in flight (nothing changes) or
    /// when validation fails (the failure becomes the outcome).
    pub fn begin_submit(&mut self) -> Option<PendingRequest> {
        if self.state.is_loading() {
            tracing::warn!("Submit ignored: a request is already in flight");
            return None;
        }

        let payload = match payload::build(&self.state) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(field = e.field(), "Validation failed: {}", e);
                self.state.apply(Action::RequestFailed(e.to_string()));
                return None;
            }
        };

        let body = match payload.to_json() {
            Ok(b) => b,
            Err(e) => {
                self.state.apply(Action::RequestFailed(e.to_string()));
                return None;
            }
        };

        let id = Uuid::new_v4();
        self.in_flight = Some(id);
        self.state.apply(Action::RequestStarted);

        Some(PendingRequest {
            id,
            endpoint: payload.endpoint(),
            body,
        })
    }

    /// Settle the in-flight request. Results for any other request id are dropped.
    pub fn complete(&mut self, id: Uuid, result: Result<Value>) -> bool {
        if self.in_flight != Some(id) {
            tracing::warn!("Dropping result for unknown request {}", id);
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(body) => {
                tracing::info!("Request {} succeeded", id);
                self.state.apply(Action::RequestSucceeded(body));
            }
            Err(e) => {
                tracing::warn!("Request {} failed: {}", id, e);
                self.state.apply(Action::RequestFailed(e.to_string()));
            }
        }
        true
    }

    /// Validate, send and settle in one go.
    pub async fn submit(&mut self) -> &RequestOutcome {
        if let Some(req) = self.begin_submit() {
            let result = self.transport.post_json(req.endpoint, &req.body).await;
            self.complete(req.id, result);
        }
        &self.state.outcome
    }
}

pub mod backend;
pub mod orchestrator;
pub mod transport;

pub use backend::BackendClient;
pub use orchestrator::{Orchestrator, PendingRequest};
pub use transport::Transport;

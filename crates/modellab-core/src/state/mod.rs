mod form;
mod outcome;

pub use form::{reduce, Action, FieldEdit, FormState};
pub use outcome::RequestOutcome;

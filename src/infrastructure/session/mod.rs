//! Session persistence and the model-collection service.

mod repository;
mod service;

pub use repository::InMemorySessionRepository;
pub use service::{SessionService, SubmitError, DEFAULT_LABEL};

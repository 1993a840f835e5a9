//! HTTP middleware

pub mod session;

pub use session::{session_identity, SESSION_COOKIE};

//! ToastSpeech Shared Library
//!
//! This crate contains the account model, API request/response types and
//! validation helpers shared between the backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Account, UsageRecord};
pub use types::*;

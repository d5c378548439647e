//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the identity provider and token issuance.

pub mod account;

pub use account::{AccountService, AuthSession};

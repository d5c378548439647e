//! Authentication module
//!
//! Provides HS256 bearer token issuance/validation and header extraction.
//! Passwords never touch this service; the provider verifies them.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtKeys, TokenService};
pub use middleware::BearerToken;

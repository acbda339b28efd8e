//! Middleware components for the Cinedex API
//!
//! - `MaybeCaller`: optional caller identity taken from the bearer token.
//!   Handlers pass it to the services, which decide whether the operation
//!   needs one.

pub mod auth;

pub use auth::{caller_from_headers, extract_bearer_token, MaybeCaller};

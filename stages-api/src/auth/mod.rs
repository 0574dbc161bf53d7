//! Bearer-token authentication for the API routes.
//!
//! Token verification is delegated to a [`TokenVerifier`]; this module only
//! extracts the token and enforces a route's scope set.

mod middleware;
mod verifier;

pub use middleware::{require_scope, AuthGate, STAGE_LIST_SCOPES};
pub use verifier::{Credentials, Scope, StaticTokenVerifier, TokenEntry, TokenVerifier};

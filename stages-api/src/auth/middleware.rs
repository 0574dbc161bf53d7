//! Route-level scope gate.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{Scope, TokenVerifier};
use crate::errors::ApiError;

/// Scopes accepted by the stage listing route.
pub const STAGE_LIST_SCOPES: &[Scope] = &[Scope::User, Scope::Build, Scope::Pipeline];

/// State of the scope gate: who verifies tokens and which scopes pass.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn TokenVerifier>,
    required: &'static [Scope],
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Creates a gate requiring any one of `required`.
    #[must_use]
    pub fn new(verifier: Arc<dyn TokenVerifier>, required: &'static [Scope]) -> Self {
        Self { verifier, required }
    }
}

/// Extracts the token of a `Bearer` authorization header. The scheme name
/// matches in any letter case.
fn bearer_token(request: &Request) -> Option<String> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

fn unauthorized(message: &str) -> Response {
    let mut response = ApiError::Unauthorized(message.to_string()).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

/// Rejects requests without a verified credential holding a required scope.
///
/// On success the [`super::Credentials`] are stored in the request
/// extensions.
pub async fn require_scope(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return unauthorized("Missing authentication");
    };

    let Some(credentials) = gate.verifier.verify(&token).await else {
        return unauthorized("Invalid token");
    };

    if !credentials.has_any_scope(gate.required) {
        debug!(
            subject = %credentials.subject,
            scopes = ?credentials.scopes,
            "Credential lacks a required scope"
        );
        return ApiError::Forbidden("Insufficient scope".to_string()).into_response();
    }

    debug!(subject = %credentials.subject, "Authenticated");
    request.extensions_mut().insert(credentials);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use pretty_assertions::assert_eq;

    fn with_authorization(value: &str) -> Request {
        Request::builder()
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_bearer_scheme_ignores_case() {
        for value in ["Bearer abc", "bearer abc", "BEARER abc", "Bearer   abc  "] {
            assert_eq!(
                bearer_token(&with_authorization(value)),
                Some("abc".to_string()),
                "{value}"
            );
        }
    }

    #[test]
    fn test_non_bearer_headers_yield_nothing() {
        for value in ["Basic abc", "Bearer", "Bearer    ", "Bearerabc", "Token abc"] {
            assert_eq!(bearer_token(&with_authorization(value)), None, "{value}");
        }

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(bearer_token(&request), None);
    }
}

//! Caller extraction for Axum handlers
//!
//! A missing, malformed or unverifiable token is not a rejection here: the
//! request simply carries no caller. Reads work without one, and mutations
//! fail in the capability check with `Unauthenticated`.
//!
//! ```rust,ignore
//! async fn handler(MaybeCaller(caller): MaybeCaller) -> impl IntoResponse {
//!     match caller {
//!         Some(caller) => format!("Hello, {}!", caller.subject),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::models::Caller;
use crate::services::AuthService;

/// Optional caller extractor
#[derive(Debug, Clone, Default)]
pub struct MaybeCaller(pub Option<Caller>);

impl MaybeCaller {
    pub fn caller(&self) -> Option<&Caller> {
        self.0.as_ref()
    }
}

/// Bearer token from the Authorization header (scheme is case-insensitive)
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    // Reject malformed values like "Bearer <token> <extra>"
    if parts.next().is_some() {
        return None;
    }

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Resolve the caller for a set of request headers
pub fn caller_from_headers(headers: &HeaderMap, auth_service: &AuthService) -> Option<Caller> {
    let token = extract_bearer_token(headers)?;
    let caller = auth_service.caller_from_token(token);
    if caller.is_none() {
        tracing::debug!("Ignoring unverifiable bearer token");
    }
    caller
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeCaller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(auth_service) = parts.extensions.get::<AuthService>() else {
            tracing::warn!("AuthService not in extensions for MaybeCaller");
            return Ok(MaybeCaller(None));
        };

        Ok(MaybeCaller(caller_from_headers(&parts.headers, auth_service)))
    }
}

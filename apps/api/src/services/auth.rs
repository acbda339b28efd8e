//! Token handling and the capability check
//!
//! Callers identify themselves with an HS256 bearer token. Verification
//! turns the token into a [`Caller`]; every mutation then passes that
//! caller through [`authorize`] before touching the database.
//!
//! The server only verifies tokens. [`AuthService::issue_access_token`] is
//! for operators minting tokens against the deployed secret and for the
//! integration tests; no route issues tokens.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{ApiError, ApiResult};
use crate::models::auth::TOKEN_ISSUER;
use crate::models::{Caller, Claims, Scope};

/// Default access token lifetime: one hour
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Check that a caller holds every required scope
///
/// `Unauthenticated` without a caller, `Forbidden` when a scope is missing.
pub fn authorize(caller: Option<&Caller>, required: &[Scope]) -> ApiResult<()> {
    let caller = caller.ok_or(ApiError::Unauthenticated)?;

    if let Some(missing) = required.iter().find(|scope| !caller.has_scope(**scope)) {
        tracing::debug!(subject = %caller.subject, scope = %missing, "Missing scope");
        return Err(ApiError::Forbidden(format!("'{}' scope required", missing)));
    }
    Ok(())
}

/// Issues and verifies access tokens
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    #[cfg(test)]
    fn with_ttl(mut self, token_ttl_secs: i64) -> Self {
        self.token_ttl_secs = token_ttl_secs;
        self
    }

    /// Sign a token for `subject` carrying `scopes`
    pub fn issue_access_token(&self, subject: &str, scopes: &[Scope]) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            scopes: scopes.iter().map(|s| s.as_str().to_string()).collect(),
            iat: now,
            exp: now + self.token_ttl_secs,
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_ISSUER.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("token encoding failed: {}", e)))
    }

    /// Verify signature, expiry, issuer and audience
    pub fn verify_access_token(&self, token: &str) -> ApiResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_audience(&[TOKEN_ISSUER]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Access token verification failed");
            ApiError::InvalidToken(e.to_string())
        })?;

        Ok(token_data.claims)
    }

    /// Caller for a bearer token; `None` when the token does not verify
    pub fn caller_from_token(&self, token: &str) -> Option<Caller> {
        self.verify_access_token(token).ok().map(Caller::from)
    }
}

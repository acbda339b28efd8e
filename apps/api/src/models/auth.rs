//! Caller identity and token claims

use serde::{Deserialize, Serialize};

/// Issuer and audience written into every token
pub const TOKEN_ISSUER: &str = "cinedex";

/// Capability granted to a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// May create, update and delete catalog entries
    Admin,
    /// Authenticated reader
    User,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("unknown scope '{}'", other)),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (caller identifier)
    pub sub: String,

    /// Granted scopes, e.g. `["admin"]`
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Issued at timestamp (Unix epoch)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,

    #[serde(default = "default_issuer")]
    pub iss: String,

    #[serde(default = "default_issuer")]
    pub aud: String,
}

fn default_issuer() -> String {
    TOKEN_ISSUER.to_string()
}

/// Verified identity of whoever issued the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub subject: String,
    pub scopes: Vec<Scope>,
}

impl Caller {
    pub fn new(subject: impl Into<String>, scopes: Vec<Scope>) -> Self {
        Self {
            subject: subject.into(),
            scopes,
        }
    }

    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}

impl From<Claims> for Caller {
    /// Unknown scope names are dropped
    fn from(claims: Claims) -> Self {
        let scopes = claims
            .scopes
            .iter()
            .filter_map(|s| s.parse::<Scope>().ok())
            .collect();
        Self {
            subject: claims.sub,
            scopes,
        }
    }
}

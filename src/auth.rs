//! JWT authentication for the relay
//!
//! Tokens are minted elsewhere (the dashboard's login endpoint); the relay
//! only validates them. When `RELAY_JWT_SECRET` is unset the relay runs open
//! and every connection is implicitly trusted, matching the baseline
//! deployment.

use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims carried on a relay connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account or device identity)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() > self.exp
    }
}

/// Validates HS256 bearer tokens against the configured secret
pub struct RelayAuth {
    decoding_key: DecodingKey,
}

impl RelayAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Validate a token and return its claims.
    /// Accepts "Bearer <token>" or a bare token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &Validation::default())
                .map_err(|e| AuthError::TokenError(e.to_string()))?;

        if token_data.claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    TokenError(String),
    TokenExpired,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::TokenError(msg) => write!(f, "Token error: {}", msg),
            AuthError::TokenExpired => write!(f, "Token has expired"),
        }
    }
}

impl std::error::Error for AuthError {}

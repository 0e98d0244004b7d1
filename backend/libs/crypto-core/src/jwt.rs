//! Session token issuing and validation
//!
//! Tokens are HS256 signed with a shared secret and carry an `active` flag.
//! Logging out does not revoke anything server side: the client receives a
//! replacement token with `active = false`, which every authenticated route
//! rejects.
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::TokenIssuer;
//!
//! let issuer = TokenIssuer::from_secret("change-me").unwrap();
//! let token = issuer.issue(42, "ann@example.com", "ann", true).unwrap();
//! let claims = issuer.validate_active(&token).unwrap();
//! assert_eq!(claims.user_id().unwrap(), 42);
//! ```
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, TokenData,
    Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (numeric user id as a string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// False once the session has been logged out
    pub active: bool,
    pub email: String,
    pub username: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Malformed)
    }
}

/// Token failures. The display strings are returned to API clients verbatim.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to parse token")]
    Malformed,
    #[error("Token has expired")]
    Expired,
    #[error("Token is not active")]
    Inactive,
    #[error("JWT secret must not be empty")]
    EmptySecret,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

// ============================================================================
// Issuer
// ============================================================================

/// Signs and validates session tokens with one shared secret.
///
/// Built once at startup and handed to the HTTP layer through application
/// state; there is no global key storage.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenIssuer {
    pub fn from_secret(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id`.
    ///
    /// `active = false` produces the token handed out on logout.
    pub fn issue(
        &self,
        user_id: i64,
        email: &str,
        username: &str,
        active: bool,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expiry = now + self.ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            active,
            email: email.to_string(),
            username: username.to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, without looking at the `active` flag.
    pub fn decode(&self, token: &str) -> Result<TokenData<Claims>, TokenError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => {
                tracing::debug!(error = %e, "token rejected");
                TokenError::Malformed
            }
        })
    }

    /// Full check used by the authentication middleware.
    pub fn validate_active(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?.claims;
        if !claims.active {
            return Err(TokenError::Inactive);
        }
        claims.user_id()?;
        Ok(claims)
    }
}

// ============================================================================
// Tests
// ============================================================================

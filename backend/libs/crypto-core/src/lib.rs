//! Token, password and digest primitives shared by the social backend.

pub mod hash;
pub mod jwt;
pub mod password;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

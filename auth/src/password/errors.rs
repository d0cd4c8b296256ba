use thiserror::Error;

/// Error type for password operations.
///
/// Only `hash` and the hasher constructors surface these to callers.
/// Verification folds every variant into a `false` result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid bcrypt cost {0}: expected a value between 4 and 31")]
    InvalidCost(u32),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

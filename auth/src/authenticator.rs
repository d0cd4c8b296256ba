use serde::Serialize;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and session tokens.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
}

/// Authentication operation errors.
///
/// A failed password check is always `InvalidCredentials`, whatever the
/// reason the stored hash did not verify.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with the default bcrypt cost.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for session token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_hasher(PasswordHasher::new(), jwt_secret)
    }

    /// Create an authenticator around a preconfigured hasher.
    pub fn with_hasher(password_hasher: PasswordHasher, jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher,
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a candidate password against a stored hash of any supported encoding.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `claims` - Claims to encode in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match the stored hash
    /// * `JwtError` - Token generation failed
    pub fn authenticate<T: Serialize>(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &T,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.encode(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a session token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate and decode a session token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token<T: for<'de> serde::Deserialize<'de>>(
        &self,
        token: &str,
    ) -> Result<T, JwtError> {
        self.jwt_handler.decode(token)
    }
}

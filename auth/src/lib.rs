//! Credential and session utilities.
//!
//! - Password hashing (bcrypt) with verification of legacy PBKDF2 and
//!   scrypt hashes in the `method$salt$digest` encoding
//! - Session token generation and validation (HS256 JWT)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(4).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("my_password", "not-a-hash"));
//! ```
//!
//! ## Login Flow
//! ```
//! use auth::{Authenticator, Claims, PasswordHasher};
//!
//! let hasher = PasswordHasher::with_cost(4).unwrap();
//! let auth = Authenticator::with_hasher(hasher, b"secret_key_at_least_32_bytes_long!");
//!
//! let hash = auth.hash_password("password123").unwrap();
//!
//! let claims = Claims::for_user("user123", "alice", "user", 24);
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! let decoded: Claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.role().as_deref(), Some("user"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::StoredHash;

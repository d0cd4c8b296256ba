use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::PasswordPolicyError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// `password_hash` holds the stored credential in whichever encoding
/// produced it (bcrypt for new accounts, PBKDF2/scrypt for imported ones).
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Surrounding whitespace is trimmed; the result must be 1-64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty after trimming
    /// * `TooLong` - Username longer than 64 characters
    pub fn new(username: impl AsRef<str>) -> Result<Self, UsernameError> {
        let username = username.as_ref().trim();
        let length = username.chars().count();
        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at the registration boundary.
///
/// Only emptiness is rejected. The value is never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `Empty` - Password is the empty string
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.is_empty() {
            Err(PasswordPolicyError::Empty)
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Authorization role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to register a new regular user
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub username: Username,
    pub password: Password,
}

impl RegisterUserCommand {
    pub fn new(username: Username, password: Password) -> Self {
        Self { username, password }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_trimmed() {
        let username = Username::new("  alice ").unwrap();
        assert_eq!(username.as_str(), "alice");
    }

    #[test]
    fn test_username_rejects_blank() {
        assert_eq!(Username::new("   "), Err(UsernameError::Empty));
        assert_eq!(Username::new(""), Err(UsernameError::Empty));
    }

    #[test]
    fn test_username_length_limit() {
        assert!(Username::new("a".repeat(64)).is_ok());
        assert_eq!(
            Username::new("a".repeat(65)),
            Err(UsernameError::TooLong {
                max: 64,
                actual: 65
            })
        );
    }

    #[test]
    fn test_password_rejects_empty_only() {
        assert_eq!(Password::new(String::new()), Err(PasswordPolicyError::Empty));
        assert_eq!(Password::new(" ".to_string()).unwrap().expose(), " ");
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter2".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter2"));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!(matches!(
            "superuser".parse::<Role>(),
            Err(RoleError::Unknown(_))
        ));
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
    }
}

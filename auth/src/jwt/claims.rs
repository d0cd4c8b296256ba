use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

const USERNAME_CLAIM: &str = "username";
const ROLE_CLAIM: &str = "role";

/// Session token claims.
///
/// Standard RFC 7519 registered claims plus custom fields via the `extra`
/// map. Session tokens carry the username and role as extras so a request
/// can be authorized without a store lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for an authenticated session with automatic expiration.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier (stored in `sub`)
    /// * `username` - Username (stored in `extra.username`)
    /// * `role` - Authorization role (stored in `extra.role`)
    /// * `expiration_hours` - Hours until token expires
    ///
    /// # Returns
    /// Claims with sub, exp, iat, username and role set
    pub fn for_user(
        user_id: impl ToString,
        username: impl ToString,
        role: impl ToString,
        expiration_hours: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(expiration_hours);

        Self::new()
            .with_subject(user_id)
            .with_issued_at(now.timestamp())
            .with_expiration(expiration.timestamp())
            .with_extra(USERNAME_CLAIM, username.to_string())
            .with_extra(ROLE_CLAIM, role.to_string())
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        self.extra
            .insert(key.to_string(), serde_json::to_value(value).unwrap_or(json!(null)));
        self
    }

    /// Get username from extra fields.
    pub fn username(&self) -> Option<String> {
        self.extra_str(USERNAME_CLAIM)
    }

    /// Get role from extra fields.
    pub fn role(&self) -> Option<String> {
        self.extra_str(ROLE_CLAIM)
    }

    fn extra_str(&self, key: &str) -> Option<String> {
        self.extra
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

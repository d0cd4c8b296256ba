use super::errors::PasswordError;
use super::stored_hash::StoredHash;

/// Password hashing implementation.
///
/// New credentials are always bcrypt. Verification accepts every stored
/// encoding in [`StoredHash`], so records written by older schemes keep
/// working after a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;

    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher using the default bcrypt cost
    pub fn new() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit bcrypt work factor.
    ///
    /// # Errors
    /// * `InvalidCost` - Cost outside 4..=31
    pub fn with_cost(cost: u32) -> Result<Self, PasswordError> {
        if (Self::MIN_COST..=Self::MAX_COST).contains(&cost) {
            Ok(Self { cost })
        } else {
            Err(PasswordError::InvalidCost(cost))
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password securely.
    ///
    /// Every call draws a fresh salt, so hashing the same password twice
    /// yields two different strings that both verify.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash (may be empty)
    ///
    /// # Returns
    /// bcrypt modular-crypt string (`$2b$<cost>$<salt+digest>`)
    ///
    /// # Errors
    /// * `HashingFailed` - The system random source could not produce a salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash of any supported encoding.
    ///
    /// # Arguments
    /// * `password` - Plaintext candidate
    /// * `stored_hash` - Stored hash (bcrypt, PBKDF2 or scrypt encoding)
    ///
    /// # Returns
    /// True only if the candidate reproduces the stored hash; empty,
    /// malformed and unrecognized hashes are false
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        StoredHash::parse(stored_hash).verify(password)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

use super::errors::PasswordError;
use super::legacy::LegacyHash;

/// Tags that identify the bcrypt family.
const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Separator between the algorithm tag and its parameters in legacy KDF hashes.
const LEGACY_DELIMITER: char = ':';

/// A stored password hash classified by its encoding.
///
/// The prefix of the stored string is public data, so sniffing it up front
/// leaks nothing about the password. Only the digest comparison inside each
/// variant depends on the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredHash<'a> {
    /// Modular-crypt bcrypt (`$2a$`, `$2b$`, `$2y$`).
    Bcrypt(&'a str),
    /// Delimited `method$salt$digest` encodings (PBKDF2, scrypt).
    LegacyKdf(&'a str),
    /// Empty or of no known shape.
    Unrecognized,
}

impl<'a> StoredHash<'a> {
    /// Classify a stored hash by its prefix.
    pub fn parse(stored: &'a str) -> Self {
        if stored.is_empty() {
            StoredHash::Unrecognized
        } else if BCRYPT_PREFIXES.iter().any(|tag| stored.starts_with(tag)) {
            StoredHash::Bcrypt(stored)
        } else if stored.contains(LEGACY_DELIMITER) {
            StoredHash::LegacyKdf(stored)
        } else {
            StoredHash::Unrecognized
        }
    }

    /// Name of the encoding family, for diagnostics.
    pub fn scheme(&self) -> &'static str {
        match self {
            StoredHash::Bcrypt(_) => "bcrypt",
            StoredHash::LegacyKdf(_) => "legacy-kdf",
            StoredHash::Unrecognized => "unrecognized",
        }
    }

    /// Check `password` against this hash.
    ///
    /// Never fails: malformed payloads and unknown formats verify as `false`.
    /// Malformed records inside a known family are reported through a
    /// `warn` event so corrupt credentials can be found without changing
    /// what the caller observes.
    pub fn verify(&self, password: &str) -> bool {
        let outcome = match self {
            StoredHash::Bcrypt(encoded) => bcrypt::verify(password, encoded)
                .map_err(|e| PasswordError::MalformedHash(e.to_string())),
            StoredHash::LegacyKdf(encoded) => {
                LegacyHash::parse(encoded).and_then(|hash| hash.matches(password))
            }
            StoredHash::Unrecognized => Ok(false),
        };

        outcome.unwrap_or_else(|e| {
            tracing::warn!(scheme = self.scheme(), error = %e, "Unverifiable stored password hash");
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BCRYPT_U_U: &str = "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

    #[test]
    fn test_parse_classifies_prefixes() {
        assert_eq!(StoredHash::parse(""), StoredHash::Unrecognized);
        assert_eq!(
            StoredHash::parse(BCRYPT_U_U),
            StoredHash::Bcrypt(BCRYPT_U_U)
        );
        assert!(matches!(
            StoredHash::parse("$2y$10$whatever"),
            StoredHash::Bcrypt(_)
        ));
        assert!(matches!(
            StoredHash::parse("pbkdf2:sha256:260000$salt$digest"),
            StoredHash::LegacyKdf(_)
        ));
        assert!(matches!(
            StoredHash::parse("scrypt:32768:8:1$salt$digest"),
            StoredHash::LegacyKdf(_)
        ));
        assert_eq!(
            StoredHash::parse("not-a-recognized-format"),
            StoredHash::Unrecognized
        );
        // Argon2 PHC strings are not a supported family.
        assert_eq!(
            StoredHash::parse("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
            StoredHash::Unrecognized
        );
    }

    #[test]
    fn test_bcrypt_prefix_wins_over_delimiter() {
        assert!(matches!(
            StoredHash::parse("$2b$12$has:colon"),
            StoredHash::Bcrypt(_)
        ));
    }

    #[test]
    fn test_verify_bcrypt_reference() {
        let hash = StoredHash::parse(BCRYPT_U_U);
        assert!(hash.verify("U*U"));
        assert!(!hash.verify("U*U*"));
    }

    #[test]
    fn test_verify_malformed_bcrypt_is_false() {
        assert!(!StoredHash::parse("$2b$12$tooshort").verify("U*U"));
        assert!(!StoredHash::parse("$2b$xx$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW")
            .verify("U*U"));
        assert!(!StoredHash::parse("$2b$05$!!!!!!!!!!!!!!!!!!!!!!E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW")
            .verify("U*U"));
    }

    #[test]
    fn test_verify_unrecognized_is_false() {
        assert!(!StoredHash::Unrecognized.verify(""));
        assert!(!StoredHash::parse("plaintext-password").verify("plaintext-password"));
    }

    #[test]
    fn test_verify_malformed_legacy_is_false() {
        assert!(!StoredHash::parse("pbkdf2:sha256:abc$salt$digest").verify("pw"));
        assert!(!StoredHash::parse("sha1:whatever").verify("pw"));
        assert!(!StoredHash::parse("scrypt:15:8:1$salt$digest").verify("pw"));
    }
}

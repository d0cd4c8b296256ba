use std::fmt;
use std::str::FromStr;

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::Sha224;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;
use sha3::Sha3_224;
use sha3::Sha3_256;
use sha3::Sha3_384;
use sha3::Sha3_512;
use subtle::ConstantTimeEq;

use super::errors::PasswordError;

const DEFAULT_PBKDF2_ITERATIONS: u32 = 600_000;
const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

const DEFAULT_SCRYPT_LOG_N: u8 = 15;
const DEFAULT_SCRYPT_R: u32 = 8;
const DEFAULT_SCRYPT_P: u32 = 1;
const MAX_SCRYPT_LOG_N: u8 = 20;
const MAX_SCRYPT_R: u32 = 32;
const MAX_SCRYPT_P: u32 = 16;
const SCRYPT_DIGEST_LEN: usize = 64;

/// HMAC digest used as the PBKDF2 pseudo-random function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pbkdf2Digest {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl Pbkdf2Digest {
    pub fn name(&self) -> &'static str {
        match self {
            Pbkdf2Digest::Sha1 => "sha1",
            Pbkdf2Digest::Sha224 => "sha224",
            Pbkdf2Digest::Sha256 => "sha256",
            Pbkdf2Digest::Sha384 => "sha384",
            Pbkdf2Digest::Sha512 => "sha512",
            Pbkdf2Digest::Sha3_224 => "sha3_224",
            Pbkdf2Digest::Sha3_256 => "sha3_256",
            Pbkdf2Digest::Sha3_384 => "sha3_384",
            Pbkdf2Digest::Sha3_512 => "sha3_512",
        }
    }

    /// Derived key length, which is always the digest size.
    fn output_len(&self) -> usize {
        match self {
            Pbkdf2Digest::Sha1 => 20,
            Pbkdf2Digest::Sha224 | Pbkdf2Digest::Sha3_224 => 28,
            Pbkdf2Digest::Sha256 | Pbkdf2Digest::Sha3_256 => 32,
            Pbkdf2Digest::Sha384 | Pbkdf2Digest::Sha3_384 => 48,
            Pbkdf2Digest::Sha512 | Pbkdf2Digest::Sha3_512 => 64,
        }
    }
}

impl FromStr for Pbkdf2Digest {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(Pbkdf2Digest::Sha1),
            "sha224" => Ok(Pbkdf2Digest::Sha224),
            "sha256" => Ok(Pbkdf2Digest::Sha256),
            "sha384" => Ok(Pbkdf2Digest::Sha384),
            "sha512" => Ok(Pbkdf2Digest::Sha512),
            "sha3_224" => Ok(Pbkdf2Digest::Sha3_224),
            "sha3_256" => Ok(Pbkdf2Digest::Sha3_256),
            "sha3_384" => Ok(Pbkdf2Digest::Sha3_384),
            "sha3_512" => Ok(Pbkdf2Digest::Sha3_512),
            other => Err(PasswordError::UnsupportedAlgorithm(format!("pbkdf2:{}", other))),
        }
    }
}

/// Key derivation function named by the method field of a legacy hash.
///
/// The method field is colon separated: `pbkdf2[:<digest>[:<iterations>]]`
/// or `scrypt[:<n>:<r>:<p>]`. Omitted parameters take the defaults the
/// legacy hashes were produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKdf {
    Pbkdf2 { digest: Pbkdf2Digest, iterations: u32 },
    Scrypt { log_n: u8, r: u32, p: u32 },
}

impl LegacyKdf {
    /// Parse the method field of a legacy hash.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Unknown KDF or digest name
    /// * `MalformedHash` - Wrong parameter count, non-numeric or out-of-bound values
    pub fn parse(method: &str) -> Result<Self, PasswordError> {
        let mut parts = method.split(':');
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match name {
            "pbkdf2" => Self::parse_pbkdf2(&args),
            "scrypt" => Self::parse_scrypt(&args),
            other => Err(PasswordError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    fn parse_pbkdf2(args: &[&str]) -> Result<Self, PasswordError> {
        let (digest, iterations) = match args {
            [] => (Pbkdf2Digest::Sha256, DEFAULT_PBKDF2_ITERATIONS),
            [digest] => (digest.parse()?, DEFAULT_PBKDF2_ITERATIONS),
            [digest, iterations] => (digest.parse()?, parse_number(iterations)?),
            _ => {
                return Err(PasswordError::MalformedHash(
                    "pbkdf2 takes at most 2 parameters".to_string(),
                ))
            }
        };

        if iterations == 0 || iterations > MAX_PBKDF2_ITERATIONS {
            return Err(PasswordError::MalformedHash(format!(
                "pbkdf2 iteration count {} out of range",
                iterations
            )));
        }

        Ok(LegacyKdf::Pbkdf2 { digest, iterations })
    }

    fn parse_scrypt(args: &[&str]) -> Result<Self, PasswordError> {
        let (n, r, p): (u64, u32, u32) = match args {
            [] => (
                1 << DEFAULT_SCRYPT_LOG_N,
                DEFAULT_SCRYPT_R,
                DEFAULT_SCRYPT_P,
            ),
            [n, r, p] => (parse_number(n)?, parse_number(r)?, parse_number(p)?),
            _ => {
                return Err(PasswordError::MalformedHash(
                    "scrypt takes 3 parameters".to_string(),
                ))
            }
        };

        if n < 2 || !n.is_power_of_two() {
            return Err(PasswordError::MalformedHash(format!(
                "scrypt cost {} is not a power of two",
                n
            )));
        }

        let log_n = n.trailing_zeros() as u8;
        if log_n > MAX_SCRYPT_LOG_N || r == 0 || r > MAX_SCRYPT_R || p == 0 || p > MAX_SCRYPT_P {
            return Err(PasswordError::MalformedHash(format!(
                "scrypt parameters n={} r={} p={} out of range",
                n, r, p
            )));
        }

        Ok(LegacyKdf::Scrypt { log_n, r, p })
    }

    /// Run the KDF over a password and salt.
    ///
    /// # Returns
    /// Raw derived key bytes
    ///
    /// # Errors
    /// * `MalformedHash` - Parameters rejected by the underlying primitive
    pub fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>, PasswordError> {
        match *self {
            LegacyKdf::Pbkdf2 { digest, iterations } => {
                let mut output = vec![0u8; digest.output_len()];
                match digest {
                    Pbkdf2Digest::Sha1 => {
                        pbkdf2_hmac::<Sha1>(password, salt, iterations, &mut output)
                    }
                    Pbkdf2Digest::Sha224 => {
                        pbkdf2_hmac::<Sha224>(password, salt, iterations, &mut output)
                    }
                    Pbkdf2Digest::Sha256 => {
                        pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut output)
                    }
                    Pbkdf2Digest::Sha384 => {
                        pbkdf2_hmac::<Sha384>(password, salt, iterations, &mut output)
                    }
                    Pbkdf2Digest::Sha512 => {
                        pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut output)
                    }
                    Pbkdf2Digest::Sha3_224 => {
                        pbkdf2_hmac::<Sha3_224>(password, salt, iterations, &mut output)
                    }
                    Pbkdf2Digest::Sha3_256 => {
                        pbkdf2_hmac::<Sha3_256>(password, salt, iterations, &mut output)
                    }
                    Pbkdf2Digest::Sha3_384 => {
                        pbkdf2_hmac::<Sha3_384>(password, salt, iterations, &mut output)
                    }
                    Pbkdf2Digest::Sha3_512 => {
                        pbkdf2_hmac::<Sha3_512>(password, salt, iterations, &mut output)
                    }
                }
                Ok(output)
            }
            LegacyKdf::Scrypt { log_n, r, p } => {
                let params = scrypt::Params::new(log_n, r, p, SCRYPT_DIGEST_LEN)
                    .map_err(|e| PasswordError::MalformedHash(format!("scrypt params: {}", e)))?;
                let mut output = vec![0u8; SCRYPT_DIGEST_LEN];
                scrypt::scrypt(password, salt, &params, &mut output)
                    .map_err(|e| PasswordError::MalformedHash(format!("scrypt output: {}", e)))?;
                Ok(output)
            }
        }
    }

    /// Produce a complete `method$salt$digest` string.
    ///
    /// Not used for new credentials; kept for tooling that needs to mint
    /// records in the legacy encoding (fixtures, import checks).
    pub fn encode(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        let digest = self.derive(password.as_bytes(), salt.as_bytes())?;
        Ok(format!("{}${}${}", self, salt, hex::encode(digest)))
    }
}

impl fmt::Display for LegacyKdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegacyKdf::Pbkdf2 { digest, iterations } => {
                write!(f, "pbkdf2:{}:{}", digest.name(), iterations)
            }
            LegacyKdf::Scrypt { log_n, r, p } => write!(f, "scrypt:{}:{}:{}", 1u64 << log_n, r, p),
        }
    }
}

/// A parsed `method$salt$hexdigest` hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyHash<'a> {
    kdf: LegacyKdf,
    salt: &'a str,
    digest: &'a str,
}

impl<'a> LegacyHash<'a> {
    /// Split a stored hash into method, salt and digest fields.
    ///
    /// Only the first two `$` are separators.
    pub fn parse(encoded: &'a str) -> Result<Self, PasswordError> {
        let mut fields = encoded.splitn(3, '$');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(method), Some(salt), Some(digest)) => Ok(Self {
                kdf: LegacyKdf::parse(method)?,
                salt,
                digest,
            }),
            _ => Err(PasswordError::MalformedHash(
                "expected method$salt$digest".to_string(),
            )),
        }
    }

    pub fn kdf(&self) -> LegacyKdf {
        self.kdf
    }

    /// Re-derive the digest for `password` and compare it in constant time.
    ///
    /// The comparison is over the lowercase hex text, so a stored digest
    /// in any other casing never matches.
    pub fn matches(&self, password: &str) -> Result<bool, PasswordError> {
        let derived = hex::encode(self.kdf.derive(password.as_bytes(), self.salt.as_bytes())?);
        Ok(derived.as_bytes().ct_eq(self.digest.as_bytes()).into())
    }
}

fn parse_number<T: FromStr>(field: &str) -> Result<T, PasswordError> {
    field
        .parse()
        .map_err(|_| PasswordError::MalformedHash(format!("invalid numeric parameter {:?}", field)))
}

pub mod errors;
pub mod hasher;
pub mod legacy;
pub mod stored_hash;

pub use errors::PasswordError;
pub use hasher::PasswordHasher;
pub use legacy::LegacyHash;
pub use legacy::LegacyKdf;
pub use legacy::Pbkdf2Digest;
pub use stored_hash::StoredHash;

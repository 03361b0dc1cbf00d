//! Password hashing utilities

use bcrypt::{hash, verify};

/// Work factor used for stored passwords.
pub const HASH_COST: u32 = 10;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, HASH_COST)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

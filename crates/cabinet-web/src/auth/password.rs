//! Argon2 password hashing for the users list in the server config.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Checks a login password against a stored argon2 hash.
///
/// `Ok(false)` means a wrong password; an `Err` means the stored hash
/// itself is unusable and the user entry needs re-provisioning.
pub fn verify_password(hash: &str, password: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("stored password hash is not valid: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Hashes a password with a fresh random salt. Counterpart of the
/// `hash_password` provisioning binary.
#[allow(dead_code)]
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("could not hash password: {e}"))?
        .to_string())
}

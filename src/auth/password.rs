//! Salted password hashing.
//!
//! Argon2id (v0x13) with 19 456 KiB of memory, 2 passes and 1 lane. Every
//! user gets a fresh 32-byte salt; the derived key is 32 bytes. The stored
//! form is `hex(salt) || hex(key)`, 128 characters.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::error;

pub const SALT_LEN: usize = 32;
pub const KEY_LEN: usize = 32;
pub const STORED_LEN: usize = 2 * (SALT_LEN + KEY_LEN);

const MEMORY_KIB: u32 = 19_456;
const PASSES: u32 = 2;
const LANES: u32 = 1;

fn kdf() -> anyhow::Result<Argon2<'static>> {
    let params = Params::new(MEMORY_KIB, PASSES, LANES, Some(KEY_LEN)).map_err(|e| {
        error!(error = %e, "argon2 params error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn derive(plain: &str, salt: &[u8]) -> anyhow::Result<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    kdf()?
        .hash_password_into(plain.as_bytes(), salt, &mut key)
        .map_err(|e| {
            error!(error = %e, "argon2 derive error");
            anyhow::anyhow!(e.to_string())
        })?;
    Ok(key)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive(plain, &salt)?;
    Ok(format!("{}{}", hex::encode(salt), hex::encode(key)))
}

/// `Ok(false)` on mismatch; `Err` only when `stored` is not a value produced
/// by [`hash_password`].
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    if stored.len() != STORED_LEN {
        anyhow::bail!(
            "stored password hash has length {}, expected {}",
            stored.len(),
            STORED_LEN
        );
    }
    let raw = hex::decode(stored).map_err(|e| {
        error!(error = %e, "stored password hash is not hex");
        anyhow::anyhow!("stored password hash is not hex: {e}")
    })?;
    let (salt, expected) = raw.split_at(SALT_LEN);
    let derived = derive(plain, salt)?;
    Ok(derived[..].ct_eq(expected).into())
}

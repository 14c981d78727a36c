use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

lazy_static! {
    /// Stand-in PHC hash for logins against unknown emails. Built on first use.
    static ref DECOY_HASH: Option<String> = hash_password("decoy-credential").ok();
}

#[cfg(test)]
pub(crate) static DECOY_VERIFICATIONS: AtomicUsize = AtomicUsize::new(0);

/// Derives an Argon2id PHC string (default cost) with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Checks `plain` against a stored PHC hash. The comparison is constant-time
/// inside the argon2 verifier.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Runs [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain)).await?
}

/// Runs [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await?
}

/// Runs a full verify against [`DECOY_HASH`] on the blocking pool, so a
/// lookup miss costs the same as a wrong password. The outcome is discarded.
pub async fn verify_decoy_blocking(plain: String) -> anyhow::Result<()> {
    #[cfg(test)]
    DECOY_VERIFICATIONS.fetch_add(1, Ordering::SeqCst);

    tokio::task::spawn_blocking(move || match DECOY_HASH.as_deref() {
        Some(hash) => verify_password(&plain, hash).map(|_| ()),
        None => Err(anyhow::anyhow!("decoy hash unavailable")),
    })
    .await?
}

//! Password hashing with argon2id.
use std::sync::Arc;

use anyhow::Result;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::PasswordHash;
use argon2::PasswordHasher as _;
use argon2::PasswordVerifier as _;
use argon2::Version;
use once_cell::sync::OnceCell;
use rand::rngs::OsRng;

/// Hash and verify passwords, offloading the work to blocking threads.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,

    /// Hash checked in place of a real one when the account is unknown.
    decoy: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        PasswordHasher {
            argon2,
            decoy: Default::default(),
        }
    }

    /// Hash a password into a PHC formatted string.
    pub async fn hash(&self, password: String) -> Result<String> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || hash_password(&argon2, &password)).await?
    }

    /// Spend the same effort as [`PasswordHasher::verify`] without a stored hash to check.
    ///
    /// Lookups for unknown accounts call this so they take as long as a failed
    /// password check and response times don't reveal which usernames exist.
    pub async fn verify_decoy(&self, password: String) -> Result<()> {
        let argon2 = self.argon2.clone();
        let decoy = Arc::clone(&self.decoy);
        tokio::task::spawn_blocking(move || {
            let hash = decoy.get_or_try_init(|| hash_password(&argon2, "decoy"))?;
            let hash = PasswordHash::new(hash)
                .map_err(|error| anyhow::anyhow!("decoy password hash is invalid: {}", error))?;
            let _ = argon2.verify_password(password.as_bytes(), &hash);
            Ok(())
        })
        .await?
    }

    #[cfg(test)]
    pub(crate) fn decoy_ready(&self) -> bool {
        self.decoy.get().is_some()
    }

    /// Check a password against a PHC formatted hash.
    pub async fn verify(&self, password: String, hash: String) -> Result<bool> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || {
            let hash = PasswordHash::new(&hash)
                .map_err(|error| anyhow::anyhow!("stored password hash is invalid: {}", error))?;
            Ok(argon2.verify_password(password.as_bytes(), &hash).is_ok())
        })
        .await?
    }
}

fn hash_password(argon2: &Argon2, password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|error| anyhow::anyhow!("unable to hash password: {}", error))?;
    Ok(hash.to_string())
}

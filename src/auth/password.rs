use std::str::FromStr;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{debug, error};

/// How account passwords are kept in the `users` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialScheme {
    /// Stored as typed. Matches the existing data layout.
    #[default]
    Plaintext,
    Argon2,
}

impl FromStr for CredentialScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(Self::Plaintext),
            "argon2" => Ok(Self::Argon2),
            other => anyhow::bail!("unknown credential scheme `{other}`"),
        }
    }
}

impl CredentialScheme {
    pub fn protect(self, plain: &str) -> anyhow::Result<String> {
        match self {
            Self::Plaintext => Ok(plain.to_string()),
            Self::Argon2 => hash_password(plain),
        }
    }

    /// Stored values that are not PHC strings are compared as plaintext so
    /// accounts created before hashing was switched on keep working.
    pub fn verify(self, plain: &str, stored: &str) -> anyhow::Result<bool> {
        match self {
            Self::Plaintext => Ok(plain == stored),
            Self::Argon2 if PasswordHash::new(stored).is_ok() => verify_password(plain, stored),
            Self::Argon2 => {
                debug!("stored credential is not a hash; comparing as plaintext");
                Ok(plain == stored)
            }
        }
    }
}

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

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

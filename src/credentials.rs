//! Password hashing for stored credentials.
//!
//! Records are bcrypt strings in the `$2a$` form at a fixed work factor of
//! [`COST`]: `$2a$10$` followed by a 22-character salt and a 31-character
//! digest. The record carries its own algorithm, cost and salt, so
//! verification needs nothing but the record.
//!
//! Salts come from a [`SaltSource`]. Production uses the operating system
//! CSPRNG via [`OsSaltSource`]; if it is unavailable hashing fails with
//! [`CredentialError::EntropyUnavailable`] rather than falling back to a
//! weaker generator.

use log::warn;
use rand::RngCore;
use rand::rngs::OsRng;
use std::sync::LazyLock;
use thiserror::Error;

/// bcrypt work factor for new records.
pub const COST: u32 = 10;

/// Raw salt length consumed by bcrypt.
pub const SALT_LEN: usize = 16;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("secure random source unavailable: {0}")]
    EntropyUnavailable(String),
    #[error("bcrypt failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Supplier of salt bytes.
pub trait SaltSource: Send + Sync {
    fn fill_salt(&self, salt: &mut [u8; SALT_LEN]) -> Result<(), CredentialError>;
}

/// Salt from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn fill_salt(&self, salt: &mut [u8; SALT_LEN]) -> Result<(), CredentialError> {
        OsRng
            .try_fill_bytes(&mut salt[..])
            .map_err(|e| CredentialError::EntropyUnavailable(e.to_string()))
    }
}

/// Produces bcrypt records with salts drawn from its [`SaltSource`].
pub struct CredentialHasher {
    source: Box<dyn SaltSource>,
}

impl CredentialHasher {
    pub fn new(source: impl SaltSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Hasher backed by [`OsSaltSource`].
    pub fn system() -> Self {
        Self::new(OsSaltSource)
    }

    /// Hash `plaintext` into a fresh `$2a$` record.
    ///
    /// bcrypt only reads the first 72 bytes of the input.
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let mut salt = [0u8; SALT_LEN];
        self.source.fill_salt(&mut salt)?;
        let parts = bcrypt::hash_with_salt(plaintext, COST, salt)?;
        Ok(parts.format_for_version(bcrypt::Version::TwoA))
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::system()
    }
}

static SYSTEM_HASHER: LazyLock<CredentialHasher> = LazyLock::new(CredentialHasher::system);

/// Hash with the system salt source.
pub fn hash_password(plaintext: &str) -> Result<String, CredentialError> {
    SYSTEM_HASHER.hash(plaintext)
}

/// Check `plaintext` against a stored record.
///
/// Accepts any bcrypt version prefix (`2a`, `2b`, `2x`, `2y`). A malformed
/// record never matches.
pub fn verify_password(plaintext: &str, record: &str) -> bool {
    match bcrypt::verify(plaintext, record) {
        Ok(matched) => matched,
        Err(e) => {
            warn!("rejecting malformed credential record: {}", e);
            false
        }
    }
}

/// The fields of a bcrypt record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord<'a> {
    pub version: &'a str,
    pub cost: u32,
    pub salt: &'a str,
    pub digest: &'a str,
}

impl<'a> HashRecord<'a> {
    /// Split `$<version>$<cost>$<salt><digest>`; `None` when the shape is wrong.
    pub fn parse(record: &'a str) -> Option<Self> {
        let mut fields = record.strip_prefix('$')?.splitn(3, '$');
        let version = fields.next()?;
        let cost = fields.next()?;
        let rest = fields.next()?;
        if cost.len() != 2 || rest.len() != 53 || !rest.is_ascii() {
            return None;
        }
        let (salt, digest) = rest.split_at(22);
        Some(Self {
            version,
            cost: cost.parse().ok()?,
            salt,
            digest,
        })
    }
}

/// Whether a stored record was produced with a different work factor.
pub fn needs_rehash(record: &str) -> bool {
    HashRecord::parse(record).is_none_or(|r| r.cost != COST)
}

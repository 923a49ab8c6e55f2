use std::fmt;

use rand_core::{OsRng, RngCore};

use crate::error::KeyError;
use crate::types::TimestampMillis;

// --- Secret key -------------------------------------------------------------

/// Length of keys produced by [`SecretKey::generate`].
pub const GENERATED_KEY_LEN: usize = 32;

/// Process-wide MAC key. Created once at startup and only read afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Wraps raw key bytes. Empty keys are rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(SecretKey(bytes))
    }

    /// Uses the UTF-8 bytes of `passphrase` as the key, the way deployments
    /// configure `DOWNLOAD_LINK_SECRET`.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, KeyError> {
        Self::new(passphrase.as_bytes())
    }

    /// Draws a fresh key from the OS CSPRNG.
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = vec![0u8; GENERATED_KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| KeyError::Entropy(e.to_string()))?;
        Ok(SecretKey(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(<{} bytes redacted>)", self.0.len())
    }
}

// --- Token ------------------------------------------------------------------

/// Decoded form of a download token. Never persisted: the encoded string is
/// self-describing and verified on the fly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub resource_id: String,
    pub principal: String,
    pub issued_at: TimestampMillis,
    /// Raw MAC tag over `resource_id|principal|issued_at`.
    pub signature: Vec<u8>,
}

/// What a valid token grants. Handlers use it for auditing only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Grant {
    pub resource_id: String,
    pub principal: String,
    pub issued_at: TimestampMillis,
}

impl From<AccessToken> for Grant {
    fn from(token: AccessToken) -> Self {
        Grant {
            resource_id: token.resource_id,
            principal: token.principal,
            issued_at: token.issued_at,
        }
    }
}

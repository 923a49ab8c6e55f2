//!
//! `MacProvider` for the FIPS suite: HMAC-SHA3-256.

use hmac::{Hmac, Mac};
use sha3::Sha3_256;

use super::{CryptoError, MacProvider};
use crate::primitives::SecretKey;
use crate::types::MacSuite;

type HmacSha3_256 = Hmac<Sha3_256>;

/// HMAC-SHA3-256 provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct FipsMacProvider;

impl MacProvider for FipsMacProvider {
    fn suite(&self) -> MacSuite {
        MacSuite::FIPS
    }

    fn compute(&self, key: &SecretKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut mac = HmacSha3_256::new_from_slice(key.as_bytes())
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

//!
//! `MacProvider` for the CLASSIC suite: HMAC-SHA-256.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{CryptoError, MacProvider};
use crate::primitives::SecretKey;
use crate::types::MacSuite;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA-256 provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassicMacProvider;

impl MacProvider for ClassicMacProvider {
    fn suite(&self) -> MacSuite {
        MacSuite::CLASSIC
    }

    fn compute(&self, key: &SecretKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4231_case_2() {
        let key = SecretKey::from_passphrase("Jefe").unwrap();
        let tag = ClassicMacProvider
            .compute(&key, b"what do ya want for nothing?")
            .unwrap();
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_classic_verify_tampered_data() {
        let key = SecretKey::from_passphrase("k").unwrap();
        let tag = ClassicMacProvider.compute(&key, b"message").unwrap();
        assert!(ClassicMacProvider.verify(&key, b"message", &tag).is_ok());
        assert_eq!(
            ClassicMacProvider.verify(&key, b"messagf", &tag),
            Err(CryptoError::TagMismatch)
        );
    }

    #[test]
    fn test_classic_verify_wrong_key() {
        let key1 = SecretKey::from_passphrase("key-one").unwrap();
        let key2 = SecretKey::from_passphrase("key-two").unwrap();
        let tag = ClassicMacProvider.compute(&key1, b"message").unwrap();
        assert!(ClassicMacProvider.verify(&key2, b"message", &tag).is_err());
    }

    #[test]
    fn test_long_key_is_accepted() {
        let key = SecretKey::new(vec![7u8; 200]).unwrap();
        let tag = ClassicMacProvider.compute(&key, b"data").unwrap();
        assert_eq!(tag.len(), MacSuite::CLASSIC.tag_len());
    }
}

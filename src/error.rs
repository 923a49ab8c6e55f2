//!
//! Defines error types for token issuance, verification, configuration and
//! checkout validation.

use crate::crypto::CryptoError;

/// Errors raised while minting a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MintError {
    /// A payload field was empty.
    #[error("Token field `{0}` must not be empty")]
    EmptyField(&'static str),
    /// A payload field contained the reserved field separator.
    #[error("Token field `{0}` must not contain the field separator")]
    ForbiddenSeparator(&'static str),
    /// Computing the MAC failed.
    #[error("Cryptographic operation failed: {0}")]
    Crypto(#[from] CryptoError),
}

/// Why a token was rejected. Only used for diagnostics; callers of
/// [`crate::token::TokenAuthority::verify`] receive [`InvalidToken`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// Bad encoding, wrong field count, or a non-numeric timestamp.
    #[error("Malformed token: {0}")]
    MalformedToken(&'static str),
    /// The signature does not match the payload under the current key.
    #[error("Token signature mismatch")]
    SignatureMismatch,
    /// The token is older than the validity window.
    #[error("Token has expired")]
    Expired,
    /// The token claims to be issued after the verification time.
    #[error("Token issued in the future")]
    FutureTimestamp,
}

/// The single outcome exposed for any rejected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid or expired access token")]
pub struct InvalidToken;

impl From<RejectReason> for InvalidToken {
    fn from(_: RejectReason) -> Self {
        InvalidToken
    }
}

/// Errors raised when constructing a secret key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("Secret key must not be empty")]
    Empty,
    #[error("Failed to gather randomness for secret key: {0}")]
    Entropy(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for `{key}`: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Missing configuration value `{0}`")]
    Missing(&'static str),
    #[error("Invalid secret key: {0}")]
    Key(#[from] KeyError),
}

/// Errors raised while validating a checkout order form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("Missing required fields: {0}")]
    MissingFields(String),
    #[error("Invalid CPF")]
    InvalidCpf,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid amount")]
    InvalidAmount,
}

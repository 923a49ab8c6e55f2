//!
//! Signed, expiring download tokens.
//!
//! A token binds a resource identifier and a principal to its issuance time
//! under a keyed hash. Verification needs no stored state: the key, the clock
//! and the validity window are all it consults. Any failure surfaces as
//! [`InvalidToken`]; the precise [`RejectReason`] is only logged.

use crate::codec;
use crate::crypto::{ClassicMacProvider, MacProvider};
use crate::error::{InvalidToken, MintError, RejectReason};
use crate::primitives::{Grant, SecretKey};
use crate::time::{Clock, SystemClock};
use crate::types::{TimestampMillis, DEFAULT_MAX_AGE_MILLIS};

/// Owns the process-wide key and policy for issuing and checking tokens.
///
/// All state is fixed at construction, so one authority can be shared by
/// every request handler (for example behind an `Arc`).
#[derive(Debug)]
pub struct TokenAuthority<M: MacProvider, C: Clock = SystemClock> {
    key: SecretKey,
    mac: M,
    clock: C,
    max_age_millis: u64,
}

impl<M: MacProvider> TokenAuthority<M, SystemClock> {
    /// Creates an authority reading the system clock, with the default 7 day window.
    pub fn new(key: SecretKey, mac: M) -> Self {
        TokenAuthority::with_clock(key, mac, SystemClock)
    }
}

impl<M: MacProvider, C: Clock> TokenAuthority<M, C> {
    pub fn with_clock(key: SecretKey, mac: M, clock: C) -> Self {
        TokenAuthority {
            key,
            mac,
            clock,
            max_age_millis: DEFAULT_MAX_AGE_MILLIS,
        }
    }

    /// Overrides the validity window.
    pub fn with_max_age(mut self, max_age_millis: u64) -> Self {
        self.max_age_millis = max_age_millis;
        self
    }

    pub fn max_age_millis(&self) -> u64 {
        self.max_age_millis
    }

    pub fn mac(&self) -> &M {
        &self.mac
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mints a token issued now.
    pub fn mint(&self, resource_id: &str, principal: &str) -> Result<String, MintError> {
        self.mint_at(resource_id, principal, self.clock.now_millis())
    }

    /// Mints a token issued at `now`.
    pub fn mint_at(
        &self,
        resource_id: &str,
        principal: &str,
        now: TimestampMillis,
    ) -> Result<String, MintError> {
        let payload = codec::encode_payload(resource_id, principal, now)?;
        let tag = self.mac.compute(&self.key, payload.as_bytes())?;
        tracing::debug!(
            resource_id,
            issued_at = now,
            suite = %self.mac.suite(),
            "minted download token"
        );
        Ok(codec::encode_token(&payload, &tag))
    }

    /// Verifies a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Grant, InvalidToken> {
        self.verify_at(token, self.clock.now_millis())
    }

    /// Verifies a token as of `now`. The rejection reason is logged, never returned.
    pub fn verify_at(&self, token: &str, now: TimestampMillis) -> Result<Grant, InvalidToken> {
        self.inspect_at(token, now).map_err(|reason| {
            tracing::debug!(%reason, "rejected download token");
            InvalidToken::from(reason)
        })
    }

    /// Like [`verify_at`](Self::verify_at) but reports why a token failed.
    /// Meant for operator diagnostics; do not forward the reason to clients.
    pub fn inspect_at(&self, token: &str, now: TimestampMillis) -> Result<Grant, RejectReason> {
        let decoded = codec::decode_token(token, self.mac.suite().tag_len())?;

        self.mac
            .verify(&self.key, decoded.signed_payload.as_bytes(), &decoded.token.signature)
            .map_err(|_| RejectReason::SignatureMismatch)?;

        let issued_at = decoded.token.issued_at;
        if issued_at > now {
            return Err(RejectReason::FutureTimestamp);
        }
        if now - issued_at > self.max_age_millis {
            return Err(RejectReason::Expired);
        }
        Ok(Grant::from(decoded.token))
    }
}

/// Mints a CLASSIC (HMAC-SHA-256) token for `resource_id` and `principal`
/// issued at `now`.
pub fn mint(
    resource_id: &str,
    principal: &str,
    key: &SecretKey,
    now: TimestampMillis,
) -> Result<String, MintError> {
    let payload = codec::encode_payload(resource_id, principal, now)?;
    let tag = ClassicMacProvider.compute(key, payload.as_bytes())?;
    Ok(codec::encode_token(&payload, &tag))
}

/// Verifies a CLASSIC token as of `now` with the given validity window.
pub fn verify(
    token: &str,
    key: &SecretKey,
    now: TimestampMillis,
    max_age_millis: u64,
) -> Result<Grant, InvalidToken> {
    TokenAuthority::new(key.clone(), ClassicMacProvider)
        .with_max_age(max_age_millis)
        .verify_at(token, now)
}

#![no_main]

// Harness: verify_arbitrary – arbitrary text must never panic the verifier
// and must never be accepted without the signing key.

use libfuzzer_sys::fuzz_target;
use checkout_core::{verify, SecretKey};

fuzz_target!(|input: &str| {
    let Ok(key) = SecretKey::from_passphrase("fuzz-key") else { return };
    assert!(verify(input, &key, 1_700_000_000_000, u64::MAX).is_err());
});

#![no_main]

// Harness: mint_roundtrip – whatever mint accepts, verify must return unchanged.

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use checkout_core::{mint, verify, SecretKey};

#[derive(Arbitrary, Debug)]
struct Input {
    resource_id: String,
    principal: String,
    key: Vec<u8>,
    now: u64,
}

fuzz_target!(|input: Input| {
    let Ok(key) = SecretKey::new(input.key) else { return };
    let Ok(token) = mint(&input.resource_id, &input.principal, &key, input.now) else { return };
    let grant = verify(&token, &key, input.now, 0).expect("freshly minted token must verify");
    assert_eq!(grant.resource_id, input.resource_id);
    assert_eq!(grant.principal, input.principal);
});

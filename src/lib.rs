#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Checkout-Core: signed download links for a PIX checkout backend.
//!
//! The heart of the crate is a stateless bearer token binding an order
//! identifier and a customer e-mail to its issuance time under a keyed hash
//! (see [`token`]). Around it sit the pieces a checkout service needs to use
//! that token: key provisioning ([`config`]), the download redirect decision
//! ([`download`]), payment-webhook handling ([`webhook`]) and order-form
//! validation ([`checkout`]).

// Shared scalar types and constants (MacSuite, timestamps, separator).
pub mod types;

// Key, token and grant data structures.
pub mod primitives;

pub use primitives::*;

// MAC providers.
pub mod crypto;

// Token wire format.
pub mod codec;

// Wall-clock sources.
pub mod time;

pub mod error;

// Token minting and verification.
pub mod token;

pub use token::{mint, verify, TokenAuthority};

pub mod config;

pub mod download;

pub mod webhook;

pub mod checkout;

pub mod telemetry;

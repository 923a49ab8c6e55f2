//!
//! Shared scalar types and constants used across the token, crypto and
//! configuration modules.

use std::fmt;
use std::str::FromStr;

/// Unix time in milliseconds.
pub type TimestampMillis = u64;

/// Field separator of the canonical token payload. Forbidden inside the
/// resource identifier and the principal.
pub const FIELD_SEPARATOR: char = '|';

/// Default validity window of a download token: 7 days.
pub const DEFAULT_MAX_AGE_MILLIS: u64 = 7 * 24 * 60 * 60 * 1000;

/// MAC suite used to authenticate token payloads.
/// The numeric tag is stable and may be stored in configuration.
#[allow(clippy::upper_case_acronyms)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum MacSuite {
    /// HMAC-SHA-256. Matches tokens issued by existing deployments.
    #[default]
    #[serde(rename = "hmac-sha256")]
    CLASSIC = 0,
    /// HMAC-SHA3-256.
    #[serde(rename = "hmac-sha3-256")]
    FIPS = 1,
}

impl MacSuite {
    /// Name used in configuration files and environment variables.
    pub fn as_str(self) -> &'static str {
        match self {
            MacSuite::CLASSIC => "hmac-sha256",
            MacSuite::FIPS => "hmac-sha3-256",
        }
    }

    /// Length in bytes of the tag produced by this suite.
    pub fn tag_len(self) -> usize {
        match self {
            MacSuite::CLASSIC | MacSuite::FIPS => 32,
        }
    }
}

impl fmt::Display for MacSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for MacSuite {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MacSuite::CLASSIC),
            1 => Ok(MacSuite::FIPS),
            _ => Err(format!("Invalid MacSuite tag: {}", value)),
        }
    }
}

impl FromStr for MacSuite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hmac-sha256" | "classic" => Ok(MacSuite::CLASSIC),
            "hmac-sha3-256" | "fips" => Ok(MacSuite::FIPS),
            other => Err(format!("Unknown MAC suite: {}", other)),
        }
    }
}

//!
//! Runtime configuration for the token authority and download links.
//!
//! Values come from the environment (`from_env`) or a JSON file
//! (`from_json_file`). Every field has a default, so an empty source yields
//! a working configuration with a freshly generated key.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::SuiteMacProvider;
use crate::download::drive_download_url;
use crate::error::ConfigError;
use crate::primitives::SecretKey;
use crate::token::TokenAuthority;
use crate::time::SystemClock;
use crate::types::{MacSuite, DEFAULT_MAX_AGE_MILLIS};

pub const ENV_SECRET: &str = "DOWNLOAD_LINK_SECRET";
pub const ENV_MAX_AGE: &str = "DOWNLOAD_LINK_MAX_AGE_MS";
pub const ENV_SUITE: &str = "DOWNLOAD_LINK_SUITE";
pub const ENV_BASE_URL: &str = "BASE_URL";
pub const ENV_DRIVE_FILE_ID: &str = "GOOGLE_DRIVE_FILE_ID";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

fn default_max_age() -> u64 {
    DEFAULT_MAX_AGE_MILLIS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorityConfig {
    /// Signing secret. A random key is generated when absent.
    pub secret: Option<String>,
    #[serde(default = "default_max_age")]
    pub max_age_millis: u64,
    pub suite: MacSuite,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub drive_file_id: Option<String>,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        AuthorityConfig {
            secret: None,
            max_age_millis: DEFAULT_MAX_AGE_MILLIS,
            suite: MacSuite::default(),
            base_url: default_base_url(),
            drive_file_id: None,
        }
    }
}

impl std::fmt::Debug for AuthorityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("max_age_millis", &self.max_age_millis)
            .field("suite", &self.suite)
            .field("base_url", &self.base_url)
            .field("drive_file_id", &self.drive_file_id)
            .finish()
    }
}

impl AuthorityConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads values through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AuthorityConfig::default();

        if let Some(secret) = lookup(ENV_SECRET) {
            if secret.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_SECRET,
                    value: "<empty>".into(),
                });
            }
            config.secret = Some(secret);
        }
        if let Some(raw) = lookup(ENV_MAX_AGE) {
            config.max_age_millis = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_MAX_AGE,
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = lookup(ENV_SUITE) {
            config.suite = raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_SUITE,
                    value: raw.clone(),
                })?;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }
        config.drive_file_id = lookup(ENV_DRIVE_FILE_ID).filter(|v| !v.trim().is_empty());

        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AuthorityConfig = serde_json::from_str(json)?;
        if matches!(config.secret.as_deref(), Some("")) {
            return Err(ConfigError::InvalidValue {
                key: "secret",
                value: "<empty>".into(),
            });
        }
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Resolves the signing key, generating one if none was configured.
    pub fn secret_key(&self) -> Result<SecretKey, ConfigError> {
        match &self.secret {
            Some(secret) => Ok(SecretKey::from_passphrase(secret)?),
            None => {
                tracing::warn!(
                    "{} not set; generated an ephemeral key, download links will not survive a restart",
                    ENV_SECRET
                );
                Ok(SecretKey::generate()?)
            }
        }
    }

    /// Builds the process-wide authority. Call once at startup.
    pub fn build_authority(
        &self,
    ) -> Result<TokenAuthority<SuiteMacProvider, SystemClock>, ConfigError> {
        let key = self.secret_key()?;
        tracing::info!(
            suite = %self.suite,
            max_age_millis = self.max_age_millis,
            "download token authority ready"
        );
        Ok(TokenAuthority::new(key, SuiteMacProvider::new(self.suite))
            .with_max_age(self.max_age_millis))
    }

    /// Location a valid download token redirects to.
    pub fn download_target(&self) -> Result<String, ConfigError> {
        self.drive_file_id
            .as_deref()
            .map(drive_download_url)
            .ok_or(ConfigError::Missing("drive_file_id"))
    }
}

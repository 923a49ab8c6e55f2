//! Token-gated download redirects.
//!
//! [`DownloadGate`] is what a `GET /download/:token` handler consults: a
//! valid token yields a redirect to the protected file, anything else a
//! plain 403. The gate never tells the caller why a token was refused.

use crate::crypto::MacProvider;
use crate::primitives::Grant;
use crate::time::Clock;
use crate::token::TokenAuthority;

/// Path prefix under which download tokens are served.
pub const DOWNLOAD_PATH: &str = "/download/";

/// Builds the link embedded in the payment confirmation e-mail.
pub fn download_link(base_url: &str, token: &str) -> String {
    format!("{}{}{}", base_url.trim_end_matches('/'), DOWNLOAD_PATH, token)
}

/// Direct-download URL of a Google Drive file.
pub fn drive_download_url(file_id: &str) -> String {
    format!("https://drive.google.com/uc?export=download&id={file_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadDecision {
    /// Send the client to `location`.
    Redirect { location: String, grant: Grant },
    /// Refuse the request.
    Forbidden,
}

impl DownloadDecision {
    /// HTTP status the handler should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            DownloadDecision::Redirect { .. } => 302,
            DownloadDecision::Forbidden => 403,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, DownloadDecision::Redirect { .. })
    }
}

#[derive(Debug)]
pub struct DownloadGate<'a, M: MacProvider, C: Clock> {
    authority: &'a TokenAuthority<M, C>,
    target: String,
}

impl<'a, M: MacProvider, C: Clock> DownloadGate<'a, M, C> {
    pub fn new(authority: &'a TokenAuthority<M, C>, target: impl Into<String>) -> Self {
        DownloadGate {
            authority,
            target: target.into(),
        }
    }

    pub fn resolve(&self, token: &str) -> DownloadDecision {
        match self.authority.verify(token) {
            Ok(grant) => {
                tracing::info!(
                    resource_id = %grant.resource_id,
                    principal = %grant.principal,
                    "download token accepted, redirecting"
                );
                DownloadDecision::Redirect { location: self.target.clone(), grant }
            }
            Err(_) => DownloadDecision::Forbidden,
        }
    }
}

//!
//! Payment confirmation: turning a gateway webhook into a download link.

use serde::{Deserialize, Serialize};

use crate::crypto::MacProvider;
use crate::download::download_link;
use crate::error::MintError;
use crate::time::Clock;
use crate::token::TokenAuthority;

/// Status the gateway reports for a settled PIX charge.
pub const PAID_STATUS: &str = "PAID";

/// Name used in the e-mail when the gateway knows none.
pub const FALLBACK_CUSTOMER_NAME: &str = "Cliente";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of the gateway's payment webhook. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
}

impl PaymentNotification {
    pub fn is_paid(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(PAID_STATUS))
    }
}

/// Everything the confirmation e-mail needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationLink {
    pub transaction_id: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub token: String,
    pub url: String,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Mints the download link for a paid transaction.
///
/// `looked_up` is the customer recorded on the transaction itself, consulted
/// when the notification omits a field. Returns `Ok(None)` when the payment
/// is not settled or no e-mail address is known.
pub fn confirm_payment<M: MacProvider, C: Clock>(
    authority: &TokenAuthority<M, C>,
    notification: &PaymentNotification,
    looked_up: Option<&CustomerRef>,
    base_url: &str,
) -> Result<Option<ConfirmationLink>, MintError> {
    if !notification.is_paid() {
        tracing::debug!(
            id = %notification.id,
            status = ?notification.status,
            "ignoring unpaid notification"
        );
        return Ok(None);
    }

    let from_notification = notification.customer.as_ref();
    let email = non_empty(from_notification.and_then(|c| c.email.as_ref()))
        .or_else(|| non_empty(looked_up.and_then(|c| c.email.as_ref())));
    let Some(email) = email else {
        tracing::warn!(id = %notification.id, "paid transaction has no customer e-mail");
        return Ok(None);
    };
    let name = non_empty(from_notification.and_then(|c| c.name.as_ref()))
        .or_else(|| non_empty(looked_up.and_then(|c| c.name.as_ref())))
        .unwrap_or(FALLBACK_CUSTOMER_NAME);

    let token = authority.mint(&notification.id, email)?;
    tracing::info!(id = %notification.id, "payment confirmed, download link issued");

    Ok(Some(ConfirmationLink {
        transaction_id: notification.id.clone(),
        recipient_name: name.to_string(),
        recipient_email: email.to_string(),
        url: download_link(base_url, &token),
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ClassicMacProvider;
    use crate::primitives::SecretKey;
    use crate::time::FixedClock;

    fn authority() -> TokenAuthority<ClassicMacProvider, FixedClock> {
        TokenAuthority::with_clock(
            SecretKey::from_passphrase("webhook").unwrap(),
            ClassicMacProvider,
            FixedClock::new(1_700_000_000_000),
        )
    }

    fn notification(json: &str) -> PaymentNotification {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn paid_status_is_case_insensitive() {
        assert!(notification(r#"{"id":"t","status":"paid"}"#).is_paid());
        assert!(notification(r#"{"id":"t","status":"PAID"}"#).is_paid());
        assert!(!notification(r#"{"id":"t","status":"WAITING_PAYMENT"}"#).is_paid());
        assert!(!notification(r#"{"id":"t"}"#).is_paid());
    }

    #[test]
    fn paid_notification_yields_verifiable_link() {
        let auth = authority();
        let n = notification(
            r#"{"id":"tx_55","status":"PAID","customer":{"name":"Maria","email":"maria@mail.com"},"amount":1990}"#,
        );
        let link = confirm_payment(&auth, &n, None, "https://shop.example").unwrap().unwrap();
        assert_eq!(link.recipient_name, "Maria");
        assert_eq!(link.recipient_email, "maria@mail.com");
        assert_eq!(link.url, format!("https://shop.example/download/{}", link.token));
        let grant = auth.verify(&link.token).unwrap();
        assert_eq!(grant.resource_id, "tx_55");
        assert_eq!(grant.principal, "maria@mail.com");
    }

    #[test]
    fn falls_back_to_transaction_customer_and_default_name() {
        let auth = authority();
        let n = notification(r#"{"id":"tx_56","status":"PAID"}"#);
        let looked_up = CustomerRef { name: None, email: Some("x@y.com".into()) };
        let link = confirm_payment(&auth, &n, Some(&looked_up), "http://localhost:3000")
            .unwrap()
            .unwrap();
        assert_eq!(link.recipient_email, "x@y.com");
        assert_eq!(link.recipient_name, FALLBACK_CUSTOMER_NAME);
    }

    #[test]
    fn unpaid_or_anonymous_payments_issue_nothing() {
        let auth = authority();
        let pending =
            notification(r#"{"id":"tx_1","status":"PENDING","customer":{"email":"a@b.co"}}"#);
        assert_eq!(confirm_payment(&auth, &pending, None, "http://x").unwrap(), None);
        let anonymous = notification(r#"{"id":"tx_1","status":"PAID","customer":{"email":"  "}}"#);
        assert_eq!(confirm_payment(&auth, &anonymous, None, "http://x").unwrap(), None);
    }

    #[test]
    fn separator_in_transaction_id_is_refused() {
        let auth = authority();
        let n = notification(r#"{"id":"tx|1","status":"PAID","customer":{"email":"a@b.co"}}"#);
        assert_eq!(
            confirm_payment(&auth, &n, None, "http://x"),
            Err(MintError::ForbiddenSeparator("resource_id"))
        );
    }
}

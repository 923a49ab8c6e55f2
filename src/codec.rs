//!
//! Wire format of download tokens.
//!
//! A token is `base64url_nopad(resource_id | principal | issued_at | hex(tag))`.
//! The MAC covers the first three fields exactly as they appear in the
//! decoded text.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{MintError, RejectReason};
use crate::primitives::AccessToken;
use crate::types::{TimestampMillis, FIELD_SEPARATOR};

/// Number of separator-joined fields in a decoded token.
pub const TOKEN_FIELDS: usize = 4;

/// A decoded token together with the exact text its signature covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub token: AccessToken,
    pub signed_payload: String,
}

fn check_field(name: &'static str, value: &str) -> Result<(), MintError> {
    if value.is_empty() {
        return Err(MintError::EmptyField(name));
    }
    if value.contains(FIELD_SEPARATOR) {
        return Err(MintError::ForbiddenSeparator(name));
    }
    Ok(())
}

/// Builds the canonical payload `resource_id|principal|issued_at`.
pub fn encode_payload(
    resource_id: &str,
    principal: &str,
    issued_at: TimestampMillis,
) -> Result<String, MintError> {
    check_field("resource_id", resource_id)?;
    check_field("principal", principal)?;
    Ok(format!(
        "{resource_id}{sep}{principal}{sep}{issued_at}",
        sep = FIELD_SEPARATOR
    ))
}

/// Appends the hex-encoded tag to `payload` and applies the URL-safe encoding.
pub fn encode_token(payload: &str, tag: &[u8]) -> String {
    let framed = format!("{payload}{FIELD_SEPARATOR}{}", hex::encode(tag));
    URL_SAFE_NO_PAD.encode(framed.as_bytes())
}

/// Parses a timestamp field. Only plain ASCII digits are accepted.
fn parse_timestamp(field: &str) -> Result<TimestampMillis, RejectReason> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RejectReason::MalformedToken("timestamp is not numeric"));
    }
    field
        .parse::<TimestampMillis>()
        .map_err(|_| RejectReason::MalformedToken("timestamp out of range"))
}

/// Parses the signature field. Only lowercase hex of `tag_len` bytes is accepted,
/// so every tag has exactly one textual form.
fn parse_signature(field: &str, tag_len: usize) -> Result<Vec<u8>, RejectReason> {
    let lowercase_hex = field.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    if field.len() != tag_len * 2 || !lowercase_hex {
        return Err(RejectReason::MalformedToken("signature is not lowercase hex"));
    }
    hex::decode(field).map_err(|_| RejectReason::MalformedToken("signature is not lowercase hex"))
}

/// Decodes a token string without checking its signature or age.
pub fn decode_token(encoded: &str, tag_len: usize) -> Result<DecodedToken, RejectReason> {
    if encoded.is_empty() {
        return Err(RejectReason::MalformedToken("empty token"));
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.as_bytes())
        .map_err(|_| RejectReason::MalformedToken("invalid base64url"))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| RejectReason::MalformedToken("payload is not UTF-8"))?;

    let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    let [resource_id, principal, issued_at, signature]: [&str; TOKEN_FIELDS] = fields
        .try_into()
        .map_err(|_| RejectReason::MalformedToken("wrong field count"))?;
    if resource_id.is_empty() || principal.is_empty() {
        return Err(RejectReason::MalformedToken("empty identifier"));
    }

    let issued_at_value = parse_timestamp(issued_at)?;
    let signature_bytes = parse_signature(signature, tag_len)?;

    // Everything before the last separator is the signed text.
    let signed_len = text.len() - signature.len() - FIELD_SEPARATOR.len_utf8();
    let signed_payload = text[..signed_len].to_string();

    Ok(DecodedToken {
        token: AccessToken {
            resource_id: resource_id.to_string(),
            principal: principal.to_string(),
            issued_at: issued_at_value,
            signature: signature_bytes,
        },
        signed_payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_layout() {
        let payload = encode_payload("tx_123", "joao@email.com", 1_700_000_000_000).unwrap();
        assert_eq!(payload, "tx_123|joao@email.com|1700000000000");
    }

    #[test]
    fn separator_in_fields_is_rejected() {
        assert_eq!(
            encode_payload("tx|1", "a@b.co", 1),
            Err(MintError::ForbiddenSeparator("resource_id"))
        );
        assert_eq!(
            encode_payload("tx", "a|b@c.co", 1),
            Err(MintError::ForbiddenSeparator("principal"))
        );
        assert_eq!(encode_payload("", "a@b.co", 1), Err(MintError::EmptyField("resource_id")));
        assert_eq!(encode_payload("tx", "", 1), Err(MintError::EmptyField("principal")));
    }

    #[test]
    fn encoded_token_is_url_safe() {
        let token = encode_token("tx_1|ü@exämple.com|42", &[0xFF; 32]);
        assert!(token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
    }

    #[test]
    fn decode_recovers_fields_and_signed_text() {
        let token = encode_token("tx_9|x@y.io|5", &[1u8; 32]);
        let decoded = decode_token(&token, 32).unwrap();
        assert_eq!(decoded.token.resource_id, "tx_9");
        assert_eq!(decoded.token.principal, "x@y.io");
        assert_eq!(decoded.token.issued_at, 5);
        assert_eq!(decoded.token.signature, vec![1u8; 32]);
        assert_eq!(decoded.signed_payload, "tx_9|x@y.io|5");
    }

    #[test]
    fn decode_rejects_bad_shapes() {
        let two_fields = URL_SAFE_NO_PAD.encode("tx_1|a@b.co");
        let five_fields = encode_token("tx_1|a@b.co|1|extra", &[0u8; 32]);
        let signed_number = encode_token("tx_1|a@b.co|+1", &[0u8; 32]);
        let short_sig = encode_token("tx_1|a@b.co|1", &[0u8; 16]);

        for bad in [
            "",
            "!!!",
            "a",
            two_fields.as_str(),
            five_fields.as_str(),
            signed_number.as_str(),
            short_sig.as_str(),
        ] {
            assert!(
                matches!(decode_token(bad, 32), Err(RejectReason::MalformedToken(_))),
                "expected malformed for {bad:?}"
            );
        }
    }

    #[test]
    fn decode_requires_exactly_four_fields() {
        for field_count in 1..=TOKEN_FIELDS + 2 {
            let text = vec!["1"; field_count].join("|");
            let result = decode_token(&URL_SAFE_NO_PAD.encode(text), 32);
            assert_eq!(
                result.err(),
                if field_count == TOKEN_FIELDS {
                    Some(RejectReason::MalformedToken("signature is not lowercase hex"))
                } else {
                    Some(RejectReason::MalformedToken("wrong field count"))
                },
                "{field_count} fields"
            );
        }
    }

    #[test]
    fn decode_rejects_uppercase_signature() {
        let text = format!("tx_1|a@b.co|1|{}", "AB".repeat(32));
        let token = URL_SAFE_NO_PAD.encode(text);
        assert!(decode_token(&token, 32).is_err());
    }

    #[test]
    fn decode_rejects_padded_input() {
        let token = encode_token("tx_1|a@b.co|1", &[0u8; 32]);
        assert!(decode_token(&format!("{token}="), 32).is_err());
    }
}

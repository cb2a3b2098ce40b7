//! Unverified JWT payload decoding.
//!
//! The client never holds the signing key, so the payload is only read for
//! its expiration and subject claims. Anything that can't be decoded is
//! treated as expired.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has no payload segment")]
    MissingPayload,

    #[error("Token payload is not valid base64url: {0}")]
    InvalidEncoding(String),

    #[error("Token payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Token payload has no expiration claim")]
    MissingExpiration,
}

/// Claims the client cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Expiration, whole seconds since the Unix epoch.
    pub exp: i64,
    /// Expiration instant in milliseconds, keeping any fractional second.
    pub exp_ms: i64,
    pub subject: Option<String>,
}

impl TokenClaims {
    /// Expiration instant in milliseconds since the epoch.
    pub fn expires_at_ms(&self) -> i64 {
        self.exp_ms
    }

    /// Expired when `now_ms` has reached the expiration instant.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms()
    }
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    exp: Option<f64>,
    sub: Option<serde_json::Value>,
    user_id: Option<serde_json::Value>,
}

fn claim_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode the payload segment of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(TokenError::MissingPayload)?;

    // Issuers disagree on padding; strip it and decode unpadded
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::InvalidEncoding(e.to_string()))?;

    let raw: RawClaims =
        serde_json::from_slice(&bytes).map_err(|e| TokenError::InvalidJson(e.to_string()))?;

    let exp = raw
        .exp
        .filter(|exp| exp.is_finite())
        .ok_or(TokenError::MissingExpiration)?;

    let subject = raw
        .sub
        .and_then(claim_to_string)
        .or_else(|| raw.user_id.and_then(claim_to_string));

    // Smallest whole millisecond at or past exp * 1000
    Ok(TokenClaims {
        exp: exp.floor() as i64,
        exp_ms: (exp * 1000.0).ceil() as i64,
        subject,
    })
}

/// Fail-closed expiry check: undecodable tokens count as expired.
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.is_expired_at(now_ms),
        Err(_) => true,
    }
}

/// Build an unsigned token carrying the given payload. Test helper.
#[cfg(test)]
pub(crate) fn make_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_claims_reads_exp_and_sub() {
        let token = make_token(&json!({"exp": 1_700_000_000, "sub": "user-42"}));
        let claims = decode_claims(&token).expect("token should decode");
        assert_eq!(claims.exp, 1_700_000_000);
        assert_eq!(claims.subject.as_deref(), Some("user-42"));
    }

    #[test]
    fn test_decode_claims_falls_back_to_user_id() {
        let token = make_token(&json!({"exp": 10, "user_id": 7}));
        let claims = decode_claims(&token).expect("token should decode");
        assert_eq!(claims.subject.as_deref(), Some("7"));
    }

    #[test]
    fn test_decode_claims_accepts_padded_payload() {
        let body = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp": 5}"#);
        assert!(body.ends_with('='));
        let token = format!("h.{}.s", body);
        assert_eq!(decode_claims(&token).map(|c| c.exp), Ok(5));
    }

    #[test]
    fn test_decode_claims_rejects_malformed() {
        assert_eq!(decode_claims("not-a-jwt"), Err(TokenError::MissingPayload));
        assert_eq!(decode_claims("a..c"), Err(TokenError::MissingPayload));
        assert!(matches!(
            decode_claims("a.!!!.c"),
            Err(TokenError::InvalidEncoding(_))
        ));

        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("hello"));
        assert!(matches!(decode_claims(&not_json), Err(TokenError::InvalidJson(_))));

        let no_exp = make_token(&json!({"sub": "x"}));
        assert_eq!(decode_claims(&no_exp), Err(TokenError::MissingExpiration));

        let string_exp = make_token(&json!({"exp": "soon"}));
        assert!(matches!(decode_claims(&string_exp), Err(TokenError::InvalidJson(_))));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let token = make_token(&json!({"exp": 100}));
        assert!(!is_expired_at(&token, 99_999));
        assert!(is_expired_at(&token, 100_000));
        assert!(is_expired_at(&token, 100_001));
    }

    #[test]
    fn test_fractional_exp_keeps_milliseconds() {
        let token = make_token(&json!({"exp": 100.5}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, 100);
        assert_eq!(claims.expires_at_ms(), 100_500);
        assert!(!is_expired_at(&token, 100_499));
        assert!(is_expired_at(&token, 100_500));
    }

    #[test]
    fn test_two_segment_token_has_payload() {
        let token = format!("h.{}", URL_SAFE_NO_PAD.encode(r#"{"exp":1}"#));
        assert_eq!(decode_claims(&token).map(|c| c.exp), Ok(1));
        assert_eq!(
            TokenError::MissingPayload.to_string(),
            "Token has no payload segment"
        );
    }

    #[test]
    fn test_malformed_token_is_expired() {
        assert!(is_expired_at("not-a-jwt", 0));
        assert!(is_expired_at("", 0));
    }
}

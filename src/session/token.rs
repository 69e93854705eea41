//! Token validity
//!
//! Decides whether a stored access token may be used. Tokens are treated
//! as opaque unless they carry a decodable JWT payload with an `exp`
//! claim, in which case the expiry policy can reject them.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Values a front end may have written in place of a missing token
const PLACEHOLDERS: &[&str] = &["undefined", "null"];

/// How strictly stored tokens are judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPolicy {
    /// Any non-empty, non-placeholder token is accepted
    Presence,
    /// Like `Presence`, but tokens whose `exp` claim has passed are rejected
    #[default]
    Expiry,
}

impl FromStr for TokenPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "presence" => Ok(TokenPolicy::Presence),
            "expiry" => Ok(TokenPolicy::Expiry),
            other => Err(format!("unknown token policy: {other}")),
        }
    }
}

impl fmt::Display for TokenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPolicy::Presence => f.write_str("presence"),
            TokenPolicy::Expiry => f.write_str("expiry"),
        }
    }
}

/// Result of inspecting a stored token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Missing,
    Placeholder,
    Expired { at: DateTime<Utc> },
    Valid { expires_at: Option<DateTime<Utc>> },
}

impl TokenStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid { .. })
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStatus::Missing => f.write_str("no token"),
            TokenStatus::Placeholder => f.write_str("placeholder token"),
            TokenStatus::Expired { at } => write!(f, "expired at {}", at.to_rfc3339()),
            TokenStatus::Valid { expires_at: Some(at) } => {
                write!(f, "valid until {}", at.to_rfc3339())
            }
            TokenStatus::Valid { expires_at: None } => f.write_str("valid"),
        }
    }
}

/// Inspect a token under the given policy at time `now`
pub fn inspect(token: Option<&str>, policy: TokenPolicy, now: DateTime<Utc>) -> TokenStatus {
    let token = match token.map(str::trim) {
        None | Some("") => return TokenStatus::Missing,
        Some(t) => t,
    };

    if PLACEHOLDERS.contains(&token) {
        return TokenStatus::Placeholder;
    }

    let expires_at = decode_expiry(token);
    match (policy, expires_at) {
        (TokenPolicy::Expiry, Some(at)) if at <= now => TokenStatus::Expired { at },
        _ => TokenStatus::Valid { expires_at },
    }
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying its signature
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp?, 0)
}

#[cfg(test)]
pub(crate) fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"token_type":"access","exp":{exp},"user_id":1}}"#));
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_missing_and_placeholder() {
        let now = Utc::now();
        assert_eq!(inspect(None, TokenPolicy::Expiry, now), TokenStatus::Missing);
        assert_eq!(inspect(Some(""), TokenPolicy::Expiry, now), TokenStatus::Missing);
        assert_eq!(inspect(Some("  "), TokenPolicy::Presence, now), TokenStatus::Missing);
        assert_eq!(
            inspect(Some("undefined"), TokenPolicy::Presence, now),
            TokenStatus::Placeholder
        );
        assert_eq!(inspect(Some("null"), TokenPolicy::Expiry, now), TokenStatus::Placeholder);
    }

    #[test]
    fn test_opaque_token_is_valid() {
        let status = inspect(Some("abc123"), TokenPolicy::Expiry, Utc::now());
        assert_eq!(status, TokenStatus::Valid { expires_at: None });
    }

    #[test]
    fn test_expired_jwt() {
        let now = Utc::now();
        let token = jwt_with_exp((now - Duration::minutes(5)).timestamp());

        assert!(matches!(
            inspect(Some(&token), TokenPolicy::Expiry, now),
            TokenStatus::Expired { .. }
        ));
        // Presence-only policy still accepts it
        assert!(inspect(Some(&token), TokenPolicy::Presence, now).is_valid());
    }

    #[test]
    fn test_live_jwt() {
        let now = Utc::now();
        let exp = (now + Duration::hours(1)).timestamp();
        let token = jwt_with_exp(exp);

        let status = inspect(Some(&token), TokenPolicy::Expiry, now);
        assert_eq!(
            status,
            TokenStatus::Valid {
                expires_at: DateTime::from_timestamp(exp, 0)
            }
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode_expiry("a.b"), None);
        assert_eq!(decode_expiry("a.!!!.c"), None);
        assert_eq!(decode_expiry("a.b.c.d"), None);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Expiry".parse::<TokenPolicy>().unwrap(), TokenPolicy::Expiry);
        assert_eq!("presence".parse::<TokenPolicy>().unwrap(), TokenPolicy::Presence);
        assert!("later".parse::<TokenPolicy>().is_err());
    }
}

//! Structural JWT decoding and the expiry policy.
//!
//! The backend issues HS256 tokens; the client only ever *reads* the claims
//! it already received over a trusted channel, so no signature verification
//! happens here. A token that cannot be decoded is treated the same as an
//! expired one everywhere in the crate.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Clock skew tolerance between client and issuer in milliseconds.
/// A token is treated as unusable this long before its literal deadline so
/// a request never races the exact expiry instant.
pub const CLOCK_SKEW_MS: i64 = 5000;

/// Claims decoded from the payload segment of a bearer token.
///
/// `exp` and `iat` are seconds since the Unix epoch. Only produced by
/// [`decode_token`]; never constructed by hand outside of tests.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("token is not a three-segment JWT")]
    Malformed,

    #[error("payload segment is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("payload is not a valid claims object: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Decode the claims of a bearer token without verifying its signature.
///
/// The input must have exactly three dot-separated segments; the middle
/// segment is base64url-decoded and parsed as JSON. Never panics.
pub fn decode_token(raw: &str) -> Result<TokenClaims, ClaimsError> {
    let mut segments = raw.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(ClaimsError::Malformed),
    };

    // Some issuers pad the segment even though RFC 7515 says not to
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl TokenClaims {
    /// Whether the token is past its usable lifetime at `now`.
    ///
    /// A missing `exp` claim always counts as expired; the boundary at
    /// `exp - CLOCK_SKEW_MS` is inclusive.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.exp {
            Some(exp) => {
                // Saturate: far-future sentinel exps would overflow the multiply
                now.timestamp_millis() >= exp.saturating_mul(1000).saturating_sub(CLOCK_SKEW_MS)
            }
            None => true,
        }
    }
}

/// Expiry check straight from the raw token string.
/// A token that fails to decode counts as expired.
pub fn token_expired(raw: &str, now: DateTime<Utc>) -> bool {
    match decode_token(raw) {
        Ok(claims) => claims.is_expired(now),
        Err(e) => {
            debug!(error = %e, "undecodable token treated as expired");
            true
        }
    }
}

/// Time remaining until the token's literal deadline, clamped to zero.
/// Returns zero for undecodable tokens and tokens without an `exp` claim.
pub fn expires_in(raw: &str, now: DateTime<Utc>) -> Duration {
    let exp = match decode_token(raw) {
        Ok(TokenClaims { exp: Some(exp), .. }) => exp,
        _ => return Duration::zero(),
    };
    let remaining = exp
        .saturating_mul(1000)
        .saturating_sub(now.timestamp_millis());
    Duration::milliseconds(remaining).max(Duration::zero())
}

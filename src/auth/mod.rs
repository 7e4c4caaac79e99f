use std::collections::HashSet;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// The only access-token claim this service looks at.
///
/// Tokens are minted by the identity service; everything else they carry is
/// only meaningful to the backend's row-level security and is not parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    Expired,
}

/// Pull the credential out of an `Authorization: <scheme> <token>` header.
///
/// The scheme word is not checked; the token is whatever follows the first
/// space, up to the next one.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.split(' ').nth(1).map(str::to_string)
}

/// Decode claims WITHOUT verifying the signature.
///
/// The backend re-authorizes every call with the same token, so this decode
/// only exists to reject stale tokens early. Do not use the result for any
/// authorization decision.
pub fn decode_unverified(token: &str) -> Option<Claims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

/// Local expiry check run before any data operation.
pub fn token_status(token: Option<&str>) -> TokenStatus {
    let Some(claims) = token.and_then(decode_unverified) else {
        return TokenStatus::Expired;
    };

    let now = Utc::now().timestamp_millis() as f64 / 1000.0;
    match claims.exp {
        Some(exp) if exp < now => TokenStatus::Expired,
        // A token without `exp` is left for the backend to judge
        _ => TokenStatus::Valid,
    }
}

//! Signed caller tokens carried in the `Authorization` header.
//!
//! Header form: `Signature <pubkey_hex>:<unix_secs>:<sig_hex>`. The signature
//! covers `linkshelf-caller-v1:<pubkey_hex>:<unix_secs>`.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::constants::{AUTH_CONTEXT, AUTH_SCHEME};
use crate::error::AuthError;
use crate::types::Principal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerToken {
    pub principal: Principal,
    pub issued_at: i64,
    pub signature: [u8; 64],
}

impl CallerToken {
    /// Bytes the caller signs.
    pub fn payload(principal: &Principal, issued_at: i64) -> String {
        format!("{AUTH_CONTEXT}:{}:{issued_at}", principal.to_hex())
    }

    pub fn to_header_value(&self) -> String {
        format!(
            "{AUTH_SCHEME} {}:{}:{}",
            self.principal.to_hex(),
            self.issued_at,
            hex::encode(self.signature)
        )
    }

    pub fn parse_header_value(value: &str) -> Result<Self, AuthError> {
        let (scheme, rest) = value
            .trim()
            .split_once(' ')
            .ok_or(AuthError::Malformed)?;
        if scheme != AUTH_SCHEME {
            return Err(AuthError::UnsupportedScheme);
        }

        let mut parts = rest.trim().split(':');
        let (Some(key_hex), Some(ts), Some(sig_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::Malformed);
        };

        let principal = Principal::from_hex(key_hex).map_err(|_| AuthError::InvalidKey)?;
        let issued_at = ts.parse::<i64>().map_err(|_| AuthError::Malformed)?;
        let mut signature = [0u8; 64];
        hex::decode_to_slice(sig_hex, &mut signature).map_err(|_| AuthError::InvalidSignature)?;

        Ok(Self {
            principal,
            issued_at,
            signature,
        })
    }

    /// Check the signature and that `issued_at` lies within `max_skew_secs`
    /// of `now` (unix seconds), in either direction.
    pub fn verify(&self, now: i64, max_skew_secs: i64) -> Result<Principal, AuthError> {
        if now.abs_diff(self.issued_at) > max_skew_secs.unsigned_abs() {
            return Err(AuthError::Expired);
        }

        let verifying_key =
            VerifyingKey::from_bytes(&self.principal.0).map_err(|_| AuthError::InvalidKey)?;
        let signature = Signature::from_bytes(&self.signature);
        let payload = Self::payload(&self.principal, self.issued_at);

        verifying_key
            .verify(payload.as_bytes(), &signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        Ok(self.principal)
    }
}

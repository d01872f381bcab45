use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use crate::auth::CallerToken;
use crate::types::Principal;

/// A caller's identity based on Ed25519.
/// The public key is the principal. No email, no password.
#[derive(Clone)]
pub struct Identity {
    signing_key: SigningKey,
}

impl Identity {
    /// Generate a new random identity
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Restore identity from secret key bytes
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(secret);
        Self { signing_key }
    }

    /// Restore identity from a hex-encoded secret key
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, hex::FromHexError> {
        let mut secret = [0u8; 32];
        hex::decode_to_slice(secret_hex.trim(), &mut secret)?;
        Ok(Self::from_secret_bytes(&secret))
    }

    pub fn principal(&self) -> Principal {
        Principal(self.signing_key.verifying_key().to_bytes())
    }

    /// Get the raw secret key bytes
    pub fn secret_bytes(&self) -> &[u8; 32] {
        self.signing_key.as_bytes()
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.as_bytes())
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Get the verifying (public) key
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Issue a caller token stamped with `issued_at` (unix seconds).
    pub fn caller_token(&self, issued_at: i64) -> CallerToken {
        let principal = self.principal();
        let signature = self.sign(CallerToken::payload(&principal, issued_at).as_bytes());
        CallerToken {
            principal,
            issued_at,
            signature: signature.to_bytes(),
        }
    }

    /// Caller token for the current time.
    pub fn caller_token_now(&self) -> CallerToken {
        self.caller_token(chrono::Utc::now().timestamp())
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("principal", &self.principal().to_hex())
            .finish_non_exhaustive()
    }
}

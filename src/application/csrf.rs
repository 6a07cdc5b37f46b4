//! Signed, expiring form tokens guarding state-changing POSTs.
//!
//! A token reads `<issued_unix>.<nonce>.<signature>` where the signature is
//! `hex(sha256(secret | issued | nonce))`. Tokens are stateless: any token
//! signed with the current secret and younger than the TTL is accepted.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

pub const CSRF_TOKEN_TTL: Duration = Duration::hours(1);
const MAX_CLOCK_SKEW: Duration = Duration::minutes(1);
const NONCE_LEN: usize = 32;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CsrfError {
    #[error("The CSRF token is missing.")]
    Missing,
    #[error("The CSRF token is invalid.")]
    Invalid,
    #[error("The CSRF token has expired.")]
    Expired,
}

#[derive(Clone)]
pub struct CsrfGuard {
    secret: Vec<u8>,
}

impl CsrfGuard {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into().into_bytes(),
        }
    }

    /// Guard keyed with a random secret; tokens do not survive a restart.
    pub fn ephemeral() -> Self {
        Self::new(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    pub fn issue(&self) -> String {
        self.issue_at(OffsetDateTime::now_utc())
    }

    pub fn verify(&self, token: &str) -> Result<(), CsrfError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    fn issue_at(&self, now: OffsetDateTime) -> String {
        let issued = now.unix_timestamp();
        let nonce = Uuid::new_v4().simple().to_string();
        let signature = hex::encode(self.signature(issued, &nonce));
        format!("{issued}.{nonce}.{signature}")
    }

    fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<(), CsrfError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CsrfError::Missing);
        }

        let mut parts = token.splitn(3, '.');
        let (Some(issued), Some(nonce), Some(signature)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CsrfError::Invalid);
        };

        let issued: i64 = issued.parse().map_err(|_| CsrfError::Invalid)?;
        if nonce.len() != NONCE_LEN || !nonce.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CsrfError::Invalid);
        }
        let provided = hex::decode(signature).map_err(|_| CsrfError::Invalid)?;

        let expected = self.signature(issued, nonce);
        if expected.ct_eq(&provided).unwrap_u8() == 0 {
            return Err(CsrfError::Invalid);
        }

        let issued_at = OffsetDateTime::from_unix_timestamp(issued).map_err(|_| CsrfError::Invalid)?;
        if issued_at - now > MAX_CLOCK_SKEW {
            return Err(CsrfError::Invalid);
        }
        if now - issued_at > CSRF_TOKEN_TTL {
            return Err(CsrfError::Expired);
        }

        Ok(())
    }

    fn signature(&self, issued: i64, nonce: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(b"|");
        hasher.update(issued.to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(nonce.as_bytes());
        hasher.finalize().to_vec()
    }
}

//! One-time registration verification codes.
//!
//! The core consumes a [`CodeStore`] capability keyed by normalized email.
//! Only the SHA-256 digest of a code is stored. Issuing a new code for the
//! same email overwrites the previous one, and every code also expires on
//! its own after the configured TTL.

use std::collections::HashMap;
use std::future::Future;

use accredit_core::error::{AccreditError, AccreditResult};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::WorkflowConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCode {
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

pub trait CodeStore: Send + Sync {
    /// Stores `code` under `key`, replacing any existing entry.
    fn put(&self, key: &str, code: StoredCode) -> impl Future<Output = AccreditResult<()>> + Send;
    fn get(&self, key: &str) -> impl Future<Output = AccreditResult<Option<StoredCode>>> + Send;
    fn delete(&self, key: &str) -> impl Future<Output = AccreditResult<()>> + Send;
}

/// Process-local [`CodeStore`].
#[derive(Debug, Default)]
pub struct MemoryCodeStore {
    codes: RwLock<HashMap<String, StoredCode>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeStore for MemoryCodeStore {
    async fn put(&self, key: &str, code: StoredCode) -> AccreditResult<()> {
        self.codes.write().await.insert(key.to_string(), code);
        Ok(())
    }

    async fn get(&self, key: &str) -> AccreditResult<Option<StoredCode>> {
        Ok(self.codes.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> AccreditResult<()> {
        self.codes.write().await.remove(key);
        Ok(())
    }
}

fn digest(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

fn key(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct VerificationCodes<S: CodeStore> {
    store: S,
    ttl: Duration,
}

impl<S: CodeStore> VerificationCodes<S> {
    /// Fails with a validation error when `verification_code_ttl_secs`
    /// cannot be represented as an expiry timestamp.
    pub fn new(store: S, config: &WorkflowConfig) -> AccreditResult<Self> {
        let secs = config.verification_code_ttl_secs;
        let ttl = i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                AccreditError::validation(format!(
                    "verification_code_ttl_secs {secs} is out of range"
                ))
            })?;
        Ok(Self { store, ttl })
    }

    /// Issue a fresh six-digit code for `email`. The plaintext code is
    /// returned for delivery and never stored.
    pub async fn issue(&self, email: &str) -> AccreditResult<String> {
        let code = format!("{:06}", rand::rng().random_range(0..1_000_000u32));
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AccreditError::Internal("verification code expiry overflowed".into()))?;
        self.store
            .put(
                &key(email),
                StoredCode {
                    digest: digest(&code),
                    expires_at,
                },
            )
            .await?;
        debug!(email = %key(email), "Verification code issued");
        Ok(code)
    }

    /// Check `code` for `email`, consuming it on success.
    pub async fn verify(&self, email: &str, code: &str) -> AccreditResult<bool> {
        let key = key(email);
        let Some(stored) = self.store.get(&key).await? else {
            return Ok(false);
        };

        if stored.expires_at <= Utc::now() {
            self.store.delete(&key).await?;
            return Ok(false);
        }

        if stored.digest != digest(code.trim()) {
            return Ok(false);
        }

        self.store.delete(&key).await?;
        Ok(true)
    }
}

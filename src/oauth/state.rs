//! Server-held OAuth state nonces
//!
//! The raw `state` parameter is an opaque routing hint and must not be
//! trusted as-is. Sign-in registers a single-use, high-entropy nonce bound
//! to the post-login destination; the callback consumes it. Entries expire
//! after a configurable TTL and are pruned on every issue.

use crate::models::Destination;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

struct PendingState {
    destination: Destination,
    issued_at: DateTime<Utc>,
}

/// In-memory registry of outstanding state nonces
pub struct StateRegistry {
    ttl: Duration,
    pending: Mutex<HashMap<String, PendingState>>,
}

impl StateRegistry {
    #[must_use]
    pub fn new(ttl_seconds: u64) -> Self {
        // Oversized TTLs clamp to chrono's representable maximum instead of
        // panicking inside TimeDelta construction.
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            ttl,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Generate and register a nonce bound to `destination`, returning the
    /// state token to embed in the authorization URL.
    #[must_use]
    pub fn issue(&self, destination: Destination) -> String {
        let token = Self::generate_state_token();
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let now = Utc::now();
        pending.retain(|_, entry| now - entry.issued_at < self.ttl);
        pending.insert(
            token.clone(),
            PendingState {
                destination,
                issued_at: now,
            },
        );
        token
    }

    /// Consume a nonce, returning its bound destination. A nonce is
    /// single-use: the same state will not resolve twice. Expired entries
    /// resolve to `None`.
    #[must_use]
    pub fn consume(&self, state: &str) -> Option<Destination> {
        let entry = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(state)?;

        if Utc::now() - entry.issued_at < self.ttl {
            Some(entry.destination)
        } else {
            log::debug!("discarding expired state nonce");
            None
        }
    }

    /// 32 bytes of CSPRNG entropy, URL-safe base64 without padding
    fn generate_state_token() -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }
}

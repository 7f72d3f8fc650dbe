//! Mock objects and fake implementations for testing
//!
//! These stand in for the external collaborators (token endpoint, durable
//! preference slot) so handler and store logic can be tested in isolation.

use crate::models::TokenPair;
use crate::oauth::{ExchangeError, TokenExchanger};
use crate::theme::PreferenceStorage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted token exchanger: always succeeds with a fixed pair or always
/// fails with a fixed provider message. Counts invocations so tests can
/// assert the exchange was (or was not) attempted.
pub struct MockTokenExchanger {
    outcome: Result<TokenPair, String>,
    calls: AtomicUsize,
}

impl MockTokenExchanger {
    #[must_use]
    pub fn succeeding(tokens: TokenPair) -> Self {
        Self {
            outcome: Ok(tokens),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchanger for MockTokenExchanger {
    async fn exchange(&self, _code: &str) -> Result<TokenPair, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(tokens) => Ok(tokens.clone()),
            Err(message) => Err(ExchangeError::Provider(message.clone())),
        }
    }
}

/// In-memory preference slot with an optional write-failure switch
#[derive(Default)]
pub struct MemoryPreferenceStorage {
    value: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryPreferenceStorage {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail, exercising best-effort persistence
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn stored(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }
}

impl PreferenceStorage for MemoryPreferenceStorage {
    fn read(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    fn write(&self, value: &str) -> std::io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("simulated storage failure"));
        }
        *self.value.lock().unwrap() = Some(value.to_string());
        Ok(())
    }
}

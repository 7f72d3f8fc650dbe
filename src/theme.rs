//! Theme preference store
//!
//! Holds the tri-state theme preference, persists it to a durable slot, and
//! resolves `auto` against the ambient system signal. The store is a
//! single-writer object passed through constructor injection; the ambient
//! signal is a `watch` channel owned by the host process (`true` = dark).

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Key under which the preference is persisted
pub const THEME_PREFERENCE_KEY: &str = "facility-hub-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    Auto,
}

impl ThemePreference {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Durable key-value slot for the preference. Persistence is best-effort:
/// a failed read means "no preference", a failed write is logged and the
/// store continues in-memory for the session.
pub trait PreferenceStorage: Send + Sync {
    fn read(&self) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error when the slot cannot be written.
    fn write(&self, value: &str) -> std::io::Result<()>;
}

/// File-backed preference slot
pub struct FilePreferenceStorage {
    path: PathBuf,
}

impl FilePreferenceStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStorage for FilePreferenceStorage {
    fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn write(&self, value: &str) -> std::io::Result<()> {
        fs::write(&self.path, value)
    }
}

/// Pure resolution: dark iff preference is dark, or auto with a dark ambient
#[must_use]
pub const fn resolve_is_dark(preference: ThemePreference, ambient_is_dark: bool) -> bool {
    match preference {
        ThemePreference::Dark => true,
        ThemePreference::Light => false,
        ThemePreference::Auto => ambient_is_dark,
    }
}

/// Status-bar color applied alongside the resolved theme
#[must_use]
pub const fn status_color(is_dark: bool) -> &'static str {
    if is_dark {
        "#1f2937"
    } else {
        "#f9fafb"
    }
}

/// Single-writer theme store with an ambient-change subscription
///
/// While the preference is `Auto`, a follower task republishes the resolved
/// value on every ambient change; the task is torn down as soon as the
/// preference moves away from `Auto` or the store is dropped.
pub struct ThemeStore {
    storage: Arc<dyn PreferenceStorage>,
    preference: ThemePreference,
    ambient: watch::Receiver<bool>,
    resolved_tx: Arc<watch::Sender<bool>>,
    follower: Option<JoinHandle<()>>,
}

impl ThemeStore {
    /// Read the persisted preference, or adopt the current ambient value
    /// (as an explicit light/dark preference, not `auto`) when none is
    /// stored. Storage absence is not a fault.
    #[must_use]
    pub fn initialize(storage: Arc<dyn PreferenceStorage>, ambient: watch::Receiver<bool>) -> Self {
        let preference = storage
            .read()
            .and_then(|value| ThemePreference::parse(value.trim()))
            .unwrap_or_else(|| {
                if *ambient.borrow() {
                    ThemePreference::Dark
                } else {
                    ThemePreference::Light
                }
            });

        let resolved = resolve_is_dark(preference, *ambient.borrow());
        let (resolved_tx, _) = watch::channel(resolved);

        let mut store = Self {
            storage,
            preference,
            ambient,
            resolved_tx: Arc::new(resolved_tx),
            follower: None,
        };
        store.spawn_follower();
        store
    }

    #[must_use]
    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    #[must_use]
    pub fn resolved_is_dark(&self) -> bool {
        *self.resolved_tx.borrow()
    }

    /// Subscribe to resolved-value changes (the ambient presentation context)
    #[must_use]
    pub fn subscribe_resolved(&self) -> watch::Receiver<bool> {
        self.resolved_tx.subscribe()
    }

    /// Persist and apply a new preference. Repeated calls with the same
    /// value are idempotent: storage and resolved state end up unchanged.
    ///
    /// Moving away from `auto` waits for the ambient follower to terminate
    /// before the frozen value is published, so a follower mid-update can
    /// never overwrite an explicit preference.
    pub async fn set_preference(&mut self, preference: ThemePreference) {
        if let Err(e) = self.storage.write(preference.as_str()) {
            warn!("failed to persist theme preference, continuing in-memory: {e}");
        }
        self.preference = preference;
        if self.preference == ThemePreference::Auto {
            self.publish_resolved();
            self.spawn_follower();
        } else {
            self.stop_follower().await;
            self.publish_resolved();
        }
    }

    fn publish_resolved(&self) {
        let resolved = resolve_is_dark(self.preference, *self.ambient.borrow());
        self.resolved_tx.send_replace(resolved);
    }

    /// Start following the ambient signal. No-op unless preference = auto.
    fn spawn_follower(&mut self) {
        if self.preference != ThemePreference::Auto || self.follower.is_some() {
            return;
        }
        let mut ambient = self.ambient.clone();
        let resolved_tx = Arc::clone(&self.resolved_tx);
        self.follower = Some(tokio::spawn(async move {
            // While this task lives the preference is auto, so the
            // resolved value tracks the ambient signal directly.
            while ambient.changed().await.is_ok() {
                let is_dark = *ambient.borrow_and_update();
                resolved_tx.send_replace(is_dark);
            }
        }));
    }

    /// Abort the ambient follower and wait for it to finish, so no
    /// in-flight ambient update can land after the caller publishes.
    async fn stop_follower(&mut self) {
        if let Some(follower) = self.follower.take() {
            follower.abort();
            let _ = follower.await;
        }
    }
}

impl Drop for ThemeStore {
    fn drop(&mut self) {
        if let Some(follower) = self.follower.take() {
            follower.abort();
        }
    }
}

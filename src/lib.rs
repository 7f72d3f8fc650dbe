#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the facility-hub application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod handlers;
pub mod models;
pub mod oauth;
pub mod settings;
pub mod theme;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use handlers::{health, oauth_callback, oauth_sign_in};
pub use models::{AuthorizationCallback, Destination, TokenPair};
pub use oauth::{ExchangeError, StateRegistry, TokenExchanger};
pub use settings::FacilityHubSettings;
pub use theme::{ThemePreference, ThemeStore};

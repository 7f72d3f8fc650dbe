//! Testing utilities for facility-hub
//!
//! Consolidates fixtures and mock implementations used by unit and
//! integration tests. Gated behind the `testing` feature so integration
//! tests can share them without shipping test code in release builds.
//!
//! - [`fixtures`] - Pre-built settings and callback payloads
//! - [`mock`] - Fake implementations of external dependencies

pub mod fixtures;
pub mod mock;

pub use fixtures::{test_settings, test_token_pair};
pub use mock::{MemoryPreferenceStorage, MockTokenExchanger};

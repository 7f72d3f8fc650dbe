//! OAuth authorization-code flow plumbing
//!
//! This module provides the token-exchange capability consumed by the
//! callback handler and the server-held state registry that binds outbound
//! authorization requests to their post-login destination.

pub mod exchange;
pub mod state;

pub use exchange::{ExchangeError, HttpTokenExchanger, TokenExchanger};
pub use state::StateRegistry;

//! Core data types shared across the OAuth flow
//!
//! These structures mirror the wire contract with the authorization provider
//! and the two SPA landing pages that consume the callback redirect.

use serde::{Deserialize, Serialize};

/// Access/refresh token bundle returned by a successful code exchange.
///
/// Serialized into the `tokens` query parameter of the success redirect;
/// the receiving page is responsible for storing it. `refresh_token` is
/// omitted from the JSON when the provider did not return one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: u64,
}

/// Query parameters delivered by the authorization provider on callback.
///
/// A well-formed callback carries exactly one of `code` or `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Post-login landing page.
///
/// The same OAuth client is shared by the calendar and the document-storage
/// feature areas; the round-tripped `state` parameter is the only signal
/// distinguishing which flow initiated the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Documents,
    Calendar,
}

impl Destination {
    /// Map a raw state value to a landing page. `"documents"` selects the
    /// documents page; any other value, including an absent state, falls
    /// back to the calendar page.
    #[must_use]
    pub fn from_state(state: Option<&str>) -> Self {
        match state {
            Some("documents") => Self::Documents,
            _ => Self::Calendar,
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Documents => "/documents",
            Self::Calendar => "/calendar",
        }
    }
}

//! Pre-built test data

use crate::models::TokenPair;
use crate::settings::FacilityHubSettings;

/// Settings with a configured OAuth client and a throwaway theme slot
#[must_use]
pub fn test_settings() -> FacilityHubSettings {
    let mut settings = FacilityHubSettings::default();
    settings.oauth.client_id = Some("test-client-id".to_string());
    settings.oauth.client_secret = Some("test-client-secret".to_string());
    settings.theme.preference_file = "/dev/null".to_string();
    settings
}

/// Token pair used across callback tests
#[must_use]
pub fn test_token_pair() -> TokenPair {
    TokenPair {
        access_token: "tok".to_string(),
        refresh_token: None,
        expires_in: 3600,
    }
}

use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FacilityHubSettings {
    pub application: ApplicationSettings,
    pub oauth: OAuthSettings,
    pub theme: ThemeSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub redirect_base_url: String,
    pub cors_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub scopes: Vec<String>,

    // Direct values (can be overridden by environment variables)
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    // Environment variable names for overrides
    pub client_id_env: Option<String>,
    pub client_secret_env: Option<String>,

    /// Reject callbacks whose state does not match a registered nonce.
    /// Off by default: the SPA landing pages still rely on the literal
    /// `state == "documents"` routing contract.
    pub require_registered_state: bool,
    /// How long an issued state nonce stays valid.
    pub state_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Durable slot for the persisted theme preference.
    pub preference_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redirect_base_url: "http://localhost:8080".to_string(),
            cors_origins: "http://localhost:3000,http://localhost:8080".to_string(),
        }
    }
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
            scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "https://www.googleapis.com/auth/calendar.events".to_string(),
                "https://www.googleapis.com/auth/drive.file".to_string(),
            ],
            client_id: None,
            client_secret: None,
            client_id_env: None,
            client_secret_env: None,
            require_registered_state: false,
            state_ttl_seconds: 600,
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            preference_file: "facility-hub-theme".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl FacilityHubSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - Settings file cannot be read or parsed
    pub fn load() -> anyhow::Result<Self> {
        Self::initialize_environment()?;

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        Ok(settings)
    }

    fn initialize_environment() -> anyhow::Result<()> {
        Self::load_env_file();
        env_logger::try_init()?;
        Ok(())
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading)
    /// 2. Settings.toml in `FACILITY_HUB_SECRETS_DIR` (if set and present)
    /// 3. Settings.toml in current directory (if present)
    /// 4. Default settings
    fn load_base_settings() -> anyhow::Result<Self> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            log::info!(
                "Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("FACILITY_HUB_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                settings = basic_toml::from_str(&secrets_toml_content)?;
                log::info!("Overriding settings from {}", secrets_path.display());
            } else {
                log::info!(
                    "FACILITY_HUB_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_oauth_env_overrides(&mut settings.oauth);
        Self::apply_theme_env_overrides(&mut settings.theme);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(redirect_base_url) = std::env::var("REDIRECT_BASE_URL") {
            app_settings.redirect_base_url = redirect_base_url;
        }
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    fn apply_oauth_env_overrides(oauth_settings: &mut OAuthSettings) {
        if let Ok(client_id) = std::env::var("OAUTH_CLIENT_ID") {
            oauth_settings.client_id = Some(client_id);
        }
        if let Ok(client_secret) = std::env::var("OAUTH_CLIENT_SECRET") {
            oauth_settings.client_secret = Some(client_secret);
        }
        if let Ok(token_endpoint) = std::env::var("OAUTH_TOKEN_ENDPOINT") {
            oauth_settings.token_endpoint = token_endpoint;
        }
        if let Ok(authorization_endpoint) = std::env::var("OAUTH_AUTHORIZATION_ENDPOINT") {
            oauth_settings.authorization_endpoint = authorization_endpoint;
        }
        if let Ok(strict_str) = std::env::var("OAUTH_REQUIRE_REGISTERED_STATE") {
            if let Ok(strict) = strict_str.parse::<bool>() {
                oauth_settings.require_registered_state = strict;
            }
        }
    }

    fn apply_theme_env_overrides(theme_settings: &mut ThemeSettings) {
        if let Ok(preference_file) = std::env::var("THEME_PREFERENCE_FILE") {
            theme_settings.preference_file = preference_file;
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get CORS origins as a vector of strings
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .collect()
    }

    /// Callback URL registered with the authorization provider
    #[must_use]
    pub fn get_callback_url(&self) -> String {
        format!(
            "{}/auth/oauth2/callback",
            self.application.redirect_base_url
        )
    }
}

impl OAuthSettings {
    /// Get the client ID, checking the environment variable first, then falling back to the direct value
    #[must_use]
    pub fn get_client_id(&self) -> Option<String> {
        if let Some(env_var) = &self.client_id_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.client_id.clone()
    }

    /// Get the client secret, checking the environment variable first, then falling back to the direct value
    #[must_use]
    pub fn get_client_secret(&self) -> Option<String> {
        if let Some(env_var) = &self.client_secret_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.client_secret.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clean_env_vars() {
        std::env::remove_var("OAUTH_CLIENT_ID");
        std::env::remove_var("OAUTH_CLIENT_SECRET");
        std::env::remove_var("OAUTH_TOKEN_ENDPOINT");
        std::env::remove_var("OAUTH_REQUIRE_REGISTERED_STATE");
        std::env::remove_var("THEME_PREFERENCE_FILE");
        std::env::remove_var("FACILITY_HUB_CLIENT_ID");
    }

    #[test]
    fn test_defaults() {
        let settings = FacilityHubSettings::default();
        assert_eq!(settings.application.port, 8080);
        assert_eq!(
            settings.oauth.token_endpoint,
            "https://oauth2.googleapis.com/token"
        );
        assert!(!settings.oauth.require_registered_state);
        assert_eq!(settings.oauth.state_ttl_seconds, 600);
        assert_eq!(settings.theme.preference_file, "facility-hub-theme");
    }

    #[test]
    fn test_bind_address_and_callback_url() {
        let settings = FacilityHubSettings::default();
        assert_eq!(settings.get_bind_address(), "0.0.0.0:8080");
        assert_eq!(
            settings.get_callback_url(),
            "http://localhost:8080/auth/oauth2/callback"
        );
    }

    #[test]
    #[serial]
    fn test_oauth_env_overrides() {
        clean_env_vars();

        let mut settings = FacilityHubSettings::default();
        std::env::set_var("OAUTH_CLIENT_ID", "env-client-id");
        std::env::set_var("OAUTH_REQUIRE_REGISTERED_STATE", "true");

        FacilityHubSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.oauth.client_id.as_deref(), Some("env-client-id"));
        assert!(settings.oauth.require_registered_state);

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_client_id_env_indirection() {
        clean_env_vars();

        let oauth = OAuthSettings {
            client_id: Some("direct-id".to_string()),
            client_id_env: Some("FACILITY_HUB_CLIENT_ID".to_string()),
            ..Default::default()
        };

        // Without the named variable set, the direct value wins
        assert_eq!(oauth.get_client_id().as_deref(), Some("direct-id"));

        // With the named variable set, it takes precedence
        std::env::set_var("FACILITY_HUB_CLIENT_ID", "indirect-id");
        assert_eq!(oauth.get_client_id().as_deref(), Some("indirect-id"));

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_theme_env_override() {
        clean_env_vars();

        let mut settings = FacilityHubSettings::default();
        std::env::set_var("THEME_PREFERENCE_FILE", "/tmp/theme-pref");

        FacilityHubSettings::apply_env_overrides(&mut settings);
        assert_eq!(settings.theme.preference_file, "/tmp/theme-pref");

        clean_env_vars();
    }

    #[test]
    fn test_cors_origins_parsing() {
        let settings = FacilityHubSettings::default();
        let origins = settings.get_cors_origins();
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "http://localhost:8080"]
        );
    }
}

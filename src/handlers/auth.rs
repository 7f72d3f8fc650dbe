// Sign-in handler: issues the outbound authorization redirect
use crate::models::Destination;
use crate::oauth::StateRegistry;
use crate::settings::FacilityHubSettings;
use crate::utils::ResponseBuilder;
use actix_web::{web, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    /// Which feature area initiated the flow: `documents` or `calendar`
    pub flow: Option<String>,
}

/// Start the OAuth flow for one of the two feature areas.
///
/// Registers a single-use state nonce bound to the post-login destination
/// and redirects the browser to the provider's authorization endpoint.
pub async fn oauth_sign_in(
    query: web::Query<SignInQuery>,
    settings: web::Data<FacilityHubSettings>,
    state_registry: web::Data<StateRegistry>,
) -> HttpResponse {
    let destination = Destination::from_state(query.flow.as_deref());
    let state = state_registry.issue(destination);

    match build_authorization_url(&settings, &state) {
        Ok(authorization_url) => {
            info!("redirecting to authorization endpoint for {destination:?} flow");
            ResponseBuilder::redirect(&authorization_url).build()
        }
        Err(e) => {
            error!("failed to build authorization URL: {e}");
            ResponseBuilder::redirect(destination.path())
                .with_param("error", "oauth_config")
                .build()
        }
    }
}

fn build_authorization_url(
    settings: &FacilityHubSettings,
    state: &str,
) -> Result<String, String> {
    let client_id = settings
        .oauth
        .get_client_id()
        .ok_or_else(|| "OAuth client_id is not configured".to_string())?;

    let mut url = Url::parse(&settings.oauth.authorization_endpoint)
        .map_err(|e| format!("invalid authorization endpoint: {e}"))?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &client_id)
        .append_pair("redirect_uri", &settings.get_callback_url())
        .append_pair("scope", &settings.oauth.scopes.join(" "))
        .append_pair("state", state)
        // Ask for a refresh token so the receiving page can renew access
        .append_pair("access_type", "offline");

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured_settings() -> FacilityHubSettings {
        let mut settings = FacilityHubSettings::default();
        settings.oauth.client_id = Some("client-123".to_string());
        settings
    }

    #[test]
    fn authorization_url_carries_required_parameters() {
        let settings = configured_settings();
        let url = build_authorization_url(&settings, "nonce-abc").unwrap();
        let parsed = Url::parse(&url).unwrap();

        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&("client_id".to_string(), "client-123".to_string())));
        assert!(pairs.contains(&("state".to_string(), "nonce-abc".to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:8080/auth/oauth2/callback".to_string()
        )));
    }

    #[test]
    fn missing_client_id_is_an_error() {
        let settings = FacilityHubSettings::default();
        assert!(build_authorization_url(&settings, "nonce").is_err());
    }

    #[test]
    fn invalid_endpoint_is_an_error() {
        let mut settings = configured_settings();
        settings.oauth.authorization_endpoint = "not a url".to_string();
        assert!(build_authorization_url(&settings, "nonce").is_err());
    }
}

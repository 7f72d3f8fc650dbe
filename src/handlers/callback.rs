// OAuth callback handler
use crate::models::{AuthorizationCallback, Destination};
use crate::oauth::{StateRegistry, TokenExchanger};
use crate::settings::FacilityHubSettings;
use crate::utils::ResponseBuilder;
use actix_web::{web, HttpResponse};
use log::{debug, error, warn};

/// Handle the inbound redirect from the authorization provider.
///
/// Evaluated in order:
/// 1. a provider-reported `error` is echoed to the state-derived destination
///    without attempting an exchange;
/// 2. a callback with neither error nor code redirects with `error=no_code`;
/// 3. otherwise the code is exchanged once — success attaches the token
///    payload, failure attaches `error=auth_failed` with details.
///
/// Every path ends in a redirect; nothing is persisted server-side.
pub async fn oauth_callback(
    query: web::Query<AuthorizationCallback>,
    settings: web::Data<FacilityHubSettings>,
    state_registry: web::Data<StateRegistry>,
    exchanger: web::Data<dyn TokenExchanger>,
) -> HttpResponse {
    let callback = query.into_inner();
    debug!(
        "OAuth callback received: code={}, error={}, state={}",
        callback.code.is_some(),
        callback.error.is_some(),
        callback.state.is_some()
    );

    let destination = match resolve_destination(
        callback.state.as_deref(),
        &state_registry,
        settings.oauth.require_registered_state,
    ) {
        Ok(destination) => destination,
        Err(response) => return response,
    };

    // Provider-reported denial (user declined, misconfiguration). Surfaced
    // verbatim to the receiving page, not logged as a system fault.
    if let Some(provider_error) = &callback.error {
        debug!("authorization provider reported an error: {provider_error}");
        return ResponseBuilder::redirect(destination.path())
            .with_param("error", provider_error)
            .build();
    }

    let Some(code) = callback.code.as_deref() else {
        warn!("OAuth callback carried neither a code nor an error");
        return ResponseBuilder::redirect(Destination::Calendar.path())
            .with_param("error", "no_code")
            .build();
    };

    // Single attempt, no retry. The exchange call is the only operation
    // that may fail for reasons outside input validation.
    match exchanger.exchange(code).await {
        Ok(tokens) => match serde_json::to_string(&tokens) {
            Ok(token_json) => ResponseBuilder::redirect(destination.path())
                .with_param("auth", "success")
                .with_param("tokens", &token_json)
                .build(),
            Err(e) => {
                error!("failed to serialize token pair: {e}");
                ResponseBuilder::redirect(destination.path())
                    .with_param("error", "auth_failed")
                    .with_param("details", "token serialization failed")
                    .build()
            }
        },
        Err(e) => {
            // Recorded for operator visibility: this may indicate a
            // misconfigured client or a provider outage.
            error!("token exchange failed: {e}");
            ResponseBuilder::redirect(destination.path())
                .with_param("error", "auth_failed")
                .with_param("details", &e.to_string())
                .build()
        }
    }
}

/// Resolve the post-login destination from the state parameter.
///
/// A state matching a registered nonce is consumed and its bound destination
/// wins. Otherwise strict mode rejects the callback outright, while the
/// default lenient mode falls back to the literal `"documents"` mapping.
fn resolve_destination(
    state: Option<&str>,
    registry: &StateRegistry,
    require_registered: bool,
) -> Result<Destination, HttpResponse> {
    if let Some(state) = state {
        if let Some(bound) = registry.consume(state) {
            debug!("state nonce consumed, destination {bound:?}");
            return Ok(bound);
        }
    }

    if require_registered {
        warn!("rejecting callback with unregistered state parameter");
        return Err(ResponseBuilder::redirect(Destination::Calendar.path())
            .with_param("error", "state_mismatch")
            .build());
    }

    Ok(Destination::from_state(state))
}

// Theme preference endpoints over the injected store
use crate::theme::{status_color, ThemePreference, ThemeStore};
use crate::utils::ResponseBuilder;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Serialize)]
struct ThemeState {
    preference: ThemePreference,
    resolved_is_dark: bool,
    status_color: &'static str,
}

impl ThemeState {
    fn from_store(store: &ThemeStore) -> Self {
        let resolved_is_dark = store.resolved_is_dark();
        Self {
            preference: store.preference(),
            resolved_is_dark,
            status_color: status_color(resolved_is_dark),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ThemeUpdate {
    pub preference: String,
}

/// Current preference and resolved presentation state
pub async fn get_theme_preference(store: web::Data<Mutex<ThemeStore>>) -> HttpResponse {
    let store = store.lock().await;
    ResponseBuilder::ok().json(&ThemeState::from_store(&store))
}

/// Apply an explicit user selection
pub async fn set_theme_preference(
    store: web::Data<Mutex<ThemeStore>>,
    body: web::Json<ThemeUpdate>,
) -> HttpResponse {
    let Some(preference) = ThemePreference::parse(&body.preference) else {
        return ResponseBuilder::invalid_field(
            "preference",
            "must be one of light, dark, auto",
        );
    };

    let mut store = store.lock().await;
    store.set_preference(preference).await;
    ResponseBuilder::ok().json(&ThemeState::from_store(&store))
}

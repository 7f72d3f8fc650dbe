pub mod auth;
pub mod callback;
pub mod resources;
pub mod theme;

pub use auth::oauth_sign_in;
pub use callback::oauth_callback;
pub use resources::{drive_status, import_devices, search, upload_file};
pub use theme::{get_theme_preference, set_theme_preference};

use actix_web::HttpResponse;
use serde_json::json;

/// Health check endpoint
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use facility_hub::handlers::{
    drive_status, get_theme_preference, health, import_devices, oauth_callback, oauth_sign_in,
    search, set_theme_preference, upload_file,
};
use facility_hub::handlers::resources::{
    DeviceImporter, DriveService, MockDeviceImporter, MockDriveService, MockSearchBackend,
    SearchBackend,
};
use facility_hub::oauth::{HttpTokenExchanger, StateRegistry, TokenExchanger};
use facility_hub::settings::FacilityHubSettings;
use facility_hub::theme::{FilePreferenceStorage, ThemeStore};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from Settings.toml and environment variables.
    // This also loads the .env file and initializes the logger.
    let settings = FacilityHubSettings::load().context("failed to load settings")?;

    let exchanger: Arc<dyn TokenExchanger> = Arc::new(
        HttpTokenExchanger::from_settings(&settings)
            .context("failed to configure token exchanger")?,
    );

    start_server(settings, exchanger).await
}

async fn start_server(
    settings: FacilityHubSettings,
    exchanger: Arc<dyn TokenExchanger>,
) -> anyhow::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let state_registry = web::Data::new(StateRegistry::new(settings.oauth.state_ttl_seconds));

    // Ambient system signal (true = dark). The process seeds it light; a
    // host-environment producer would own the sender.
    let (ambient_tx, ambient_rx) = watch::channel(false);
    let theme_storage = Arc::new(FilePreferenceStorage::new(&settings.theme.preference_file));
    let theme_store = web::Data::new(Mutex::new(ThemeStore::initialize(theme_storage, ambient_rx)));

    // Mock capabilities awaiting real backend wiring
    let importer: Arc<dyn DeviceImporter> = Arc::new(MockDeviceImporter);
    let drive: Arc<dyn DriveService> = Arc::new(MockDriveService);
    let search_backend: Arc<dyn SearchBackend> = Arc::new(MockSearchBackend);

    let cors_origins = settings.get_cors_origins();

    let server = HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(settings.clone()))
            .app_data(web::Data::from(exchanger.clone()))
            .app_data(state_registry.clone())
            .app_data(theme_store.clone())
            .app_data(web::Data::from(importer.clone()))
            .app_data(web::Data::from(drive.clone()))
            .app_data(web::Data::from(search_backend.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run();

    // Keep the ambient signal alive for the lifetime of the server.
    let _ambient_signal = ambient_tx;

    server.await?;
    Ok(())
}

fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg
        // OAuth2 endpoints
        .route("/auth/oauth2/sign_in", web::get().to(oauth_sign_in))
        .route("/auth/oauth2/callback", web::get().to(oauth_callback))
        // Theme preference endpoints
        .route(
            "/api/preferences/theme",
            web::get().to(get_theme_preference),
        )
        .route(
            "/api/preferences/theme",
            web::put().to(set_theme_preference),
        )
        // Resource endpoints (mock-backed)
        .route("/api/devices/import", web::post().to(import_devices))
        .route("/api/drive/status", web::get().to(drive_status))
        .route("/api/drive/upload", web::post().to(upload_file))
        .route("/api/search", web::get().to(search))
        // Health endpoint
        .route("/ping", web::get().to(health));
}

fn print_startup_info(bind_address: &str, settings: &FacilityHubSettings) {
    println!("Starting Facility Hub backend on http://{bind_address}");
    println!();
    println!("OAuth2 endpoints:");
    println!("  GET  /auth/oauth2/sign_in  - Start authorization (flow=documents|calendar)");
    println!("  GET  /auth/oauth2/callback - OAuth callback");
    println!();
    println!("OAuth callback URL for the identity provider:");
    println!("  {}", settings.get_callback_url());
    println!();
    println!("API endpoints:");
    println!("  GET  /api/preferences/theme  - Current theme preference");
    println!("  PUT  /api/preferences/theme  - Update theme preference");
    println!("  POST /api/devices/import     - Bulk device import (mock)");
    println!("  GET  /api/drive/status       - Drive connection status (mock)");
    println!("  POST /api/drive/upload       - File upload (mock)");
    println!("  GET  /api/search             - Cross-entity search (mock)");
    println!();
    println!("System endpoints:");
    println!("  GET  /ping - Health check");
}

//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::handlers::configure_routes;
use api_server::middleware::cors::cors;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    #[cfg(feature = "auth")]
    let token_service: std::sync::Arc<dyn quill_core::ports::TokenService> = std::sync::Arc::new(
        quill_infra::JwtTokenService::new(config.jwt_config()),
    );

    let origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        let app = App::new()
            .wrap(cors(&origins))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()));

        #[cfg(feature = "auth")]
        let app = app.app_data(web::Data::new(token_service.clone()));

        app.configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

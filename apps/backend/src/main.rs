use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use crease::adapters::{InMemoryMatchStore, InMemoryRegistry, OwnerAuthorizer};
use crease::config::ServerConfig;
use crease::middleware::{cors_middleware, RequestTrace, StructuredLogger};
use crease::realtime::SnapshotHub;
use crease::routes;
use crease::services::LiveScoringService;
use crease::state::{AppState, SecurityConfig};
use crease::AppError;
use tracing::{error, info, warn};

mod telemetry;

fn build_state(config: &ServerConfig) -> Result<AppState, AppError> {
    let registry = match &config.registry_path {
        Some(path) => InMemoryRegistry::from_json_file(path, config.allow_consecutive_overs)
            .map_err(|e| AppError::config(format!("Failed to load registry fixture: {e}")))?,
        None => {
            warn!("CREASE_REGISTRY_PATH not set; no matches are registered");
            InMemoryRegistry::new()
        }
    };

    let scoring = LiveScoringService::new(
        Arc::new(InMemoryMatchStore::new()),
        Arc::new(registry),
        Arc::new(OwnerAuthorizer),
        Arc::new(SnapshotHub::new()),
    );
    Ok(AppState::new(
        SecurityConfig::new(config.jwt_secret.as_bytes()),
        Arc::new(scoring),
    ))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let app_state = match build_state(&config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        allow_consecutive_overs = config.allow_consecutive_overs,
        "starting crease"
    );

    let data = web::Data::new(app_state);
    let origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

use axum::{Json, Router, routing::get};
use axum_helpers::{errors::handlers::not_found, server::create_app};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{DirectoryService, InMemoryUserStore, NewUser, Role, handlers};
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod openapi;

use config::{AdminBootstrap, Config};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let store = InMemoryUserStore::new();
    let service = DirectoryService::new(store);

    if let Some(ref bootstrap) = config.admin_bootstrap {
        bootstrap_admin(&service, bootstrap).await?;
    }

    let router = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .nest("/users", handlers::router(service))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http());

    create_app(router, &config.server).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Create the configured admin record on a fresh store so the admin-only
/// operations are reachable.
async fn bootstrap_admin(
    service: &DirectoryService<InMemoryUserStore>,
    bootstrap: &AdminBootstrap,
) -> eyre::Result<()> {
    let password_hash = handlers::hash_password(&bootstrap.password)?;
    let admin = service
        .create_user(NewUser {
            email: bootstrap.email.clone(),
            password_hash,
            first_name: None,
            last_name: None,
            role: Role::Admin,
        })
        .await?;

    info!(admin_id = %admin.id, "Bootstrapped admin user");
    Ok(())
}

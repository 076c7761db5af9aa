//! HTTP application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: store selection and resolver construction
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use linkwise_infra::ContactStore;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router with the store selected from the environment
/// (public entrypoint used by `main.rs`).
pub async fn build_app() -> anyhow::Result<Router> {
    let store = services::store_from_env().await?;
    Ok(build_app_with_store(store))
}

/// Build the router around an explicit store. Tests inject the in-memory
/// store here and exercise the exact production routing.
pub fn build_app_with_store(store: Arc<dyn ContactStore>) -> Router {
    let services = Arc::new(services::AppServices::new(store));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/identify", routes::identify::router())
        .layer(Extension(services))
}

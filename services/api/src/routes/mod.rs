//! API service routes

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::error;

use crate::{error::ApiError, middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod dashboard;
pub mod records;

use records::{Energy, Waste};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/energy",
            get(records::list::<Energy>).post(records::create::<Energy>),
        )
        .route("/energy/stats", get(records::stats::<Energy>))
        .route("/energy/export", get(records::export::<Energy>))
        .route(
            "/energy/:id",
            get(records::get_one::<Energy>)
                .put(records::update::<Energy>)
                .delete(records::delete::<Energy>),
        )
        .route(
            "/waste",
            get(records::list::<Waste>).post(records::create::<Waste>),
        )
        .route("/waste/stats", get(records::stats::<Waste>))
        .route("/waste/export", get(records::export::<Waste>))
        .route(
            "/waste/:id",
            get(records::get_one::<Waste>)
                .put(records::update::<Waste>)
                .delete(records::delete::<Waste>),
        )
        .route("/dashboard/summary", get(dashboard::summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "esg-api"
    }))
}

/// Log a failure and map it to an opaque 500 carrying `message`
pub(crate) fn internal(message: impl Into<String>) -> impl FnOnce(anyhow::Error) -> ApiError {
    let message = message.into();
    move |e| {
        error!("{}: {:#}", message, e);
        ApiError::Internal(message)
    }
}

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, routing::get, BoxError, Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    analytics::analytics_controller::analytics_router, app_module::AppState,
    content::content_controller::content_router, health::health_controller,
    history::history_controller::history_router,
};

pub fn application_router() -> Router {
    Router::new()
        .route("/v1/health", get(health_controller::health))
        .nest("/v1/content", content_router())
        .nest("/v1/history", history_router())
        .nest("/v1/analytics", analytics_router())
}

/// The full service: routes plus timeout, tracing, state and CORS layers.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    Router::new().merge(application_router()).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|error: BoxError| async move {
                if error.is::<tower::timeout::error::Elapsed>() {
                    Ok(StatusCode::REQUEST_TIMEOUT)
                } else {
                    Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Unhandled internal error: {}", error),
                    ))
                }
            }))
            .timeout(request_timeout)
            .layer(TraceLayer::new_for_http())
            .layer(Extension(state))
            .layer(
                CorsLayer::new()
                    .allow_origin(tower_http::cors::Any)
                    .allow_methods(tower_http::cors::Any)
                    .allow_headers(tower_http::cors::Any),
            )
            .into_inner(),
    )
}

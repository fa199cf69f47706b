use std::sync::Arc;
use std::time::Duration;

use axum::http::Uri;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health, search};
use crate::error::AppError;
use crate::AppState;

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_owned())
}

/// Must exceed two full outbound timeouts.
fn request_timeout(upstream: Duration) -> Duration {
    (upstream * 2 + Duration::from_secs(5)).max(Duration::from_secs(30))
}

pub fn build(state: Arc<AppState>) -> Router {
    let timeout = request_timeout(state.config.yelp_timeout);

    Router::new()
        .route("/yelp-search", get(search::search))
        .route("/health", get(health::health))
        .fallback(fallback)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::WeatherProError;
use crate::api::{self, AppState};

/// Upper bound for one request, covering the whole aggregation cycle
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn app(state: Arc<AppState>) -> Router {
    app_with_timeout(state, REQUEST_TIMEOUT)
}

/// Requests running past `timeout` are answered with 408
pub fn app_with_timeout(state: Arc<AppState>, timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(cors)
}

pub async fn run(state: Arc<AppState>, bind: &str, port: u16) -> Result<(), WeatherProError> {
    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

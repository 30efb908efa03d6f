//! JSON endpoints mounted under `/api`

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    extract::{ConnectInfo, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregator::Aggregator;
use crate::error::{ProviderError, ResolutionError, WeatherProError};
use crate::location_resolver::{DeviceLocator, LocationResolver, LocationSignal};
use crate::models::Coordinates;
use crate::provider::WeatherProvider;
use crate::suggest;
use crate::view::{DashboardView, SuggestionView};

/// Shared by all requests; each request runs its own cycle
pub struct AppState {
    resolver: LocationResolver,
    aggregator: Aggregator,
    provider: Arc<dyn WeatherProvider>,
    min_query_chars: usize,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        device: Arc<dyn DeviceLocator>,
        days: u8,
        min_query_chars: usize,
    ) -> Self {
        Self {
            resolver: LocationResolver::new(provider.clone(), device),
            aggregator: Aggregator::new(provider.clone(), days),
            provider,
            min_query_chars,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

/// Error response carrying the user-facing message
pub enum ApiError {
    Cycle(WeatherProError),
    Search(ProviderError),
}

impl<E: Into<WeatherProError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self::Cycle(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Cycle(err) => err,
            ApiError::Search(err) => {
                warn!("Suggestion lookup failed: {}", err);
                let body = ErrorBody {
                    error: "Failed to load location suggestions.".to_string(),
                };
                return (StatusCode::BAD_GATEWAY, Json(body)).into_response();
            }
        };

        let status = match &err {
            WeatherProError::Validation { .. }
            | WeatherProError::Resolution(ResolutionError::EmptyQuery) => StatusCode::BAD_REQUEST,
            WeatherProError::Resolution(ResolutionError::Unavailable) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            WeatherProError::Fetch(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Request failed with {}: {}", status, err);

        let body = ErrorBody {
            error: err.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/search", get(get_search))
        .route("/health", get(get_health))
        .with_state(state)
}

fn signal_from(params: WeatherParams) -> Result<LocationSignal, WeatherProError> {
    match (params.q, params.lat, params.lon) {
        (Some(text), _, _) => Ok(LocationSignal::Text(text)),
        (None, Some(lat), Some(lon)) => {
            Ok(LocationSignal::Coordinates(Coordinates::new(lat, lon)?))
        }
        (None, None, None) => Ok(LocationSignal::CurrentLocation),
        _ => Err(WeatherProError::validation("Both lat and lon are required")),
    }
}

/// Address worth handing to the IP lookup; local peers let the provider
/// use the address it sees instead
fn lookup_address(peer: IpAddr) -> Option<IpAddr> {
    let peer = peer.to_canonical();
    let local = match peer {
        IpAddr::V4(ip) => {
            ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
        }
        IpAddr::V6(ip) => ip.is_loopback() || ip.is_unspecified(),
    };
    (!local).then_some(peer)
}

fn rejected(rejection: QueryRejection) -> ApiError {
    ApiError::Cycle(WeatherProError::validation(rejection.body_text()))
}

async fn get_weather(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Json<DashboardView>, ApiError> {
    let Query(params) = params.map_err(rejected)?;
    let signal = signal_from(params)?;
    let query = state
        .resolver
        .resolve_for_client(signal, lookup_address(peer.ip()))
        .await?;
    let weather = state.aggregator.aggregate(&query).await?;

    info!("Served weather for {}", weather.location().display_name());
    Ok(Json(DashboardView::from(&weather)))
}

async fn get_search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<SuggestionView>>, ApiError> {
    let Query(params) = params.map_err(rejected)?;
    let suggestions = suggest::lookup(state.provider.as_ref(), &params.q, state.min_query_chars)
        .await
        .map_err(ApiError::Search)?;

    Ok(Json(suggestions.iter().map(SuggestionView::from).collect()))
}

async fn get_health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: crate::VERSION,
    })
}

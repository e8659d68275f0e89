use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::currency::{self, Language};
use crate::location::{city_list as gazetteer_cities, CityInfo, LocationSource};
use crate::quote::QuoteState;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn parse_language(lang: Option<&str>, default: Language) -> Result<Language, ApiError> {
    match lang {
        None => Ok(default),
        Some(s) => s.parse().map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e)),
    }
}

// ─── GET /api/quote ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    pub lang: Option<String>,
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteQuery>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let language = parse_language(params.lang.as_deref(), state.quotes.default_language())?;
    let pickup = params.pickup.unwrap_or_default();
    let dropoff = params.dropoff.unwrap_or_default();

    if let rejected @ QuoteState::UserError { .. } = QuoteState::begin(&pickup, &dropoff) {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(rejected)).into_response());
    }

    let worker = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        worker.quotes.calculate_order_cost(&pickup, &dropoff, language)
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let quote_state = QuoteState::from(result);
    tracing::info!(
        lang = %language,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/quote"
    );

    Ok(Json(quote_state).into_response())
}

// ─── GET /api/geocode ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub lat: f64,
    pub lng: f64,
    pub name: Option<String>,
    pub source: LocationSource,
    pub formatted_coords: String,
}

pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let address = params.address.unwrap_or_default();
    if address.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'address' parameter"));
    }

    let worker = Arc::clone(&state);
    let resolved = tokio::task::spawn_blocking(move || worker.geocoder.resolve(&address))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'address' parameter"))?;

    tracing::info!(source = %resolved.source, "GET /api/geocode");

    Ok(Json(GeocodeResponse {
        lat: resolved.coordinates.lat,
        lng: resolved.coordinates.lng,
        formatted_coords: resolved.coordinates.to_string(),
        name: resolved.name,
        source: resolved.source,
    }))
}

// ─── GET /api/fare ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FareQuery {
    pub distance: Option<f64>,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FareResponse {
    pub distance_meters: f64,
    pub fare: f64,
    pub formatted_price: String,
    pub distance_label: String,
}

pub async fn fare(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FareQuery>,
) -> Result<Json<FareResponse>, ApiError> {
    let language = parse_language(params.lang.as_deref(), state.quotes.default_language())?;
    let distance = params
        .distance
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'distance' parameter"))?;
    if !distance.is_finite() || distance < 0.0 {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid distance '{}'. Use meters >= 0.", distance),
        ));
    }

    let fare = state.quotes.schedule().fare(distance);

    Ok(Json(FareResponse {
        distance_meters: distance,
        fare,
        formatted_price: state.quotes.display().currency(language).format(fare),
        distance_label: currency::distance_label(distance, language),
    }))
}

// ─── GET /api/cities ─────────────────────────────────────────────

pub async fn city_list() -> Json<Vec<CityInfo>> {
    Json(gazetteer_cities())
}

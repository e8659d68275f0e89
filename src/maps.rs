//! Google Maps web services client (Directions and Geocoding).
//!
//! Blocking, one request per call, no retries. Every failure is reported as a
//! [`MapsError`] so callers can fall back.

use serde::Deserialize;
use std::time::Duration;

use crate::config::MapsConfig;
use crate::currency::Language;
use crate::error::MapsError;
use crate::location::{Coordinates, GeocodeProvider, LocationSource, ResolvedLocation};
use crate::routing::{DirectionsProvider, RouteLeg};

const USER_AGENT: &str = concat!("SafeDrop/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GoogleMaps {
    api_base: String,
    api_key: Option<String>,
    country: String,
    timeout: Option<Duration>,
}

// ─── Wire types ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize, Debug)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Deserialize, Debug)]
struct DirectionsLeg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Deserialize, Debug)]
struct TextValue {
    text: String,
    value: f64,
}

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize, Debug)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    location: Coordinates,
}

// ─── Client ─────────────────────────────────────────────────────

impl GoogleMaps {
    pub fn new(config: &MapsConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            country: config.country.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    fn endpoint(&self, service: &str) -> String {
        format!("https://{}/maps/api/{}/json", self.api_base, service)
    }

    fn get(&self, url: &str) -> Result<ureq::Request, MapsError> {
        let key = self.api_key.as_deref().ok_or(MapsError::MissingApiKey)?;
        let mut req = ureq::get(url)
            .set("User-Agent", USER_AGENT)
            .query("key", key);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        Ok(req)
    }
}

impl DirectionsProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    fn directions(
        &self,
        origin: &str,
        destination: &str,
        language: Language,
    ) -> Result<RouteLeg, MapsError> {
        let response = self
            .get(&self.endpoint("directions"))?
            .query("origin", origin)
            .query("destination", destination)
            .query("mode", "driving")
            .query("language", language.code())
            .call()?;

        let data: DirectionsResponse = response
            .into_json()
            .map_err(|e| MapsError::InvalidResponse(e.to_string()))?;

        parse_directions(data)
    }
}

impl GeocodeProvider for GoogleMaps {
    #[tracing::instrument(skip(self))]
    fn geocode(&self, address: &str) -> Result<ResolvedLocation, MapsError> {
        let response = self
            .get(&self.endpoint("geocode"))?
            .query("address", address)
            .query("components", &format!("country:{}", self.country))
            .call()?;

        let data: GeocodeResponse = response
            .into_json()
            .map_err(|e| MapsError::InvalidResponse(e.to_string()))?;

        parse_geocode(address, data)
    }
}

fn parse_directions(data: DirectionsResponse) -> Result<RouteLeg, MapsError> {
    if data.status != "OK" {
        return Err(MapsError::Status(data.status));
    }

    let leg = data
        .routes
        .into_iter()
        .next()
        .and_then(|route| route.legs.into_iter().next())
        .ok_or_else(|| MapsError::InvalidResponse("no route legs".into()))?;

    if !leg.distance.value.is_finite() || leg.distance.value < 0.0 {
        return Err(MapsError::InvalidResponse(format!(
            "bad leg distance {}",
            leg.distance.value
        )));
    }

    tracing::debug!(distance = %leg.distance.text, duration = %leg.duration.text, "route leg");

    Ok(RouteLeg {
        distance_meters: leg.distance.value,
        duration_text: leg.duration.text,
    })
}

fn parse_geocode(address: &str, data: GeocodeResponse) -> Result<ResolvedLocation, MapsError> {
    match data.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(MapsError::NoResults(address.to_string())),
        _ => return Err(MapsError::Status(data.status)),
    }

    let first = data
        .results
        .into_iter()
        .next()
        .ok_or_else(|| MapsError::NoResults(address.to_string()))?;

    let location = first.geometry.location;
    let coordinates = Coordinates::new(location.lat, location.lng).ok_or_else(|| {
        MapsError::InvalidResponse(format!("coordinates out of range: {}, {}", location.lat, location.lng))
    })?;

    Ok(ResolvedLocation {
        coordinates,
        name: first.formatted_address,
        source: LocationSource::Remote,
    })
}

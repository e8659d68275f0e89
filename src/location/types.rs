//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Riyadh, returned whenever an address cannot be placed.
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    lat: 24.7136,
    lng: 46.6753,
};

impl Coordinates {
    /// Validating constructor. Returns `None` outside the valid degree ranges.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Some(Self { lat, lng })
        } else {
            None
        }
    }

    /// Rough national bounding box.
    pub fn in_saudi_arabia(&self) -> bool {
        (16.0..=32.5).contains(&self.lat) && (34.0..=56.0).contains(&self.lng)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lng >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}°{}, {:.4}°{}", self.lat.abs(), ns, self.lng.abs(), ew)
    }
}

/// How an address was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Gazetteer,
    Remote,
    Default,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gazetteer => write!(f, "Built-in"),
            Self::Remote => write!(f, "Geocoding API"),
            Self::Default => write!(f, "Default"),
        }
    }
}

/// A resolved address with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    /// Gazetteer city name or the geocoder's formatted address.
    #[serde(default)]
    pub name: Option<String>,
    pub source: LocationSource,
}

//! Address resolver: gazetteer, then the geocoding API, then the default.
//!
//! Flow:  empty → None
//!        gazetteer → remote geocoder (one call, no retry) → default coordinate

use super::gazetteer;
use super::types::{Coordinates, LocationSource, ResolvedLocation, DEFAULT_COORDINATES};
use crate::error::MapsError;

/// A remote geocoding lookup scoped to the service country.
pub trait GeocodeProvider: Send + Sync {
    fn geocode(&self, address: &str) -> Result<ResolvedLocation, MapsError>;
}

/// Resolves free-text addresses to coordinates. Never fails for non-empty input.
pub struct Geocoder {
    provider: Box<dyn GeocodeProvider>,
    offline: bool,
}

impl Geocoder {
    pub fn new(provider: Box<dyn GeocodeProvider>) -> Self {
        Self {
            provider,
            offline: false,
        }
    }

    /// Offline mode skips the remote geocoder.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Resolve an address to coordinates. `None` only for empty input.
    pub fn resolve_coordinates(&self, address: &str) -> Option<Coordinates> {
        self.resolve(address).map(|loc| loc.coordinates)
    }

    /// Resolve an address through the full fallback chain, keeping provenance.
    pub fn resolve(&self, address: &str) -> Option<ResolvedLocation> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        // 1. Built-in gazetteer
        if let Some(loc) = gazetteer::lookup(address) {
            tracing::debug!(address, city = ?loc.name, "gazetteer hit");
            return Some(loc);
        }

        // 2. Remote geocoder
        if !self.offline {
            match self.provider.geocode(address) {
                Ok(loc) => {
                    if !loc.coordinates.in_saudi_arabia() {
                        tracing::debug!(address, coords = %loc.coordinates, "geocoded outside national box");
                    }
                    return Some(loc);
                }
                Err(e) => tracing::warn!(address, error = %e, "geocoding failed, using default coordinate"),
            }
        }

        // 3. Capital
        Some(ResolvedLocation {
            coordinates: DEFAULT_COORDINATES,
            name: None,
            source: LocationSource::Default,
        })
    }
}

//! Driving directions seam.

use crate::currency::Language;
use crate::error::MapsError;

/// Distance and duration of the first leg of a driving route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub distance_meters: f64,
    /// Localized duration text as produced by the directions service.
    pub duration_text: String,
}

/// A driving directions lookup between two free-text addresses.
pub trait DirectionsProvider: Send + Sync {
    fn directions(
        &self,
        origin: &str,
        destination: &str,
        language: Language,
    ) -> Result<RouteLeg, MapsError>;
}

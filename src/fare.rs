//! Fare estimation: a flat minimum plus a marginal per-meter rate.

use serde::{Deserialize, Serialize};

/// Flat fare for any trip up to [`BASE_DISTANCE_M`], in SAR.
pub const MIN_FARE: f64 = 10.0;

/// Distance covered by the minimum fare, in meters.
pub const BASE_DISTANCE_M: f64 = 2000.0;

/// Marginal rate beyond the base distance, in SAR per meter (2 SAR/km).
pub const RATE_PER_METER: f64 = 0.002;

/// Pricing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareSchedule {
    pub min_fare: f64,
    pub base_distance_m: f64,
    pub rate_per_meter: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            min_fare: MIN_FARE,
            base_distance_m: BASE_DISTANCE_M,
            rate_per_meter: RATE_PER_METER,
        }
    }
}

impl FareSchedule {
    /// Price of a trip of `distance_meters`.
    ///
    /// Callers pass non-negative distances; the value is not validated.
    /// The result is truncated (not rounded) to two decimals.
    pub fn fare(&self, distance_meters: f64) -> f64 {
        if distance_meters <= self.base_distance_m {
            return self.min_fare;
        }
        let raw = self.min_fare + (distance_meters - self.base_distance_m) * self.rate_per_meter;
        truncate_cents(raw)
    }
}

/// Price of a trip under the default schedule.
pub fn estimate_fare(distance_meters: f64) -> f64 {
    FareSchedule::default().fare(distance_meters)
}

/// Floor to two decimals. The small nudge keeps values such as 16.34, whose
/// binary form sits just below the cent, from losing a cent.
fn truncate_cents(amount: f64) -> f64 {
    (amount * 100.0 + 1e-6).floor() / 100.0
}

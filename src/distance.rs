//! Text-based distance guess, used only when the directions service is
//! unreachable.
//!
//! The guess is intentionally rough: a shared area token between the two
//! addresses means a short in-city hop, otherwise longer addresses are taken to
//! mean longer trips. Every result lies in [`MIN_HEURISTIC_KM`, `MAX_HEURISTIC_KM`].

use rand::Rng;
use std::collections::HashSet;

pub const MIN_HEURISTIC_KM: f64 = 2.0;
pub const MAX_HEURISTIC_KM: f64 = 80.0;

/// Tokens must be longer than this (in characters) to count as shared.
const MIN_SHARED_TOKEN_CHARS: usize = 3;

const SAME_AREA_KM: (f64, f64) = (3.0, 11.0);
const SHORT_TEXT_KM: (f64, f64) = (5.0, 20.0);
const MEDIUM_TEXT_KM: (f64, f64) = (10.0, 35.0);
const LONG_TEXT_KM: (f64, f64) = (15.0, 55.0);

const SHORT_TEXT_CHARS: usize = 30;
const MEDIUM_TEXT_CHARS: usize = 60;

/// Source of uniform samples for the heuristic.
pub trait RandomSource {
    /// A value in `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..=high)
    }
}

/// Which length bucket an address pair fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceBucket {
    SameArea,
    Short,
    Medium,
    Long,
}

impl DistanceBucket {
    /// Kilometer range the bucket samples from.
    pub fn range_km(self) -> (f64, f64) {
        match self {
            Self::SameArea => SAME_AREA_KM,
            Self::Short => SHORT_TEXT_KM,
            Self::Medium => MEDIUM_TEXT_KM,
            Self::Long => LONG_TEXT_KM,
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '،' | ';' | '؛')
}

fn area_tokens(address: &str) -> HashSet<String> {
    address
        .to_lowercase()
        .split(is_separator)
        .filter(|t| t.chars().count() > MIN_SHARED_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Classify an address pair.
pub fn bucket(pickup: &str, dropoff: &str) -> DistanceBucket {
    let pickup_tokens = area_tokens(pickup);
    if area_tokens(dropoff).iter().any(|t| pickup_tokens.contains(t)) {
        return DistanceBucket::SameArea;
    }

    let combined = pickup.chars().count() + dropoff.chars().count();
    if combined < SHORT_TEXT_CHARS {
        DistanceBucket::Short
    } else if combined < MEDIUM_TEXT_CHARS {
        DistanceBucket::Medium
    } else {
        DistanceBucket::Long
    }
}

/// Clamp a kilometer distance into the heuristic range. Idempotent.
pub fn clamp_km(km: f64) -> f64 {
    km.clamp(MIN_HEURISTIC_KM, MAX_HEURISTIC_KM)
}

/// Guess a road distance in whole meters from the address text alone.
pub fn estimate_distance(pickup: &str, dropoff: &str, rng: &mut impl RandomSource) -> f64 {
    let (low, high) = bucket(pickup, dropoff).range_km();
    let km = clamp_km(rng.uniform(low, high));
    (km * 1000.0).round()
}

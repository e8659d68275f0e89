//! Order cost calculation.
//!
//! Flow:  validate addresses → directions (one attempt) → text heuristic on any
//!        failure → fare → localized labels
//!
//! The service keeps no state between calls. Presentation state belongs to
//! the caller, see [`QuoteState`].

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::currency::{self, Language};
use crate::distance::{self, RandomSource};
use crate::error::{AddressField, QuoteError};
use crate::fare::FareSchedule;
use crate::location::{Geocoder, ResolvedLocation};
use crate::routing::DirectionsProvider;

/// Minimum duration shown for a heuristic estimate, in minutes.
const MIN_HEURISTIC_MINUTES: f64 = 15.0;
/// Assumed minutes per kilometer for a heuristic estimate.
const MINUTES_PER_KM: f64 = 2.0;

/// Distance estimate with its origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    Routed {
        distance_meters: f64,
        duration_text: String,
    },
    Heuristic {
        distance_meters: f64,
        duration_minutes: u32,
    },
}

impl Estimate {
    pub fn distance_meters(&self) -> f64 {
        match self {
            Self::Routed { distance_meters, .. } | Self::Heuristic { distance_meters, .. } => {
                *distance_meters
            }
        }
    }

    pub fn basis(&self) -> EstimateBasis {
        match self {
            Self::Routed { .. } => EstimateBasis::Routed,
            Self::Heuristic { .. } => EstimateBasis::Heuristic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateBasis {
    Routed,
    Heuristic,
}

/// What the caller displays for an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCost {
    pub fare: f64,
    pub formatted_price: String,
    pub distance_meters: f64,
    pub distance_label: String,
    pub duration_label: String,
    pub basis: EstimateBasis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup: Option<ResolvedLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropoff: Option<ResolvedLocation>,
}

/// Caller-owned presentation state of a cost calculation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuoteState {
    #[default]
    Idle,
    Calculating,
    Done { cost: OrderCost },
    UserError { error: String, field: AddressField },
}

impl QuoteState {
    /// State entered when a calculation is requested: `Calculating` when both
    /// addresses are present, `UserError` otherwise.
    pub fn begin(pickup: &str, dropoff: &str) -> Self {
        match validate(pickup, dropoff) {
            Ok(()) => Self::Calculating,
            Err(e) => e.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

impl From<QuoteError> for QuoteState {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::MissingAddress(field) => Self::UserError {
                error: err.to_string(),
                field,
            },
        }
    }
}

impl From<Result<OrderCost, QuoteError>> for QuoteState {
    fn from(result: Result<OrderCost, QuoteError>) -> Self {
        match result {
            Ok(cost) => Self::Done { cost },
            Err(e) => e.into(),
        }
    }
}

fn validate(pickup: &str, dropoff: &str) -> Result<(), QuoteError> {
    if pickup.trim().is_empty() {
        return Err(QuoteError::MissingAddress(AddressField::Pickup));
    }
    if dropoff.trim().is_empty() {
        return Err(QuoteError::MissingAddress(AddressField::Dropoff));
    }
    Ok(())
}

/// Computes fare quotes for pickup/dropoff pairs.
pub struct QuoteService {
    directions: Box<dyn DirectionsProvider>,
    geocoder: Option<Geocoder>,
    schedule: FareSchedule,
    display: DisplayConfig,
    offline: bool,
}

impl QuoteService {
    pub fn new(directions: Box<dyn DirectionsProvider>, schedule: FareSchedule, display: DisplayConfig) -> Self {
        Self {
            directions,
            geocoder: None,
            schedule,
            display,
            offline: false,
        }
    }

    /// Attach a geocoder so quotes carry pickup/dropoff map markers.
    pub fn with_geocoder(mut self, geocoder: Geocoder) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Offline mode skips the directions call and the remote geocoder.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
        if let Some(geocoder) = self.geocoder.as_mut() {
            geocoder.set_offline(offline);
        }
    }

    pub fn geocoder(&self) -> Option<&Geocoder> {
        self.geocoder.as_ref()
    }

    pub fn schedule(&self) -> &FareSchedule {
        &self.schedule
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn default_language(&self) -> Language {
        self.display.default_language
    }

    /// Calculate the cost of an order using the thread-local RNG for the
    /// heuristic fallback.
    pub fn calculate_order_cost(
        &self,
        pickup: &str,
        dropoff: &str,
        language: Language,
    ) -> Result<OrderCost, QuoteError> {
        self.calculate_order_cost_with(pickup, dropoff, language, &mut rand::thread_rng())
    }

    /// Calculate the cost of an order with an explicit random source.
    #[tracing::instrument(skip(self, rng))]
    pub fn calculate_order_cost_with(
        &self,
        pickup: &str,
        dropoff: &str,
        language: Language,
        rng: &mut impl RandomSource,
    ) -> Result<OrderCost, QuoteError> {
        validate(pickup, dropoff)?;
        let (pickup, dropoff) = (pickup.trim(), dropoff.trim());

        let estimate = self.estimate(pickup, dropoff, language, rng);
        let cost = self.present(&estimate, language);

        let (pickup_loc, dropoff_loc) = match &self.geocoder {
            Some(geocoder) => (geocoder.resolve(pickup), geocoder.resolve(dropoff)),
            None => (None, None),
        };

        tracing::info!(
            basis = ?estimate.basis(),
            distance_m = estimate.distance_meters(),
            fare = cost.fare,
            "quote calculated"
        );

        Ok(OrderCost {
            pickup: pickup_loc,
            dropoff: dropoff_loc,
            ..cost
        })
    }

    /// Routed estimate when the directions service answers, heuristic otherwise.
    pub fn estimate(
        &self,
        pickup: &str,
        dropoff: &str,
        language: Language,
        rng: &mut impl RandomSource,
    ) -> Estimate {
        if !self.offline {
            match self.directions.directions(pickup, dropoff, language) {
                Ok(leg) => {
                    return Estimate::Routed {
                        distance_meters: leg.distance_meters,
                        duration_text: leg.duration_text,
                    }
                }
                Err(e) => tracing::warn!(error = %e, "directions failed, using text heuristic"),
            }
        }

        let distance_meters = distance::estimate_distance(pickup, dropoff, rng);
        Estimate::Heuristic {
            distance_meters,
            duration_minutes: heuristic_minutes(distance_meters),
        }
    }

    fn present(&self, estimate: &Estimate, language: Language) -> OrderCost {
        let distance_meters = estimate.distance_meters();
        let fare = self.schedule.fare(distance_meters);

        let duration_label = match estimate {
            Estimate::Routed { duration_text, .. } if !duration_text.trim().is_empty() => {
                duration_text.clone()
            }
            Estimate::Routed { .. } => currency::duration_label(heuristic_minutes(distance_meters), language),
            Estimate::Heuristic { duration_minutes, .. } => {
                currency::duration_label(*duration_minutes, language)
            }
        };

        OrderCost {
            fare,
            formatted_price: self.display.currency(language).format(fare),
            distance_meters,
            distance_label: currency::distance_label(distance_meters, language),
            duration_label,
            basis: estimate.basis(),
            pickup: None,
            dropoff: None,
        }
    }
}

/// `max(15, km × 2)` minutes, rounded to whole minutes.
fn heuristic_minutes(distance_meters: f64) -> u32 {
    let km = distance_meters / 1000.0;
    (km * MINUTES_PER_KM).round().max(MIN_HEURISTIC_MINUTES) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapsError;
    use crate::fare::{MIN_FARE, RATE_PER_METER};
    use crate::location::resolver::tests::FakeGeocoder;
    use crate::location::{Coordinates, LocationSource};
    use crate::routing::RouteLeg;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fake directions service that counts calls.
    struct FakeDirections {
        calls: Arc<AtomicUsize>,
        leg: Option<RouteLeg>,
    }

    impl DirectionsProvider for FakeDirections {
        fn directions(&self, _: &str, _: &str, _: Language) -> Result<RouteLeg, MapsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.leg
                .clone()
                .ok_or_else(|| MapsError::Status("ZERO_RESULTS".into()))
        }
    }

    /// Echoes the distance encoded in the origin text, e.g. "m:7300".
    struct EchoDirections;

    impl DirectionsProvider for EchoDirections {
        fn directions(&self, origin: &str, _: &str, _: Language) -> Result<RouteLeg, MapsError> {
            let meters = origin
                .strip_prefix("m:")
                .and_then(|m| m.parse().ok())
                .ok_or_else(|| MapsError::InvalidResponse(origin.to_string()))?;
            Ok(RouteLeg {
                distance_meters: meters,
                duration_text: format!("{} mins", meters / 500.0),
            })
        }
    }

    fn service(leg: Option<RouteLeg>) -> (QuoteService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fake = FakeDirections { calls: calls.clone(), leg };
        let service = QuoteService::new(Box::new(fake), FareSchedule::default(), DisplayConfig::default());
        (service, calls)
    }

    fn routed(distance_meters: f64, duration_text: &str) -> Option<RouteLeg> {
        Some(RouteLeg {
            distance_meters,
            duration_text: duration_text.into(),
        })
    }

    #[test]
    fn test_empty_address_is_user_error_without_network() {
        let (service, calls) = service(routed(5000.0, "12 mins"));
        let mut rng = StdRng::seed_from_u64(1);

        let err = service
            .calculate_order_cost_with("", "Jeddah", Language::Ar, &mut rng)
            .unwrap_err();
        assert_eq!(err, QuoteError::MissingAddress(AddressField::Pickup));

        let err = service
            .calculate_order_cost_with("Riyadh", "   ", Language::Ar, &mut rng)
            .unwrap_err();
        assert_eq!(err, QuoteError::MissingAddress(AddressField::Dropoff));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_address_with_geocoder_makes_no_calls() {
        let (service, directions_calls) = service(None);
        let (geo, geo_calls) = FakeGeocoder::failing();
        let service = service.with_geocoder(Geocoder::new(Box::new(geo)));

        let state: QuoteState = service.calculate_order_cost("", "", Language::En).into();
        assert!(matches!(state, QuoteState::UserError { field: AddressField::Pickup, .. }));
        assert_eq!(directions_calls.load(Ordering::SeqCst), 0);
        assert_eq!(geo_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_routed_success() {
        let (service, calls) = service(routed(5000.0, "12 دقيقة"));
        let mut rng = StdRng::seed_from_u64(1);

        let cost = service
            .calculate_order_cost_with("حي العليا، الرياض", "حي الملقا، الرياض", Language::Ar, &mut rng)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cost.basis, EstimateBasis::Routed);
        assert_abs_diff_eq!(cost.fare, MIN_FARE + 3000.0 * RATE_PER_METER, epsilon = 1e-9);
        assert_eq!(cost.formatted_price, "16 ر.س");
        assert_eq!(cost.distance_label, "5.0 كم");
        assert_eq!(cost.duration_label, "12 دقيقة");
        assert!(cost.pickup.is_none());
    }

    #[test]
    fn test_routed_distance_is_not_clamped() {
        let (service, _) = service(routed(950_000.0, "9 hours 40 mins"));
        let cost = service
            .calculate_order_cost("Riyadh", "Tabuk", Language::En)
            .unwrap();
        assert_eq!(cost.distance_meters, 950_000.0);
        assert_eq!(cost.formatted_price, "SAR 1906");
    }

    #[test]
    fn test_routed_blank_duration_gets_estimate() {
        let (service, _) = service(routed(40_000.0, ""));
        let cost = service.calculate_order_cost("a", "b", Language::En).unwrap();
        assert_eq!(cost.duration_label, "80 mins");
    }

    #[test]
    fn test_routing_failure_falls_back_to_heuristic() {
        let (service, calls) = service(None);
        let mut rng = StdRng::seed_from_u64(42);

        let cost = service
            .calculate_order_cost_with("Olaya", "Malqa", Language::En, &mut rng)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cost.basis, EstimateBasis::Heuristic);
        assert!(!cost.formatted_price.is_empty());
        assert!(cost.formatted_price.starts_with("SAR "));
        // Short bucket: 5..=20 km
        assert!((5000.0..=20_000.0).contains(&cost.distance_meters));
        let km: f64 = cost.distance_label.trim_end_matches(" km").parse().unwrap();
        assert!((5.0..=20.0).contains(&km));
        assert!(cost.duration_label.ends_with(" mins"));
        assert_abs_diff_eq!(cost.fare, service.schedule().fare(cost.distance_meters), epsilon = 1e-9);
    }

    #[test]
    fn test_heuristic_duration() {
        assert_eq!(heuristic_minutes(2000.0), 15);
        assert_eq!(heuristic_minutes(7_500.0), 15);
        assert_eq!(heuristic_minutes(8_000.0), 16);
        assert_eq!(heuristic_minutes(55_000.0), 110);
    }

    #[test]
    fn test_offline_skips_directions() {
        let (mut service, calls) = service(routed(5000.0, "12 mins"));
        service.set_offline(true);
        let cost = service
            .calculate_order_cost("Riyadh north", "Riyadh south", Language::En)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cost.basis, EstimateBasis::Heuristic);
        assert!((3000.0..=11_000.0).contains(&cost.distance_meters));
    }

    #[test]
    fn test_markers_from_geocoder() {
        let (service, _) = service(routed(5000.0, "12 mins"));
        let remote = Coordinates { lat: 24.8, lng: 46.7 };
        let (geo, geo_calls) = FakeGeocoder::returning(remote);
        let service = service.with_geocoder(Geocoder::new(Box::new(geo)));

        let cost = service
            .calculate_order_cost("Jeddah downtown", "Exit 18 warehouse", Language::En)
            .unwrap();

        let pickup = cost.pickup.unwrap();
        assert_eq!(pickup.source, LocationSource::Gazetteer);
        let dropoff = cost.dropoff.unwrap();
        assert_eq!(dropoff.source, LocationSource::Remote);
        assert_eq!(dropoff.coordinates, remote);
        assert_eq!(geo_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_quote_state_transitions() {
        assert_eq!(QuoteState::default(), QuoteState::Idle);
        assert_eq!(QuoteState::begin("Riyadh", "Jeddah"), QuoteState::Calculating);
        assert!(matches!(
            QuoteState::begin("Riyadh", ""),
            QuoteState::UserError { field: AddressField::Dropoff, .. }
        ));

        let (service, _) = service(routed(5000.0, "12 mins"));
        let state: QuoteState = service.calculate_order_cost("Riyadh", "Jeddah", Language::En).into();
        assert!(state.is_done());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "done");
        assert_eq!(json["cost"]["basis"], "routed");
        assert_eq!(json["cost"]["formatted_price"], "SAR 16");
    }

    #[test]
    fn test_overlapping_calculations_are_independent() {
        let service = Arc::new(QuoteService::new(
            Box::new(EchoDirections),
            FareSchedule::default(),
            DisplayConfig::default(),
        ));

        let handles: Vec<_> = [3000.0, 5000.0, 12_000.0, 40_000.0]
            .into_iter()
            .map(|meters| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    let origin = format!("m:{}", meters);
                    let cost = service
                        .calculate_order_cost(&origin, "anywhere", Language::En)
                        .unwrap();
                    (meters, cost)
                })
            })
            .collect();

        for handle in handles {
            let (meters, cost) = handle.join().unwrap();
            assert_eq!(cost.basis, EstimateBasis::Routed);
            assert_eq!(cost.distance_meters, meters);
            assert_abs_diff_eq!(cost.fare, crate::fare::estimate_fare(meters), epsilon = 1e-9);
        }
    }
}

//! Location subsystem for SafeDrop.
//!
//! Resolves free-text pickup/dropoff addresses to coordinates using a built-in
//! gazetteer of Saudi cities, a remote geocoder, and a fixed default.

pub mod gazetteer;
pub mod resolver;
pub mod types;

pub use gazetteer::{city_list, CityInfo};
pub use resolver::{GeocodeProvider, Geocoder};
pub use types::{Coordinates, LocationSource, ResolvedLocation, DEFAULT_COORDINATES};

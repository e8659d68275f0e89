//! SafeDrop fare engine.
//!
//! Turns a pickup/dropoff address pair into a displayable delivery fare:
//! gazetteer-first geocoding, a routed distance with a text heuristic
//! fallback, a two-tier fare formula, and Arabic/English price labels.

pub mod config;
pub mod currency;
pub mod distance;
pub mod error;
pub mod fare;
pub mod location;
pub mod maps;
pub mod quote;
pub mod routing;
pub mod server;

pub use config::Config;
pub use currency::Language;
pub use error::{MapsError, QuoteError};
pub use fare::estimate_fare;
pub use quote::{OrderCost, QuoteService, QuoteState};

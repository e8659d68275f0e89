//! Error types.
//!
//! Only [`QuoteError`] ever reaches a caller of the quote pipeline. Provider
//! failures ([`MapsError`]) are absorbed by the fallback chain and logged.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures of the remote maps services.
#[derive(Debug, Error)]
pub enum MapsError {
    #[error("no maps API key configured")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(String),
    #[error("maps service returned status {0}")]
    Status(String),
    #[error("invalid maps response: {0}")]
    InvalidResponse(String),
    #[error("no results for '{0}'")]
    NoResults(String),
}

impl From<ureq::Error> for MapsError {
    fn from(err: ureq::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Which address of an order is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Pickup,
    Dropoff,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Dropoff => write!(f, "dropoff"),
        }
    }
}

/// User input errors of a cost calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("missing {0} address")]
    MissingAddress(AddressField),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

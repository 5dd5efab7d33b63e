//! Error types shared by the lookup layers.
//!
//! Clients and location providers fail with their own enums; the service folds
//! both into [`LookupError`] so the presentation layer only ever sees one type.

use thiserror::Error;

/// Failures of the remote weather service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Weather API error: {0}")]
    Api(String),
}

/// Failures while resolving the device location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission not granted")]
    PermissionDenied,
    #[error("Location unavailable")]
    Unavailable,
    #[error("Location provider failed: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Coarse classification of a [`LookupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Api,
    Permission,
    LocationUnavailable,
    Provider,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::Weather(WeatherError::Network(_)) => ErrorKind::Network,
            LookupError::Weather(WeatherError::Api(_)) => ErrorKind::Api,
            LookupError::Location(LocationError::PermissionDenied) => ErrorKind::Permission,
            LookupError::Location(LocationError::Unavailable) => ErrorKind::LocationUnavailable,
            LookupError::Location(LocationError::Provider(_)) => ErrorKind::Provider,
        }
    }
}

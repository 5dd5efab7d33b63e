//! Core library for the weather app.
//!
//! This crate defines:
//! - Configuration & the last-searched-city preference
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - Device location resolution with permission checks
//! - The lookup service and the observable presentation controller
//!
//! It is used by `weatherapp-cli`, but any other front end can drive
//! [`WeatherController`] the same way.

pub mod config;
pub mod controller;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;

pub use config::{Config, LocationConfig};
pub use controller::{ControllerSettings, UiState, WeatherController};
pub use error::{ErrorKind, LocationError, LookupError, WeatherError};
pub use location::{
    LastLocationSource, LocationPermissions, LocationProvider, PermissionCheck,
    PlatformLocationProvider, StaticLocationSource,
};
pub use model::{DeviceLocation, LookupOutcome, WeatherQuery, WeatherResult};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use service::WeatherService;
pub use store::{FilePreferenceStore, PreferenceStore};

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config,
    error::WeatherError,
    model::WeatherResult,
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Remote source of current weather conditions.
///
/// Every call is one fresh request: no retry, no caching.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_by_city(&self, city: &str, api_key: &str) -> Result<WeatherResult, WeatherError>;

    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        api_key: &str,
    ) -> Result<WeatherResult, WeatherError>;
}

/// Construct the weather provider described by config.
pub fn provider_from_config(config: &Config) -> Arc<dyn WeatherProvider> {
    Arc::new(OpenWeatherProvider::with_base_url(config.base_url.clone()))
}

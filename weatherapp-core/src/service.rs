//! Weather lookups by city, by coordinates, and by device location.
//!
//! Every collaborator failure is folded into a [`LookupOutcome`]; nothing
//! escapes this layer as a panic or an unhandled error.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::{LocationError, LookupError},
    location::LocationProvider,
    model::{LookupOutcome, WeatherQuery},
    provider::WeatherProvider,
    store::PreferenceStore,
};

pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn PreferenceStore>,
    location: Arc<dyn LocationProvider>,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn PreferenceStore>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        Self { provider, store, location }
    }

    /// Look up `city` and remember it as the last searched city on success.
    pub async fn lookup_by_city(&self, city: &str, api_key: &str) -> LookupOutcome {
        let result = self.fetch(WeatherQuery::ByCity(city.to_owned()), api_key).await?;
        self.store.save_last_city(city);

        Ok(result)
    }

    pub async fn lookup_by_coordinates(&self, lat: f64, lon: f64, api_key: &str) -> LookupOutcome {
        self.fetch(WeatherQuery::ByCoordinates { lat, lon }, api_key).await
    }

    async fn fetch(&self, query: WeatherQuery, api_key: &str) -> LookupOutcome {
        debug!(?query, "looking up weather");

        let result = match &query {
            WeatherQuery::ByCity(city) => self.provider.fetch_by_city(city, api_key).await,
            WeatherQuery::ByCoordinates { lat, lon } => {
                self.provider.fetch_by_coordinates(*lat, *lon, api_key).await
            }
        };

        Ok(result?)
    }

    /// Look up weather at the device location.
    ///
    /// Only an empty fix falls back to `fallback_city`; permission and
    /// provider failures are returned as they are.
    pub async fn lookup_current_location(&self, api_key: &str, fallback_city: &str) -> LookupOutcome {
        match self.location.current_location().await {
            Ok(location) => {
                self.lookup_by_coordinates(location.latitude, location.longitude, api_key)
                    .await
            }
            Err(LocationError::Unavailable) => {
                warn!(fallback_city, "Location is unavailable, using fallback city");
                self.lookup_by_city(fallback_city, api_key).await
            }
            Err(err) => {
                info!(error = %err, "location lookup failed");
                Err(LookupError::Location(err))
            }
        }
    }

    /// Repeat the last successful city search, if there was one.
    pub async fn load_last_searched_city(&self, api_key: &str) -> Option<LookupOutcome> {
        let city = self.last_searched_city()?;
        Some(self.lookup_by_city(&city, api_key).await)
    }

    pub fn last_searched_city(&self) -> Option<String> {
        self.store.last_city()
    }
}

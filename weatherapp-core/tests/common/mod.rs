//! Hand-written fakes for the three capabilities the service depends on.

#![allow(dead_code)]

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::Notify;

use weatherapp_core::{
    ControllerSettings, DeviceLocation, LocationError, LocationProvider, PreferenceStore,
    WeatherController, WeatherError, WeatherProvider, WeatherQuery, WeatherResult, WeatherService,
};

pub const API_KEY: &str = "TEST_KEY";

pub const NEW_YORK: DeviceLocation = DeviceLocation { latitude: 40.7128, longitude: -74.0060 };

pub fn reading(name: &str, temp: f64, description: &str, icon: &str) -> WeatherResult {
    WeatherResult {
        location_name: name.to_string(),
        temperature_c: temp,
        humidity_pct: 60,
        description: description.to_string(),
        icon_id: icon.to_string(),
    }
}

pub fn dallas() -> WeatherResult {
    reading("Dallas", 22.0, "Clear sky", "01d")
}

pub fn new_york() -> WeatherResult {
    reading("New York", 22.0, "Clear sky", "01d")
}

/// Weather provider with canned replies that records every query.
///
/// Cities without a canned reply fail with an API error. With a gate set,
/// each call waits for one `notify_one` before replying.
#[derive(Debug, Default)]
pub struct FakeProvider {
    cities: HashMap<String, Result<WeatherResult, WeatherError>>,
    coordinates: Option<Result<WeatherResult, WeatherError>>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<WeatherQuery>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: &str, reply: Result<WeatherResult, WeatherError>) -> Self {
        self.cities.insert(city.to_string(), reply);
        self
    }

    pub fn with_coordinates(mut self, reply: Result<WeatherResult, WeatherError>) -> Self {
        self.coordinates = Some(reply);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<WeatherQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn city_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|q| matches!(q, WeatherQuery::ByCity(_)))
            .count()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn fetch_by_city(&self, city: &str, _: &str) -> Result<WeatherResult, WeatherError> {
        self.calls.lock().unwrap().push(WeatherQuery::ByCity(city.to_string()));
        self.wait_for_gate().await;

        self.cities
            .get(city)
            .cloned()
            .unwrap_or_else(|| Err(WeatherError::Api("city not found".into())))
    }

    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        _: &str,
    ) -> Result<WeatherResult, WeatherError> {
        self.calls.lock().unwrap().push(WeatherQuery::ByCoordinates { lat, lon });
        self.wait_for_gate().await;

        self.coordinates
            .clone()
            .unwrap_or_else(|| Err(WeatherError::Network("no route".into())))
    }
}

/// Provider whose every call panics, standing in for an unexpected fault.
#[derive(Debug)]
pub struct PanickingProvider;

#[async_trait]
impl WeatherProvider for PanickingProvider {
    async fn fetch_by_city(&self, _: &str, _: &str) -> Result<WeatherResult, WeatherError> {
        panic!("provider blew up");
    }

    async fn fetch_by_coordinates(&self, _: f64, _: f64, _: &str) -> Result<WeatherResult, WeatherError> {
        panic!("provider blew up");
    }
}

#[derive(Debug, Default)]
pub struct FakeStore {
    city: Mutex<Option<String>>,
    saves: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with_city(city: &str) -> Self {
        Self {
            city: Mutex::new(Some(city.to_string())),
            saves: Mutex::default(),
        }
    }

    pub fn saves(&self) -> Vec<String> {
        self.saves.lock().unwrap().clone()
    }
}

impl PreferenceStore for FakeStore {
    fn save_last_city(&self, city: &str) {
        self.saves.lock().unwrap().push(city.to_string());
        *self.city.lock().unwrap() = Some(city.to_string());
    }

    fn last_city(&self) -> Option<String> {
        self.city.lock().unwrap().clone()
    }
}

#[derive(Debug)]
pub struct FakeLocation {
    reply: Result<DeviceLocation, LocationError>,
    calls: Mutex<usize>,
}

impl FakeLocation {
    pub fn new(reply: Result<DeviceLocation, LocationError>) -> Self {
        Self { reply, calls: Mutex::new(0) }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn current_location(&self) -> Result<DeviceLocation, LocationError> {
        *self.calls.lock().unwrap() += 1;
        self.reply.clone()
    }
}

pub struct Harness {
    pub provider: Arc<FakeProvider>,
    pub store: Arc<FakeStore>,
    pub location: Arc<FakeLocation>,
    pub service: Arc<WeatherService>,
}

impl Harness {
    pub fn new(
        provider: FakeProvider,
        store: FakeStore,
        location: Result<DeviceLocation, LocationError>,
    ) -> Self {
        let provider = Arc::new(provider);
        let store = Arc::new(store);
        let location = Arc::new(FakeLocation::new(location));
        let service = Arc::new(WeatherService::new(
            provider.clone(),
            store.clone(),
            location.clone(),
        ));

        Self { provider, store, location, service }
    }

    pub fn controller(&self) -> WeatherController {
        controller_for(self.service.clone())
    }
}

pub fn controller_for(service: Arc<WeatherService>) -> WeatherController {
    WeatherController::new(
        service,
        ControllerSettings {
            api_key: API_KEY.to_string(),
            fallback_city: "Dallas".to_string(),
        },
    )
}

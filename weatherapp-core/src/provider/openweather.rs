use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{error::WeatherError, model::WeatherResult};

use super::WeatherProvider;

/// OpenWeather "current weather" endpoint client.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, query: &[(&str, &str)]) -> Result<WeatherResult, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        debug!(%url, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                WeatherError::Network(format!("Failed to send request to OpenWeather: {e}"))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Network(format!("Failed to read OpenWeather response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(WeatherError::Api(format!(
                "OpenWeather request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Api(format!("Failed to parse OpenWeather current JSON: {e}"))
        })?;

        parsed.into_result()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

impl OwCurrentResponse {
    fn into_result(self) -> Result<WeatherResult, WeatherError> {
        let condition = self.weather.into_iter().next().ok_or_else(|| {
            WeatherError::Api("OpenWeather response contained no weather conditions".to_string())
        })?;

        Ok(WeatherResult {
            location_name: self.name,
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            description: condition.description,
            icon_id: condition.icon,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_by_city(&self, city: &str, api_key: &str) -> Result<WeatherResult, WeatherError> {
        self.fetch_current(&[("q", city), ("appid", api_key), ("units", "metric")])
            .await
    }

    async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        api_key: &str,
    ) -> Result<WeatherResult, WeatherError> {
        let lat = lat.to_string();
        let lon = lon.to_string();

        self.fetch_current(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", api_key),
            ("units", "metric"),
        ])
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

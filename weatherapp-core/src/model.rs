use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// What the user asked weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    ByCity(String),
    ByCoordinates { lat: f64, lon: f64 },
}

/// A single current-conditions reading, as shown on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub location_name: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub description: String,
    pub icon_id: String,
}

impl WeatherResult {
    /// Image URL for the condition icon, e.g. `{img_base}/01d@2x.png`.
    pub fn icon_url(&self, img_base: &str) -> String {
        format!("{}/{}@2x.png", img_base.trim_end_matches('/'), self.icon_id)
    }
}

/// Last known device fix. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Result of one lookup as handed to the presentation layer.
pub type LookupOutcome = Result<WeatherResult, LookupError>;

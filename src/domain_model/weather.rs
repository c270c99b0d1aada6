use serde::{Deserialize, Serialize};

/// Current conditions for one looked-up city, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_mps: f64,
    pub pressure_hpa: u32,
    pub description: String,
    pub icon: String,
}

impl WeatherReport {
    /// Image URL for the provider's condition icon.
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@4x.png", self.icon)
    }
}

use crate::application_port::{WeatherError, WeatherService};
use crate::domain_model::WeatherReport;
use serde::Deserialize;

/// Client for the provider's "current weather" endpoint. One GET per
/// lookup, metric units requested explicitly; any non-success status is a
/// lookup failure carrying the status code.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            units: units.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherPayload {
    name: String,
    sys: PayloadSys,
    main: PayloadMain,
    wind: PayloadWind,
    weather: Vec<PayloadCondition>,
}

#[derive(Debug, Deserialize)]
struct PayloadSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct PayloadMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct PayloadWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct PayloadCondition {
    description: String,
    icon: String,
}

impl CurrentWeatherPayload {
    fn into_report(self) -> Result<WeatherReport, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Decode("payload carries no condition entry".to_owned()))?;
        Ok(WeatherReport {
            city: self.name,
            country: self.sys.country,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_mps: self.wind.speed,
            pressure_hpa: self.main.pressure,
            description: condition.description,
            icon: condition.icon,
        })
    }
}

#[async_trait::async_trait]
impl WeatherService for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        tracing::debug!(city, "fetching current weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                code: status.as_u16(),
            });
        }

        let payload: CurrentWeatherPayload = response
            .json()
            .await
            .map_err(|e| WeatherError::Decode(e.to_string()))?;
        payload.into_report()
    }
}

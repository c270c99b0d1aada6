use crate::domain_model::WeatherReport;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather lookup failed (status {code})")]
    Status { code: u16 },
    #[error("weather request failed: {0}")]
    Network(String),
    #[error("malformed weather payload: {0}")]
    Decode(String),
}

/// One-shot lookup against the external weather API. No retry, no cache;
/// this is the only suspension point in the system.
#[async_trait::async_trait]
pub trait WeatherService: Send + Sync {
    async fn current_weather(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

use crate::application_port::WeatherService;
use crate::domain_model::WeatherReport;
use std::sync::Arc;

/// City lookup widget on the public dashboard: one request, one response,
/// no retries. On failure the previous report stays on screen next to the
/// error message.
pub struct WeatherView {
    service: Arc<dyn WeatherService>,
    pub city: String,
    pub report: Option<WeatherReport>,
    pub error: Option<String>,
}

impl WeatherView {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self {
            service,
            city: String::new(),
            report: None,
            error: None,
        }
    }

    pub async fn lookup(&mut self) {
        self.error = None;
        let city = self.city.trim();
        if city.is_empty() {
            self.error = Some("Please enter a city name".to_owned());
            return;
        }

        match self.service.current_weather(city).await {
            Ok(report) => self.report = Some(report),
            Err(e) => {
                tracing::debug!("weather lookup failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }
}

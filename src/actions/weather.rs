//! WeatherAPI client for current conditions and the short forecast.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::WeatherConfig;

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: Location,
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Day {
    maxtemp_c: f64,
    mintemp_c: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: String,
    day: Day,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    location: Location,
    forecast: Forecast,
}

pub struct WeatherClient {
    config: WeatherConfig,
    client: Client,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Current conditions for a city, phrased for speech.
    pub async fn current(&self, city: &str) -> Result<String> {
        let url = format!(
            "{}/current.json?key={}&q={}&aqi=no",
            self.config.base_url, self.config.api_key, city
        );
        debug!("Fetching current weather for {city}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Weather request failed")?;
        if !resp.status().is_success() {
            return Err(anyhow!("Weather API returned status {}", resp.status()));
        }

        let data: CurrentResponse = resp
            .json()
            .await
            .context("Failed to parse weather response")?;
        Ok(format!(
            "The current weather in {} is {} with a temperature of {:.1} degrees Celsius.",
            data.location.name, data.current.condition.text, data.current.temp_c
        ))
    }

    /// Forecast sentences, one per day, in upstream order.
    pub async fn forecast(&self, city: &str) -> Result<Vec<String>> {
        let days = self.config.forecast_days;
        let url = format!(
            "{}/forecast.json?key={}&q={}&days={days}&aqi=no&alerts=no",
            self.config.base_url, self.config.api_key, city
        );
        debug!("Fetching {days}-day forecast for {city}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Forecast request failed")?;
        if !resp.status().is_success() {
            return Err(anyhow!("Forecast API returned status {}", resp.status()));
        }

        let data: ForecastResponse = resp
            .json()
            .await
            .context("Failed to parse forecast response")?;
        let city_name = data.location.name;
        Ok(data
            .forecast
            .forecastday
            .into_iter()
            .take(days as usize)
            .map(|fd| {
                format!(
                    "On {}, {city_name} will have {}. The high will be {:.1} degrees Celsius, \
                     and the low will be {:.1} degrees Celsius.",
                    fd.date, fd.day.condition.text, fd.day.maxtemp_c, fd.day.mintemp_c
                )
            })
            .collect())
    }
}

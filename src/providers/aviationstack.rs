use crate::core::models::FlightQueryResponse;
use crate::core::settings::ApiSettings;
use crate::providers::{FetchError, FlightDataClient};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;

const FLIGHTS_PATH: &str = "v1/flights";

pub struct AviationstackClient {
    http: reqwest::Client,
    endpoint: Url,
    access_key: String,
}

impl AviationstackClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let access_key = settings
            .access_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .context("No access key configured. Set api.access_key or FLIGHT_TRACKER_ACCESS_KEY")?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: flights_endpoint(&settings.base_url)?,
            access_key,
        })
    }
}

fn flights_endpoint(base_url: &str) -> Result<Url> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };

    Url::parse(&base)
        .and_then(|url| url.join(FLIGHTS_PATH))
        .with_context(|| format!("Invalid provider base URL: {base_url}"))
}

#[async_trait]
impl FlightDataClient for AviationstackClient {
    fn name(&self) -> &'static str {
        "aviationstack"
    }

    async fn fetch(&self, flight_iata: &str) -> Result<FlightQueryResponse, FetchError> {
        tracing::debug!(flight = %flight_iata, endpoint = %self.endpoint, "Requesting flight data");

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("flight_iata", flight_iata),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

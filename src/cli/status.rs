use crate::cli::render::render_flight;
use crate::core::models::FlightSnapshot;
use crate::core::settings::Settings;
use crate::providers::AviationstackClient;
use crate::tracking::{TrackingRepository, INVALID_FLIGHT_MESSAGE};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct StatusOutput<'a> {
    flight_number: &'a str,
    flights: &'a [FlightSnapshot],
    #[serde(with = "chrono::serde::ts_seconds")]
    fetched_at: DateTime<Utc>,
}

pub async fn run(flight: String, json: bool) -> Result<()> {
    let flight = flight.trim();
    if flight.is_empty() {
        anyhow::bail!(INVALID_FLIGHT_MESSAGE);
    }

    let settings = Settings::load()?;
    let client = AviationstackClient::new(&settings.api)?;
    let repository = TrackingRepository::new(Arc::new(client));

    let flights = repository
        .get_flight_info(flight)
        .await
        .with_context(|| format!("Failed to fetch flight data for {flight}"))?;

    if json {
        let output = StatusOutput {
            flight_number: flight,
            flights: &flights,
            fetched_at: Utc::now(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if flights.is_empty() {
        println!("No flight data found for {flight}");
    } else {
        for (i, snapshot) in flights.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", render_flight(snapshot));
        }
    }

    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope returned by the `/v1/flights` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightQueryResponse {
    pub pagination: Option<Pagination>,
    pub data: Option<Vec<FlightSnapshot>>,
}

impl FlightQueryResponse {
    pub fn into_flights(self) -> Vec<FlightSnapshot> {
        self.data.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    pub count: u32,
    pub total: u32,
}

/// One flight's status as reported by the provider at fetch time.
///
/// Every field is optional; the provider omits whatever it does not know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightSnapshot {
    #[serde(rename = "flight_date")]
    pub date: Option<String>,
    #[serde(rename = "flight_status")]
    pub status: Option<String>,
    pub departure: Option<FlightEndpoint>,
    pub arrival: Option<FlightEndpoint>,
    pub airline: Option<Airline>,
    #[serde(rename = "flight")]
    pub designator: Option<FlightDesignator>,
    pub live: Option<LivePosition>,
}

impl FlightSnapshot {
    /// Display code for the flight, preferring the IATA designator.
    pub fn display_code(&self) -> Option<&str> {
        let designator = self.designator.as_ref()?;
        designator
            .iata
            .as_deref()
            .or(designator.number.as_deref())
    }

    pub fn airline_name(&self) -> Option<&str> {
        self.airline.as_ref().and_then(|a| a.name.as_deref())
    }
}

/// Departure or arrival details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightEndpoint {
    pub airport: Option<String>,
    pub timezone: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
    pub terminal: Option<String>,
    pub gate: Option<String>,
    /// Delay in minutes.
    pub delay: Option<i32>,
    pub scheduled: Option<String>,
    pub estimated: Option<String>,
    pub actual: Option<String>,
    pub estimated_runway: Option<String>,
    pub actual_runway: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Airline {
    pub name: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightDesignator {
    pub number: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

/// Live position, only present while the aircraft is being tracked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivePosition {
    pub updated: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Altitude in feet.
    pub altitude: Option<f64>,
    /// Heading in degrees.
    pub direction: Option<f64>,
    /// Ground speed in km/h.
    pub speed_horizontal: Option<f64>,
    pub speed_vertical: Option<f64>,
    pub is_ground: Option<bool>,
}

/// Observable state of the tracking controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackingState {
    pub is_loading: bool,
    pub last_flights: Vec<FlightSnapshot>,
    pub last_error: Option<String>,
    pub flight_number: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrackingState {
    /// The last error as shown to the user; empty when there is none.
    pub fn error_message(&self) -> &str {
        self.last_error.as_deref().unwrap_or("")
    }
}

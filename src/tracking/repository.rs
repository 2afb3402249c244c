use crate::core::models::FlightSnapshot;
use crate::providers::{FetchError, FlightDataClient};
use std::sync::Arc;

/// Normalizes client outcomes into a flat list of snapshots or a [`FetchError`].
#[derive(Clone)]
pub struct TrackingRepository {
    client: Arc<dyn FlightDataClient>,
}

impl TrackingRepository {
    pub fn new(client: Arc<dyn FlightDataClient>) -> Self {
        Self { client }
    }

    /// Fetches every flight the provider reports for `flight_number`.
    ///
    /// A well-formed response without data is an empty success, not a failure.
    pub async fn get_flight_info(
        &self,
        flight_number: &str,
    ) -> Result<Vec<FlightSnapshot>, FetchError> {
        match self.client.fetch(flight_number).await {
            Ok(response) => {
                let flights = response.into_flights();
                tracing::debug!(
                    provider = self.client.name(),
                    flight = %flight_number,
                    count = flights.len(),
                    "Fetched flight data"
                );
                Ok(flights)
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.client.name(),
                    flight = %flight_number,
                    status = ?e.status(),
                    timeout = e.is_timeout(),
                    error = %e,
                    "Failed to fetch flight data"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::core::models::{FlightDesignator, FlightQueryResponse};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// What a [`ScriptedClient`] answers for a given flight number.
    #[derive(Clone)]
    pub enum Reply {
        Flights(Vec<FlightSnapshot>),
        Missing,
        Status(u16, &'static str),
        Malformed,
        Panic(&'static str),
        /// Waits for the gate to be notified, then answers with the flights.
        Gated(Arc<Notify>, Vec<FlightSnapshot>),
    }

    #[derive(Default)]
    pub struct ScriptedClient {
        replies: Mutex<HashMap<String, Reply>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn reply(&self, flight: &str, reply: Reply) {
            self.replies
                .lock()
                .unwrap()
                .insert(flight.to_string(), reply);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl FlightDataClient for ScriptedClient {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn fetch(&self, flight_iata: &str) -> Result<FlightQueryResponse, FetchError> {
            self.calls.lock().unwrap().push(flight_iata.to_string());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .get(flight_iata)
                .cloned()
                .unwrap_or(Reply::Missing);

            match reply {
                Reply::Flights(flights) => Ok(FlightQueryResponse {
                    pagination: None,
                    data: Some(flights),
                }),
                Reply::Missing => Ok(FlightQueryResponse::default()),
                Reply::Status(status, text) => Err(FetchError::Http {
                    status,
                    status_text: text.to_string(),
                }),
                Reply::Malformed => {
                    Err(serde_json::from_str::<FlightQueryResponse>("{").unwrap_err().into())
                }
                Reply::Panic(message) => panic!("{}", message),
                Reply::Gated(gate, flights) => {
                    gate.notified().await;
                    Ok(FlightQueryResponse {
                        pagination: None,
                        data: Some(flights),
                    })
                }
            }
        }
    }

    pub fn flight(iata: &str) -> FlightSnapshot {
        FlightSnapshot {
            status: Some("active".to_string()),
            designator: Some(FlightDesignator {
                number: Some(iata.trim_start_matches(char::is_alphabetic).to_string()),
                iata: Some(iata.to_string()),
                icao: None,
            }),
            ..Default::default()
        }
    }
}

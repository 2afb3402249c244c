mod aviationstack;

use crate::core::models::FlightQueryResponse;
use async_trait::async_trait;

pub use aviationstack::AviationstackClient;

/// Failure of a single provider round trip.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The provider answered with a non-2xx status.
    #[error("{status} {status_text}")]
    Http { status: u16, status_text: String },
    /// Network unreachable, timeout, or any other transport failure.
    ///
    /// The request URL is stripped on conversion since it carries the access key.
    #[error("{}", describe_transport(.0))]
    Transport(reqwest::Error),
    /// The body could not be decoded as a flight query response.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url())
    }
}

/// Renders a transport error with its full cause chain, e.g.
/// `error sending request: client error (Connect): tcp connect error: Connection refused`.
fn describe_transport(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.ends_with(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(err) if err.is_timeout())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A remote source of flight status.
#[async_trait]
pub trait FlightDataClient: Send + Sync {
    fn name(&self) -> &'static str;

    /// Issues exactly one request for `flight_iata`, passed through as given.
    async fn fetch(&self, flight_iata: &str) -> Result<FlightQueryResponse, FetchError>;
}

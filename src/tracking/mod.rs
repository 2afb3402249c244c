mod controller;
mod repository;

pub use controller::{TrackingController, INVALID_FLIGHT_MESSAGE, POLL_INTERVAL};
pub use repository::TrackingRepository;

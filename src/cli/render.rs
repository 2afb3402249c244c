use crate::core::models::{FlightEndpoint, FlightSnapshot, LivePosition, TrackingState};
use chrono::NaiveDateTime;

const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DISPLAY_TIME_FORMAT: &str = "%b %d, %H:%M";
const UNKNOWN: &str = "Unknown";

/// Formats a provider timestamp as `Oct 16, 08:00`.
///
/// Only the local date-time prefix is read; any offset suffix is ignored.
/// Unparsable input is returned verbatim.
pub fn format_time(time: Option<&str>) -> String {
    let Some(time) = time else {
        return UNKNOWN.to_string();
    };

    time.get(..19)
        .and_then(|prefix| NaiveDateTime::parse_from_str(prefix, PROVIDER_TIME_FORMAT).ok())
        .map(|parsed| parsed.format(DISPLAY_TIME_FORMAT).to_string())
        .unwrap_or_else(|| time.to_string())
}

pub fn render_state(state: &TrackingState) -> String {
    let mut lines = vec![match &state.flight_number {
        Some(flight) => format!("Flight Tracker - {flight}"),
        None => "Flight Tracker".to_string(),
    }];

    if state.is_loading {
        lines.push("Loading...".to_string());
    }

    if let Some(error) = state.last_error.as_deref().filter(|e| !e.is_empty()) {
        lines.push(error.to_string());
    }

    if !state.last_flights.is_empty() {
        lines.push(String::new());
        lines.push("Flight Information".to_string());
        for flight in &state.last_flights {
            lines.push(String::new());
            lines.extend(flight_lines(flight));
        }
    }

    if let Some(updated_at) = state.updated_at {
        lines.push(String::new());
        lines.push(format!(
            "Last refreshed: {}",
            updated_at.format(DISPLAY_TIME_FORMAT)
        ));
    }

    join_lines(lines)
}

pub fn render_flight(flight: &FlightSnapshot) -> String {
    join_lines(flight_lines(flight))
}

fn flight_lines(flight: &FlightSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    if flight.designator.is_some() {
        lines.push(format!(
            "Flight: {} {}",
            flight.airline_name().unwrap_or_default(),
            flight.display_code().unwrap_or_default()
        ));
    }

    lines.push(format!(
        "Status: {}",
        flight.status.as_deref().unwrap_or(UNKNOWN)
    ));
    lines.push(endpoint_line("Departure", flight.departure.as_ref()));
    lines.push(endpoint_line("Arrival", flight.arrival.as_ref()));

    match &flight.live {
        Some(live) => lines.extend(live_lines(live)),
        None => lines.push("Live tracking information not available".to_string()),
    }

    lines
}

fn endpoint_line(label: &str, endpoint: Option<&FlightEndpoint>) -> String {
    let airport = endpoint
        .and_then(|e| e.airport.as_deref())
        .unwrap_or(UNKNOWN);
    let scheduled = format_time(endpoint.and_then(|e| e.scheduled.as_deref()));

    let mut line = format!("{label:<10} {airport} ({scheduled})");

    if let Some(endpoint) = endpoint {
        if let Some(terminal) = &endpoint.terminal {
            line.push_str(&format!(" terminal {terminal}"));
        }
        if let Some(gate) = &endpoint.gate {
            line.push_str(&format!(" gate {gate}"));
        }
        if let Some(delay) = endpoint.delay.filter(|d| *d > 0) {
            line.push_str(&format!(" +{delay}m"));
        }
    }
    line
}

fn live_lines(live: &LivePosition) -> Vec<String> {
    let ground = if live.is_ground == Some(true) {
        "On ground"
    } else {
        "In air"
    };

    vec![
        "Live Information".to_string(),
        format!("  Last updated: {}", format_time(live.updated.as_deref())),
        format!(
            "  Position: Lat {}, Long {}",
            display_or_unknown(live.latitude),
            display_or_unknown(live.longitude)
        ),
        format!("  Altitude: {} ft", display_or_unknown(live.altitude)),
        format!("  Speed: {} km/h", display_or_unknown(live.speed_horizontal)),
        format!("  {ground}"),
    ]
}

fn join_lines(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn display_or_unknown(value: Option<f64>) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), |v| v.to_string())
}

use crate::cli::render::render_state;
use crate::core::models::TrackingState;
use crate::core::settings::Settings;
use crate::providers::AviationstackClient;
use crate::tracking::{TrackingController, TrackingRepository};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

pub async fn run(flight: String, json: bool, interval_secs: Option<u64>) -> Result<()> {
    let settings = Settings::load()?;

    let interval = match interval_secs {
        Some(0) => anyhow::bail!("--interval must be greater than 0"),
        Some(secs) => Duration::from_secs(secs),
        None => settings.polling.interval(),
    };

    let client = AviationstackClient::new(&settings.api)?;
    let controller = TrackingController::new(TrackingRepository::new(Arc::new(client)), interval);

    let mut updates = controller.subscribe();
    controller.track(&flight);

    if !controller.is_tracking() {
        anyhow::bail!("{}", controller.state().error_message());
    }

    print_state(&updates.borrow_and_update(), json)?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_state(&state, json)?;
            }
            signal = &mut shutdown => {
                signal.context("Failed to listen for Ctrl-C")?;
                tracing::info!(flight = ?controller.tracked_flight(), "Interrupted, stopping");
                break;
            }
        }
    }

    controller.stop();
    Ok(())
}

fn print_state(state: &TrackingState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(state)?);
    } else {
        println!("{}", render_state(state));
    }
    Ok(())
}

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod core;
mod providers;
mod tracking;

#[derive(Parser)]
#[command(name = "flight-tracker")]
#[command(author, version, about = "Live flight status tracker")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll a flight until interrupted, printing every update
    Track {
        /// Flight IATA code, e.g. BA123
        flight: String,

        /// Output each update as a JSON line
        #[arg(long)]
        json: bool,

        /// Seconds between polls (default: from config, 60)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Fetch a flight's status once
    Status {
        /// Flight IATA code, e.g. BA123
        flight: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Track {
            flight,
            json,
            interval,
        } => {
            init_logging(cli.debug);
            cli::track::run(flight, json, interval).await
        }
        Commands::Status { flight, json } => {
            init_logging(cli.debug);
            cli::status::run(flight, json).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

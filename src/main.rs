use clap::{Parser, Subcommand};
use safedrop::config::Config;
use safedrop::currency::{self, Language};
use safedrop::location::city_list;
use safedrop::quote::QuoteState;
use safedrop::server::{self, AppState};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SafeDrop fare engine: delivery price estimates for Saudi addresses.
///
/// Resolves addresses through a built-in city list and the Geocoding API,
/// measures the trip with the Directions API (or a text heuristic when it is
/// unreachable), and prices it with the SafeDrop fare schedule.
///
/// Examples:
///   safedrop quote "حي العليا، الرياض" "حي الملقا، الرياض"
///   safedrop quote "Jeddah downtown" "King Abdulaziz Airport" --lang en
///   safedrop geocode "Olaya Street, Riyadh"
///   safedrop fare 5000
///   safedrop serve --port 8080
#[derive(Parser)]
#[command(name = "safedrop", version, about, long_about = None)]
struct Cli {
    /// Config file (TOML). Merged over ./safedrop.toml and the global config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Offline mode: only use the built-in city list and the text heuristic.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate the cost of delivering from PICKUP to DROPOFF.
    Quote {
        pickup: String,
        dropoff: String,
        /// Display language (ar, en). Defaults to the configured language.
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
    /// Resolve an address to coordinates.
    Geocode { address: String },
    /// Price a known road distance in meters.
    Fare {
        distance: f64,
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
    /// List the built-in cities.
    Cities,
    /// Run the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("safedrop=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match cli.command {
        Command::Quote { pickup, dropoff, lang } => {
            let language = lang.unwrap_or(config.display.default_language);
            let service = AppState::from_config(&config, cli.offline).quotes;

            let state: QuoteState = match QuoteState::begin(&pickup, &dropoff) {
                QuoteState::Calculating => service.calculate_order_cost(&pickup, &dropoff, language).into(),
                rejected => rejected,
            };

            if let QuoteState::Done { cost } = &state {
                eprintln!("  {}  ·  {}  ·  {}", cost.formatted_price, cost.distance_label, cost.duration_label);
            }
            print_json(&state);

            if !state.is_done() {
                std::process::exit(2);
            }
        }
        Command::Geocode { address } => {
            let geocoder = AppState::from_config(&config, cli.offline).geocoder;

            match geocoder.resolve(&address) {
                Some(loc) => {
                    eprintln!("  {} ({})", loc.coordinates, loc.source);
                    print_json(&loc);
                }
                None => {
                    eprintln!("Error: No address specified.");
                    std::process::exit(1);
                }
            }
        }
        Command::Fare { distance, lang } => {
            if !distance.is_finite() || distance < 0.0 {
                eprintln!("Error: Invalid distance '{}'. Use meters >= 0.", distance);
                std::process::exit(1);
            }
            let language = lang.unwrap_or(config.display.default_language);
            let fare = config.fare.fare(distance);
            print_json(&json!({
                "distance_meters": distance,
                "fare": fare,
                "formatted_price": config.display.currency(language).format(fare),
                "distance_label": currency::distance_label(distance, language),
            }));
        }
        Command::Cities => print_json(&city_list()),
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = AppState::from_config(&config, cli.offline);

            let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
                eprintln!("Error: Cannot start runtime: {}", e);
                std::process::exit(1);
            });
            if let Err(e) = runtime.block_on(server::start(state, &host, port)) {
                eprintln!("Error: Server failed on {}:{}: {}", host, port, e);
                std::process::exit(1);
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

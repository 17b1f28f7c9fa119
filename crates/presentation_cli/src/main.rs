//! PTV CLI
//!
//! Command-line interface for querying the PTV Timetable API.

#![allow(clippy::print_stdout)]

mod settings;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use integration_ptv::{
    DeparturesOptions, DispatchResult, DisruptionStatusOptions, DisruptionsOptions, OptionSet,
    OptionValue, PtvClient, RequestSigner, RouteType, Scalar, SearchOptions,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Settings;

/// PTV CLI
#[derive(Debug, Parser)]
#[command(name = "ptv-cli")]
#[command(author, version, about = "PTV Timetable API CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Settings file (defaults to ./ptv.toml if present)
    #[arg(short, long, env = "PTV_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a signed URL without sending it
    ///
    /// Example: ptv-cli sign /v3/routes route_types=0 route_types=3
    Sign {
        /// API path starting with /v3
        path: String,

        /// Query options as key=value (repeat a key for a list)
        #[arg(value_parser = parse_key_value)]
        options: Vec<(String, String)>,
    },

    #[command(flatten)]
    Api(ApiCommand),
}

/// Commands that send a request to the Timetable API
#[derive(Debug, Subcommand)]
enum ApiCommand {
    /// List transport modes
    RouteTypes,

    /// Search stops, routes and outlets
    ///
    /// Example: ptv-cli search "South Yarra" --route-type train
    Search {
        /// Search term
        term: String,

        /// Restrict to a transport mode (repeatable)
        #[arg(short, long = "route-type")]
        route_types: Vec<RouteType>,
    },

    /// Show departures from a stop
    ///
    /// Example: ptv-cli departures train 1071 --max-results 3
    Departures {
        /// Transport mode (name or 0-4)
        route_type: RouteType,

        /// Stop ID
        stop_id: u32,

        /// Only this route
        #[arg(long)]
        route: Option<u32>,

        /// Departures per route
        #[arg(long)]
        max_results: Option<u32>,
    },

    /// Show disruptions, optionally for a route and/or stop
    Disruptions {
        /// Route ID
        #[arg(long)]
        route: Option<u32>,

        /// Stop ID
        #[arg(long)]
        stop: Option<u32>,
    },

    /// Send a signed GET to any API path
    Get {
        /// API path starting with /v3
        path: String,

        /// Query options as key=value (repeat a key for a list)
        #[arg(value_parser = parse_key_value)]
        options: Vec<(String, String)>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse a `key=value` argument
fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{arg}'")),
    }
}

/// Group `key=value` pairs into options; repeated keys become lists
fn option_set_from_pairs(pairs: Vec<(String, String)>) -> OptionSet {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in pairs {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }

    grouped
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                OptionValue::Scalar(Scalar::Text(values.remove(0)))
            } else {
                OptionValue::from(values)
            };
            (key, value)
        })
        .collect()
}

async fn run(command: Commands, settings: Settings) -> anyhow::Result<()> {
    let (config, credentials) = settings.into_parts()?;
    debug!(
        base_url = %config.base_url,
        developer_id = credentials.developer_id(),
        "Settings loaded"
    );

    match command {
        Commands::Sign { path, options } => {
            let signer = RequestSigner::new(&config.base_url, credentials);
            println!("{}", signer.sign(&path, &option_set_from_pairs(options)));
        },
        Commands::Api(request) => {
            let client = PtvClient::connect(&config, credentials)
                .await
                .context("failed to connect to the PTV Timetable API")?;
            let body = fetch(&client, request).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        },
    }

    Ok(())
}

async fn fetch(client: &PtvClient, request: ApiCommand) -> DispatchResult {
    match request {
        ApiCommand::RouteTypes => client.route_types().await,

        ApiCommand::Search { term, route_types } => {
            let options = SearchOptions {
                route_types,
                ..Default::default()
            };
            client.search(&term, &options).await
        },

        ApiCommand::Departures {
            route_type,
            stop_id,
            route,
            max_results,
        } => {
            let options = DeparturesOptions {
                max_results,
                ..Default::default()
            };
            match route {
                Some(route_id) => {
                    client
                        .departures_by_stop_and_route(route_type, stop_id, route_id, &options)
                        .await
                },
                None => client.departures_by_stop(route_type, stop_id, &options).await,
            }
        },

        ApiCommand::Disruptions { route, stop } => {
            let options = DisruptionStatusOptions::default();
            match (route, stop) {
                (Some(route_id), Some(stop_id)) => {
                    client
                        .disruptions_by_route_and_stop(route_id, stop_id, &options)
                        .await
                },
                (Some(route_id), None) => client.disruptions_by_route(route_id, &options).await,
                (None, Some(stop_id)) => client.disruptions_by_stop(stop_id, &options).await,
                (None, None) => {
                    client
                        .disruptions_all(&DisruptionsOptions::default())
                        .await
                },
            }
        },

        ApiCommand::Get { path, options } => {
            client.get(&path, &option_set_from_pairs(options)).await
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;

    run(cli.command, settings).await
}

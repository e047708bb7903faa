//! # courier-route CLI
//!
//! Plans a delivery round trip from the command line or serves the planner
//! over HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use courier_route::{
    OpenRouteServiceClient, RouteConfig, RouteError, RoutePlan, RoutePlanner, RouteRequest,
    logging, web,
};

/// Command-line interface for courier-route
#[derive(Parser)]
#[command(name = "courier-route")]
#[command(version, about = "Courier route planning with fuel cost estimates")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan a route through the given stops, starting and ending at the first
    Plan(PlanArgs),
    /// Serve the planner over HTTP
    Serve {
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// OpenRouteService API key
    #[arg(long, env = "ORS_API_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Stop name; repeat for every stop
    #[arg(short, long = "location")]
    locations: Vec<String>,

    /// File with one stop name per line
    #[arg(long)]
    locations_file: Option<PathBuf>,

    /// Fuel price per liter
    #[arg(long)]
    fuel_price: Option<f64>,

    /// Fuel efficiency in km per liter
    #[arg(long)]
    fuel_efficiency: Option<f64>,

    /// Traffic level between 0 and 1
    #[arg(long)]
    traffic: Option<f64>,

    /// Seed for reproducible traffic factors
    #[arg(long)]
    seed: Option<u64>,

    /// Write the route map as GeoJSON to this file
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Print the full plan as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<RouteError>() {
                Some(route_err) => eprintln!("Error: {}", route_err.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = RouteConfig::load_from_path(cli.config)?;
    logging::init(&config.logging, cli.verbose)?;

    let client = OpenRouteServiceClient::new(&config.geocoding)?;
    let planner = RoutePlanner::new(client).with_fallback(config.fallback.locations());

    match cli.command {
        Command::Plan(args) => plan(&config, &planner, args).await,
        Command::Serve { port } => web::run(port, Arc::new(planner)).await,
    }
}

async fn plan(
    config: &RouteConfig,
    planner: &RoutePlanner<OpenRouteServiceClient>,
    args: PlanArgs,
) -> Result<()> {
    let mut locations = args.locations;
    if let Some(path) = &args.locations_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        locations.extend(RouteRequest::parse_locations(&text));
    }

    let credential = args
        .key
        .or_else(|| config.geocoding.api_key.clone())
        .unwrap_or_default();

    let mut request = RouteRequest::new(credential, locations, &config.defaults);
    if let Some(price) = args.fuel_price {
        request.fuel_price = price;
    }
    if let Some(efficiency) = args.fuel_efficiency {
        request.fuel_efficiency = efficiency;
    }
    if let Some(traffic) = args.traffic {
        request.traffic_level = traffic;
    }

    let plan = match args.seed {
        Some(seed) => planner.plan_seeded(&request, seed).await?,
        None => planner.plan(&request).await?,
    };

    if let Some(path) = &args.geojson {
        let geojson = serde_json::to_string_pretty(&plan.route_map().to_geojson())?;
        std::fs::write(path, geojson)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan, &config.defaults.currency);
    }
    Ok(())
}

fn print_plan(plan: &RoutePlan, currency: &str) {
    for status in &plan.statuses {
        println!("{status}");
    }
    if plan.fallback_used {
        println!("Using fallback coordinates.");
    }
    println!();
    println!("Optimized Route: {}", plan.route_names().join(" → "));
    println!("Total Distance: {}", plan.summary.format_distance());
    println!("Estimated Cost: {}", plan.summary.format_cost(currency));
}

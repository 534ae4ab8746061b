//! Air quality assessment CLI.
//!
//! Commands:
//! - area: assess a named area
//! - point: assess a geographic point
//! - areas: list the known areas
//! - advise: assess an area, then ask the advisory model a question

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use aqi_kernel::{PipelineConfig, SystemClock};
use aqi_service::advisory::{AdvisoryClient, UserRole, WeatherSnapshot};
use aqi_service::areas::AREAS;
use aqi_service::openaq::{OpenAqClient, DEFAULT_BASE_URL};
use aqi_service::pipeline::{AirQualityPipeline, PipelineOutcome};

#[derive(Parser)]
#[command(name = "aqi-service")]
#[command(version)]
#[command(about = "Air quality assessment from live sensor measurements")]
struct Cli {
    /// OpenAQ API key
    #[arg(long, env = "OPENAQ_API_KEY")]
    api_key: Option<String>,

    /// OpenAQ API root
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    openaq_host: String,

    /// Advisory model host (OpenAI-compatible chat completions API)
    #[arg(long, env = "ADVISORY_HOST", default_value = "http://localhost:8000")]
    advisory_host: String,

    /// Advisory model name
    #[arg(long, default_value = "Qwen/Qwen2.5-7B-Instruct")]
    advisory_model: String,

    /// Radius of the first fetch attempt in kilometers
    #[arg(long, default_value = "5")]
    start_radius_km: u32,

    /// Widest radius attempted before reporting no data
    #[arg(long, default_value = "25")]
    max_radius_km: u32,

    /// Radius increment between attempts
    #[arg(long, default_value = "5")]
    step_km: u32,

    /// Maximum measurements requested per fetch attempt
    #[arg(long, default_value = "50")]
    fetch_limit: usize,

    /// Cache entry time-to-live in seconds
    #[arg(long, default_value = "3600")]
    cache_ttl_secs: u64,

    /// Timeout for a single fetch attempt in seconds
    #[arg(long, default_value = "30")]
    fetch_timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a named area
    Area {
        /// Area identifier (see `areas`)
        area_id: String,
    },

    /// Assess a geographic point
    Point {
        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lon: f64,

        /// Starting search radius in kilometers
        #[arg(long)]
        radius_km: Option<u32>,
    },

    /// List the known areas
    Areas,

    /// Assess an area and ask the advisory model a question about it
    Advise {
        /// Area identifier (see `areas`)
        #[arg(long)]
        area: String,

        /// Who is asking: citizen or authority
        #[arg(long, default_value = "citizen")]
        role: String,

        /// The question to ask
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let config = PipelineConfig {
        start_radius_km: cli.start_radius_km,
        max_radius_km: cli.max_radius_km,
        step_km: cli.step_km,
        fetch_limit: cli.fetch_limit,
        cache_ttl_secs: cli.cache_ttl_secs,
        fetch_timeout_secs: cli.fetch_timeout_secs,
    };
    let fetcher = OpenAqClient::new(&cli.openaq_host, cli.api_key.clone(), config.fetch_timeout());
    let pipeline = AirQualityPipeline::new(fetcher, config, Arc::new(SystemClock));

    match cli.command {
        Commands::Area { area_id } => {
            let outcome = pipeline.compute_for_area(&area_id).await?;
            print_outcome(&outcome)?;
        }

        Commands::Point {
            lat,
            lon,
            radius_km,
        } => {
            let outcome = pipeline.compute_for_point(lat, lon, radius_km).await?;
            print_outcome(&outcome)?;
        }

        Commands::Areas => {
            for area in &AREAS {
                println!("{:<20} {} ({:.4}, {:.4})", area.id, area.name, area.lat, area.lon);
            }
        }

        Commands::Advise { area, role, query } => {
            let role = parse_role(&role)?;
            let outcome = pipeline.compute_for_area(&area).await?;

            match outcome {
                PipelineOutcome::Success(result) => {
                    let weather = WeatherSnapshot::from_profile(&result.pollutants);
                    let client = AdvisoryClient::new(&cli.advisory_host, &cli.advisory_model);
                    let answer = client
                        .advise(role, &result.aqi, &result.pollutants, &weather, &query)
                        .await?;
                    println!("{answer}");
                }
                PipelineOutcome::NoData { meta } => {
                    println!(
                        "No sensor data within {} km of {}; nothing to advise on.",
                        meta.used_radius_km, area
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &PipelineOutcome) -> Result<()> {
    match outcome {
        PipelineOutcome::Success(result) => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        PipelineOutcome::NoData { meta } => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "status": "no_data",
                    "meta": meta,
                }))?
            );
        }
    }
    Ok(())
}

fn parse_role(s: &str) -> Result<UserRole> {
    match s.to_lowercase().as_str() {
        "citizen" => Ok(UserRole::Citizen),
        "authority" | "government" => Ok(UserRole::Authority),
        _ => anyhow::bail!("Unknown role: {}. Valid: citizen, authority", s),
    }
}

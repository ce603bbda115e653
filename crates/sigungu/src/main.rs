//! sigungu: command-line interface for the district geocoder
//!
//! Usage examples
//! --------------
//!
//! - Suggest districts (offline)
//!   $ sigungu search 강남구
//!
//!   Words match whole levels (강남구, 대치동), not prefixes, unless the
//!   data directory has no token index.
//!
//! - Resolve a district to coordinates
//!   $ sigungu resolve 서울특별시-강남구
//!
//! - Geocode anything, with Nominatim as fallback
//!   $ sigungu geocode "N Seoul Tower"
//!
//! - Build artifacts for a full corpus, then precompute coordinates
//!   $ sigungu build-index korea_districts.json --out ./sigungu_data
//!   $ sigungu --data-dir ./sigungu_data precompute
//!
//! Without `--data-dir` the sample data compiled into the binary is used.
mod args;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sigungu::data_processing::{COORDS_FILE, CORPUS_FILE, get_data_dir, load_corpus, write_artifacts};
use sigungu::{
    GeoPoint, LocationService, OpenMeteoProvider, PrecomputeOptions, Resolution, ServiceConfig,
    init_logging, precompute_file,
};
use tracing::Level;

use crate::args::{CliArgs, Commands};

fn load_service(args: &CliArgs) -> anyhow::Result<LocationService> {
    match &args.data_dir {
        Some(dir) => LocationService::from_dir(dir)
            .with_context(|| format!("loading district data from {}", dir.display())),
        None => LocationService::new_embedded().context("loading embedded district data"),
    }
}

fn print_resolution(resolution: &Resolution, json: bool) -> anyhow::Result<()> {
    match resolution {
        Resolution::Found { point, origin } => {
            if json {
                println!("{}", serde_json::to_string_pretty(point)?);
            } else {
                println!("{point}");
                println!("  via {origin:?}");
            }
        }
        Resolution::NotFound => println!("No match"),
        Resolution::Cancelled => println!("Cancelled"),
    }
    Ok(())
}

fn print_points(points: &[GeoPoint], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(points)?);
    } else if points.is_empty() {
        println!("No match");
    } else {
        for point in points {
            println!("{point}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    init_logging(level)?;

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| get_data_dir().to_path_buf());

    match &args.command {
        Commands::Info => {
            let service = load_service(&args)?;
            println!("{}", service.info().summary());
            if let Some(metadata) = service.info().embedded_metadata {
                println!(
                    "  embedded index v{} generated {}",
                    metadata.version, metadata.generated_at
                );
            }
        }

        Commands::BuildIndex { corpus, out } => {
            let out = out.clone().unwrap_or(data_dir);
            let districts = load_corpus(corpus)
                .with_context(|| format!("reading corpus {}", corpus.display()))?;
            let metadata = write_artifacts(districts, &out)?;
            println!(
                "Indexed {} districts into {} tokens in {}",
                metadata.districts,
                metadata.tokens,
                out.display()
            );
        }

        Commands::Precompute {
            corpus,
            out,
            delay_ms,
        } => {
            let corpus = corpus.clone().unwrap_or_else(|| data_dir.join(CORPUS_FILE));
            let out = out.clone().unwrap_or_else(|| data_dir.join(COORDS_FILE));
            let config = ServiceConfig::default();
            let provider = OpenMeteoProvider::new(&config.provider, &config.resolver.language)?;
            let options = PrecomputeOptions {
                delay: Duration::from_millis(*delay_ms),
                show_progress: !args.json,
                ..PrecomputeOptions::default()
            };
            let table = precompute_file(&corpus, &out, &provider, &options)
                .await
                .with_context(|| format!("precomputing coordinates for {}", corpus.display()))?;
            println!("Wrote {} coordinates to {}", table.len(), out.display());
        }

        Commands::Search { query } => {
            let results = load_service(&args)?.search_districts(query);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for district in results {
                    println!("{district}");
                }
            }
        }

        Commands::Resolve { district } => {
            let service = load_service(&args)?;
            print_resolution(&service.resolve(district).await, args.json)?;
        }

        Commands::Geocode { query } => {
            let service = load_service(&args)?;
            print_resolution(&service.geocode(query).await, args.json)?;
        }

        Commands::Places { query } => {
            let service = load_service(&args)?;
            print_points(&service.search_places(query).await, args.json)?;
        }
    }

    Ok(())
}

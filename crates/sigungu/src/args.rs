use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// CLI arguments for sigungu
#[derive(Debug, Parser)]
#[command(
    name = "sigungu",
    version,
    about = "Search Korean administrative districts and resolve them to coordinates"
)]
pub struct CliArgs {
    /// Directory holding the corpus, token index and coordinate table
    /// (defaults to the data compiled into the binary)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show what data the service is running on
    Info,

    /// Build the token index and metadata from a corpus file
    BuildIndex {
        /// JSON array of dash-joined district names
        corpus: PathBuf,
        /// Output directory (default: the data directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Geocode every district once and write the local coordinate table
    Precompute {
        /// Corpus file (default: korea_districts.json in the data directory)
        #[arg(short, long)]
        corpus: Option<PathBuf>,
        /// Output file (default: korea_districts_with_coords.json in the data directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Pause between districts, in milliseconds
        #[arg(long, default_value_t = 250)]
        delay_ms: u64,
    },

    /// Suggest districts for partial input, offline
    Search {
        query: String,
    },

    /// Resolve a district name to coordinates
    Resolve {
        /// e.g. 서울특별시-강남구
        district: String,
    },

    /// Geocode free text through Open-Meteo, then Nominatim
    Geocode {
        query: String,
    },

    /// Search places for free text
    Places {
        query: String,
    },
}

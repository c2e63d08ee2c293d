//! CLI mode implementation
//!
//! Provides the command-line interface for the vitrine tools

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vitrine CLI
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Aggregated dealer-inventory search utility", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the inventory with progressive filter relaxation
    Search(SearchArgs),
    /// List the inventory grouped by category
    List(ListArgs),
    /// Normalize a raw feed payload into the vehicle schema
    Ingest(IngestArgs),
    /// Report inventory distribution statistics
    Stats(StatsArgs),
}

/// Search tool arguments. Every filter value accepts comma-separated
/// alternatives combined as OR.
#[derive(Parser, Clone, Debug, Default)]
pub struct SearchArgs {
    /// Path to the aggregated inventory JSON
    #[arg(short = 'i', long)]
    pub inventory: PathBuf,

    /// Vehicle kind (e.g. moto, carro)
    #[arg(long)]
    pub tipo: Option<String>,

    /// Model, matched against model, title and trim
    #[arg(long)]
    pub modelo: Option<String>,

    /// Body category (e.g. Hatch, SUV, street)
    #[arg(long)]
    pub categoria: Option<String>,

    /// Brand
    #[arg(long)]
    pub marca: Option<String>,

    /// Color
    #[arg(long)]
    pub cor: Option<String>,

    /// Fuel type
    #[arg(long)]
    pub combustivel: Option<String>,

    /// Transmission
    #[arg(long)]
    pub cambio: Option<String>,

    /// Engine code
    #[arg(long)]
    pub motor: Option<String>,

    /// Door count
    #[arg(long)]
    pub portas: Option<String>,

    /// Features/options text
    #[arg(long)]
    pub opcionais: Option<String>,

    /// Price target: ranks by proximity, never excludes
    #[arg(long)]
    pub valormax: Option<String>,

    /// Model-year ceiling: excludes newer vehicles
    #[arg(long)]
    pub anomax: Option<String>,

    /// Odometer ceiling in km: excludes higher readings
    #[arg(long)]
    pub kmmax: Option<String>,

    /// Displacement target in cc (or liters): ranks by proximity
    #[arg(long)]
    pub ccmax: Option<String>,

    /// Listing ids to omit from results
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Keep only the first photo of each result
    #[arg(long)]
    pub single_photo: bool,

    /// Emit the raw SearchResult as JSON
    #[arg(long)]
    pub json: bool,
}

/// List tool arguments
#[derive(Parser, Clone, Debug)]
pub struct ListArgs {
    /// Path to the aggregated inventory JSON
    #[arg(short = 'i', long)]
    pub inventory: PathBuf,

    /// Keep only categories containing this text
    #[arg(long)]
    pub categoria: Option<String>,

    /// Keep only kinds containing this text
    #[arg(long)]
    pub tipo: Option<String>,

    /// Emit the grouped listing as JSON
    #[arg(long)]
    pub json: bool,
}

/// Ingest tool arguments
#[derive(Parser, Clone, Debug)]
pub struct IngestArgs {
    /// Path to the raw feed payload (JSON)
    #[arg(short = 'f', long)]
    pub input: PathBuf,

    /// Source label or URL used for adapter selection
    #[arg(short = 's', long)]
    pub source: Option<String>,
}

/// Stats tool arguments
#[derive(Parser, Clone, Debug)]
pub struct StatsArgs {
    /// Path to the aggregated inventory JSON
    #[arg(short = 'i', long)]
    pub inventory: PathBuf,

    /// Emit the statistics as JSON
    #[arg(long)]
    pub json: bool,
}

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CityTrotter - City development impact analyzer
#[derive(Parser, Debug)]
#[command(name = "citytrotter")]
#[command(about = "Place a hypothetical building and analyze its impact on the city", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./citytrotter.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the analysis service
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (0 disables)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a building placed at a location
    Analyze(AnalyzeArgs),

    /// Compute a building footprint without contacting the service
    Footprint(FootprintArgs),

    /// Fetch a reference data layer
    Layers(LayersArgs),

    /// Check that the analysis service is up
    Health,

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Latitude of the building center
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the building center
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Building type (residential, commercial, mixed-use)
    #[arg(long = "type", value_name = "TYPE")]
    pub building_type: Option<String>,

    /// Number of units
    #[arg(long)]
    pub units: Option<u32>,

    /// Number of stories (1-20)
    #[arg(long)]
    pub stories: Option<u32>,

    /// Parking spaces
    #[arg(long)]
    pub parking: Option<u32>,

    /// Footprint area in square feet (800-8000)
    #[arg(long, value_name = "SQFT")]
    pub area: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct FootprintArgs {
    /// Latitude of the building center
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the building center
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Footprint area in square feet
    #[arg(long, value_name = "SQFT", default_value = "2500")]
    pub area: f64,
}

#[derive(Parser, Debug)]
pub struct LayersArgs {
    /// What to fetch
    #[arg(value_enum)]
    pub target: LayerTarget,
}

/// Layer selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayerTarget {
    /// Public schools
    Schools,
    /// Zoning districts
    Zoning,
    /// MARTA rail stations
    MartaStations,
    /// Development impact heatmap
    Heatmap,
    /// Feature counts reported by the service
    Summary,
    /// Fetch every layer concurrently and count its features
    All,
}

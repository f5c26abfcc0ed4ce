use citytrotter_core::config::ConfigValue;
use citytrotter_core::models::{
    AnalysisResult, BuildingParameters, DataSummary, Footprint, HealthStatus, Location,
};
use serde::Serialize;

/// Output for analyze command
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput<'a> {
    pub location: Location,
    pub parameters: &'a BuildingParameters,
    pub height_ft: u32,
    pub footprint: &'a Footprint,
    pub result: &'a AnalysisResult,
}

/// Output for footprint command
#[derive(Debug, Serialize)]
pub struct FootprintOutput {
    pub location: Location,
    pub area_sq_ft: f64,
    pub side_length_ft: f64,
    pub ring: Footprint,
    pub centroid: Option<[f64; 2]>,
    pub bbox: [f64; 4],
    pub valid: bool,
    pub feature: geojson::Feature,
}

/// Output for layers command
#[derive(Debug, Serialize)]
pub struct LayerOutput {
    pub layer: String,
    pub feature_count: usize,
    pub features: geojson::FeatureCollection,
}

/// Output for layers summary command
#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub api_url: String,
    pub summary: DataSummary,
}

/// Output for health command
#[derive(Debug, Serialize)]
pub struct HealthOutput {
    pub api_url: String,
    pub healthy: bool,
    pub health: HealthStatus,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config_file: Option<String>,
    pub api_url: ConfigValue<String>,
    pub debounce_ms: ConfigValue<u64>,
    pub request_timeout_secs: ConfigValue<u64>,
}

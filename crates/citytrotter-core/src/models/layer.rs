//! Read-only reference layers served next to the analysis endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Map layers the presentation side overlays on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataLayer {
    Schools,
    Zoning,
    MartaStations,
    ImpactHeatmap,
}

impl DataLayer {
    pub const ALL: [DataLayer; 4] =
        [DataLayer::Schools, DataLayer::Zoning, DataLayer::MartaStations, DataLayer::ImpactHeatmap];

    /// Path of the layer relative to the service base URL
    pub fn path(&self) -> &'static str {
        match self {
            DataLayer::Schools => "/api/v1/data/schools",
            DataLayer::Zoning => "/api/v1/data/zoning",
            DataLayer::MartaStations => "/api/v1/data/marta-stations",
            DataLayer::ImpactHeatmap => "/api/v1/impact-heatmap",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataLayer::Schools => "schools",
            DataLayer::Zoning => "zoning",
            DataLayer::MartaStations => "marta-stations",
            DataLayer::ImpactHeatmap => "impact-heatmap",
        }
    }
}

impl fmt::Display for DataLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub services: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// Feature count and freshness of one reference layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LayerSummary {
    pub count: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Response of `GET /api/v1/data/summary`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DataSummary {
    pub schools: LayerSummary,
    pub zoning: LayerSummary,
    pub marta_stations: LayerSummary,
}

//! Wire formats of the analysis service.

use citytrotter_core::models::{AnalysisRequest, BuildingType, Footprint, Location};
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/v1/analyze-building`.
///
/// The request sequence stays on this side of the wire; responses are
/// correlated by the future that awaits them.
#[derive(Debug, Serialize)]
pub struct AnalyzeBuildingBody<'a> {
    pub location: &'a Location,
    pub footprint: &'a Footprint,
    #[serde(rename = "type")]
    pub building_type: BuildingType,
    pub units: u32,
    pub stories: u32,
    pub parking_spaces: u32,
}

impl<'a> From<&'a AnalysisRequest> for AnalyzeBuildingBody<'a> {
    fn from(request: &'a AnalysisRequest) -> Self {
        Self {
            location: &request.location,
            footprint: &request.footprint,
            building_type: request.building_type,
            units: request.units,
            stories: request.stories,
            parking_spaces: request.parking_spaces,
        }
    }
}

/// Error body returned by the service on failures
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human-readable message; validation failures carry a list of details
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

use async_trait::async_trait;
use geojson::FeatureCollection;

use crate::error::AnalysisError;
use crate::models::{AnalysisRequest, AnalysisResult, DataLayer, DataSummary, HealthStatus};

/// Port for the remote impact analysis capability
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Analyze one building placement.
    ///
    /// Calls may complete in any order relative to the order they were
    /// issued in; reconciling them is the caller's job.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

/// Port for the read-only reference data served next to the analysis endpoint
#[async_trait]
pub trait DataLayerClient: Send + Sync {
    /// Fetch a map layer as a GeoJSON feature collection
    async fn fetch_layer(&self, layer: DataLayer) -> Result<FeatureCollection, AnalysisError>;

    /// Fetch feature counts for every reference layer
    async fn data_summary(&self) -> Result<DataSummary, AnalysisError>;

    /// Check that the service is up
    async fn health(&self) -> Result<HealthStatus, AnalysisError>;
}

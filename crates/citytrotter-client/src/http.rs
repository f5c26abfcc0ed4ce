use async_trait::async_trait;
use citytrotter_core::config::DEFAULT_API_URL;
use citytrotter_core::error::AnalysisError;
use citytrotter_core::models::{
    AnalysisRequest, AnalysisResult, DataLayer, DataSummary, HealthStatus,
};
use citytrotter_core::ports::{AnalysisClient, DataLayerClient};
use geojson::FeatureCollection;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::dto::{AnalyzeBuildingBody, ErrorBody};

/// Path of the analysis endpoint relative to the base URL
pub const ANALYZE_PATH: &str = "/api/v1/analyze-building";

/// HTTP client for the CityTrotter analysis service
pub struct HttpAnalysisClient {
    /// Base URL of the service (e.g., "http://localhost:8000")
    base_url: String,

    /// Transport timeout, if any
    timeout: Option<Duration>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAnalysisClient {
    /// Create a new client without a transport timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create with default localhost URL
    pub fn localhost() -> Self {
        Self::new(DEFAULT_API_URL)
    }

    /// Abort requests that take longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, AnalysisError> {
        self.client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            AnalysisError::Network { reason: format!("Failed to build HTTP client: {}", e) }
        })?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send_error(&self, err: reqwest::Error) -> AnalysisError {
        match self.timeout {
            Some(after) if err.is_timeout() => AnalysisError::Timeout { after },
            _ => AnalysisError::Network {
                reason: format!("Failed to connect to {}: {}", self.base_url, err),
            },
        }
    }

    /// Turn a response into a typed body, mapping non-2xx statuses to server errors
    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AnalysisError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message())
                .unwrap_or(text);
            return Err(AnalysisError::Server { status: status.as_u16(), message });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                self.send_error(e)
            } else {
                AnalysisError::Decode { reason: e.to_string() }
            }
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AnalysisError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await.map_err(|e| self.send_error(e))?;
        self.decode(response).await
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let url = self.url(ANALYZE_PATH);
        tracing::debug!(
            url = %url,
            sequence = request.sequence.0,
            lat = request.location.lat,
            lng = request.location.lng,
            "POST analyze-building"
        );

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeBuildingBody::from(request))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        self.decode(response).await
    }
}

#[async_trait]
impl DataLayerClient for HttpAnalysisClient {
    async fn fetch_layer(&self, layer: DataLayer) -> Result<FeatureCollection, AnalysisError> {
        self.get(layer.path()).await
    }

    async fn data_summary(&self) -> Result<DataSummary, AnalysisError> {
        self.get("/api/v1/data/summary").await
    }

    async fn health(&self) -> Result<HealthStatus, AnalysisError> {
        self.get("/health").await
    }
}

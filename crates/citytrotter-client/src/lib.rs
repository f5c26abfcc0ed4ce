//! CityTrotter Client - HTTP adapter for the impact analysis service
//!
//! Implements the core analysis and data layer ports over the service's
//! REST API.

pub mod dto;
pub mod http;

pub use http::HttpAnalysisClient;

//! CityTrotter Core - Domain models, configuration, and ports
//!
//! This crate contains the site and analysis domain types shared by every
//! other crate, along with the port traits the remote analysis service is
//! reached through.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{AnalysisError, CitytrotterError, ErrorKind, Result};

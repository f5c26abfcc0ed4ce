//! CityTrotter Geo - Footprint geometry and spatial conversions
//!
//! This crate derives building footprints from a site location and converts
//! them into the shapes map and analysis consumers expect.

pub mod footprint;
pub mod models;
pub mod validation;

pub use footprint::{compute_footprint, DEG_PER_FOOT};
pub use models::{footprint_centroid, to_geo_polygon, to_geojson_feature};
pub use validation::{validate_footprint, ValidationResult};

use crate::error::{CitytrotterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 position in degrees.
///
/// Locations are immutable values: the site replaces them wholesale on every
/// update and never edits one in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Create a location, rejecting coordinates outside the WGS84 range
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let location = Self { lat, lng };
        location.validate()?;
        Ok(location)
    }

    /// Check that both coordinates are finite and within range
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(self.invalid("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(self.invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(self.invalid("longitude must be within [-180, 180]"));
        }
        Ok(())
    }

    /// Position as a `[lng, lat]` pair, the order GeoJSON and map libraries use
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    fn invalid(&self, reason: &str) -> CitytrotterError {
        CitytrotterError::InvalidLocation { lat: self.lat, lng: self.lng, reason: reason.to_string() }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_location() {
        let loc = Location::new(33.7490, -84.3880).unwrap();
        assert_eq!(loc.lng_lat(), [-84.3880, 33.7490]);
        assert_eq!(loc.to_string(), "33.7490, -84.3880");
    }

    #[test]
    fn test_out_of_range_latitude() {
        let err = Location::new(91.0, 0.0).unwrap_err();
        assert!(matches!(err, CitytrotterError::InvalidLocation { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_non_finite_coordinates() {
        assert!(Location::new(f64::NAN, 0.0).is_err());
        assert!(Location::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert!(Location::new(-90.0, 180.0).is_ok());
        assert!(Location::new(90.0, -180.0).is_ok());
    }
}

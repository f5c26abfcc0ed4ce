use crate::error::{CitytrotterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest footprint area offered by the placement form
pub const MIN_FOOTPRINT_AREA_SQ_FT: f64 = 800.0;

/// Largest footprint area offered by the placement form
pub const MAX_FOOTPRINT_AREA_SQ_FT: f64 = 8000.0;

/// Maximum number of stories a placed building may have
pub const MAX_STORIES: u32 = 20;

/// Height of one story, used when extruding the footprint
pub const FEET_PER_STORY: u32 = 12;

/// Building use classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BuildingType {
    #[default]
    Residential,
    Commercial,
    MixedUse,
}

impl BuildingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingType::Residential => "residential",
            BuildingType::Commercial => "commercial",
            BuildingType::MixedUse => "mixed-use",
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingType {
    type Err = CitytrotterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "residential" => Ok(BuildingType::Residential),
            "commercial" => Ok(BuildingType::Commercial),
            "mixed-use" | "mixed_use" | "mixeduse" => Ok(BuildingType::MixedUse),
            _ => Err(CitytrotterError::InvalidParameters {
                field: "type",
                reason: format!("Unknown building type: {}. Use residential, commercial, or mixed-use", s),
            }),
        }
    }
}

/// Parameters of the hypothetical building placed on the site.
///
/// Replaced wholesale whenever the user edits the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingParameters {
    #[serde(rename = "type")]
    pub building_type: BuildingType,
    pub units: u32,
    pub stories: u32,
    pub parking_spaces: u32,
    pub footprint_area_sq_ft: f64,
}

impl Default for BuildingParameters {
    fn default() -> Self {
        Self {
            building_type: BuildingType::Residential,
            units: 300,
            stories: 8,
            parking_spaces: 150,
            footprint_area_sq_ft: 2500.0,
        }
    }
}

impl BuildingParameters {
    /// Check every field against the ranges the placement form enforces
    pub fn validate(&self) -> Result<()> {
        if self.units < 1 {
            return Err(CitytrotterError::InvalidParameters {
                field: "units",
                reason: "a building needs at least one unit".to_string(),
            });
        }

        if !(1..=MAX_STORIES).contains(&self.stories) {
            return Err(CitytrotterError::InvalidParameters {
                field: "stories",
                reason: format!("must be between 1 and {}, got {}", MAX_STORIES, self.stories),
            });
        }

        let area = self.footprint_area_sq_ft;
        if !area.is_finite() || !(MIN_FOOTPRINT_AREA_SQ_FT..=MAX_FOOTPRINT_AREA_SQ_FT).contains(&area)
        {
            return Err(CitytrotterError::InvalidParameters {
                field: "footprint_area_sq_ft",
                reason: format!(
                    "must be between {} and {} sq ft, got {}",
                    MIN_FOOTPRINT_AREA_SQ_FT, MAX_FOOTPRINT_AREA_SQ_FT, area
                ),
            });
        }

        Ok(())
    }

    /// Total building height in feet
    pub fn height_ft(&self) -> u32 {
        self.stories * FEET_PER_STORY
    }

    /// Side length of the square footprint in feet
    pub fn side_length_ft(&self) -> f64 {
        self.footprint_area_sq_ft.sqrt()
    }
}

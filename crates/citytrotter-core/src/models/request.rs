use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BuildingParameters, BuildingType, Footprint, Location};

/// Monotonic tag assigned to each analysis request when it is issued.
///
/// Only used to reconcile responses that complete out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sequence(pub u64);

impl Sequence {
    /// The sequence issued after this one
    pub fn next(self) -> Self {
        Sequence(self.0 + 1)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single call to the analysis service
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub sequence: Sequence,
    pub location: Location,
    pub footprint: Footprint,
    pub building_type: BuildingType,
    pub units: u32,
    pub stories: u32,
    pub parking_spaces: u32,
}

impl AnalysisRequest {
    pub fn new(
        sequence: Sequence,
        location: Location,
        footprint: Footprint,
        params: &BuildingParameters,
    ) -> Self {
        Self {
            sequence,
            location,
            footprint,
            building_type: params.building_type,
            units: params.units,
            stories: params.stories,
            parking_spaces: params.parking_spaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ordering() {
        let first = Sequence(1);
        assert!(first < first.next());
        assert_eq!(first.next(), Sequence(2));
        assert_eq!(Sequence(7).to_string(), "#7");
    }

    #[test]
    fn test_request_copies_parameters() {
        let params = BuildingParameters { units: 42, stories: 3, ..Default::default() };
        let location = Location { lat: 33.749, lng: -84.388 };
        let footprint =
            Footprint::from_corners([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);

        let request = AnalysisRequest::new(Sequence(3), location, footprint, &params);
        assert_eq!(request.units, 42);
        assert_eq!(request.stories, 3);
        assert_eq!(request.parking_spaces, 150);
        assert_eq!(request.building_type, BuildingType::Residential);
    }
}

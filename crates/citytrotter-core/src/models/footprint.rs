//! Closed square outline of a placed building.

use crate::error::{CitytrotterError, Result};
use serde::{Deserialize, Serialize};

/// Number of vertices in a footprint ring, including the closing vertex
pub const RING_LEN: usize = 5;

/// Closed ring of `[lng, lat]` pairs.
///
/// The ring always holds exactly five vertices and the last one repeats the
/// first. Vertex order is bottom-left, bottom-right, top-right, top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Footprint {
    ring: [[f64; 2]; RING_LEN],
}

impl Footprint {
    /// Build a closed ring from its four corners
    pub fn from_corners(corners: [[f64; 2]; 4]) -> Self {
        let [bl, br, tr, tl] = corners;
        Self { ring: [bl, br, tr, tl, bl] }
    }

    /// All five vertices, closing vertex included
    pub fn ring(&self) -> &[[f64; 2]; RING_LEN] {
        &self.ring
    }

    /// The four distinct corners
    pub fn corners(&self) -> &[[f64; 2]] {
        &self.ring[..RING_LEN - 1]
    }

    /// Bounding box as `[min_lng, min_lat, max_lng, max_lat]`
    pub fn bbox(&self) -> [f64; 4] {
        let [min_lng, min_lat] = self.ring[0];
        let [max_lng, max_lat] = self.ring[2];
        [min_lng, min_lat, max_lng, max_lat]
    }

    /// Ring in the nested form GeoJSON polygons use
    pub fn to_polygon_coordinates(&self) -> Vec<Vec<Vec<f64>>> {
        vec![self.ring.iter().map(|c| c.to_vec()).collect()]
    }
}

impl TryFrom<Vec<[f64; 2]>> for Footprint {
    type Error = CitytrotterError;

    fn try_from(coords: Vec<[f64; 2]>) -> Result<Self> {
        let ring: [[f64; 2]; RING_LEN] =
            coords.try_into().map_err(|v: Vec<[f64; 2]>| {
                CitytrotterError::Serialization(format!(
                    "footprint ring must have {} vertices, found {}",
                    RING_LEN,
                    v.len()
                ))
            })?;

        if ring[0] != ring[RING_LEN - 1] {
            return Err(CitytrotterError::Serialization(
                "footprint ring is not closed".to_string(),
            ));
        }

        Ok(Self { ring })
    }
}

impl From<Footprint> for Vec<[f64; 2]> {
    fn from(footprint: Footprint) -> Self {
        footprint.ring.to_vec()
    }
}

//! Conversions from footprints to `geo` and GeoJSON types.
//!
//! The map layer extrudes the GeoJSON feature using its `height_ft`
//! property; the `geo` polygon is for spatial computations.

use citytrotter_core::models::{BuildingParameters, Footprint};
use geo::{Centroid, Coord, LineString, Polygon};
use serde_json::{Map, Value as JsonValue};

/// Convert a footprint to a geo::Polygon
pub fn to_geo_polygon(footprint: &Footprint) -> Polygon {
    let coords: Vec<Coord> = footprint.ring().iter().map(|c| Coord { x: c[0], y: c[1] }).collect();
    Polygon::new(LineString::new(coords), vec![])
}

/// Convert a footprint to a GeoJSON feature carrying the building's extrusion properties
pub fn to_geojson_feature(footprint: &Footprint, params: &BuildingParameters) -> geojson::Feature {
    let geometry = geojson::Geometry::new(geojson::Value::Polygon(footprint.to_polygon_coordinates()));

    let mut properties = Map::new();
    properties.insert("height_ft".to_string(), JsonValue::from(params.height_ft()));
    properties.insert("stories".to_string(), JsonValue::from(params.stories));
    properties.insert("type".to_string(), JsonValue::from(params.building_type.as_str()));
    properties
        .insert("footprint_area_sq_ft".to_string(), JsonValue::from(params.footprint_area_sq_ft));

    geojson::Feature {
        bbox: Some(footprint.bbox().to_vec()),
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Centroid of the footprint polygon as `[lng, lat]`
pub fn footprint_centroid(footprint: &Footprint) -> Option<[f64; 2]> {
    to_geo_polygon(footprint).centroid().map(|p| [p.x(), p.y()])
}

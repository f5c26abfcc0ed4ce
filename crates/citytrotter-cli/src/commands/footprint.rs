use crate::cli::FootprintArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::FootprintOutput;
use anyhow::Result;
use citytrotter_core::models::building::{MAX_FOOTPRINT_AREA_SQ_FT, MIN_FOOTPRINT_AREA_SQ_FT};
use citytrotter_core::models::{BuildingParameters, Location};
use citytrotter_geo::{
    compute_footprint, footprint_centroid, to_geojson_feature, validate_footprint,
};
use tabled::Tabled;

#[derive(Tabled)]
struct CornerRow {
    #[tabled(rename = "Corner")]
    corner: &'static str,
    #[tabled(rename = "Longitude")]
    lng: String,
    #[tabled(rename = "Latitude")]
    lat: String,
}

const CORNERS: [&str; 5] = ["bottom-left", "bottom-right", "top-right", "top-left", "closing"];

pub fn execute(args: FootprintArgs, output: &OutputWriter) -> Result<()> {
    let location = Location::new(args.lat, args.lng).map_err(|e| errors::invalid_input(&e))?;

    if !(MIN_FOOTPRINT_AREA_SQ_FT..=MAX_FOOTPRINT_AREA_SQ_FT).contains(&args.area) {
        output.warning(format!(
            "{} sq ft is outside the {}-{} sq ft the analysis service accepts",
            args.area, MIN_FOOTPRINT_AREA_SQ_FT, MAX_FOOTPRINT_AREA_SQ_FT
        ));
    }

    let footprint = compute_footprint(&location, args.area);
    let validation = validate_footprint(&footprint);
    for error in &validation.errors {
        output.warning(format!("{}: {}", error.location, error.reason));
    }

    let centroid = footprint_centroid(&footprint);
    let parameters =
        BuildingParameters { footprint_area_sq_ft: args.area, ..BuildingParameters::default() };

    if output.is_json() {
        output.result(FootprintOutput {
            location,
            area_sq_ft: args.area,
            side_length_ft: parameters.side_length_ft(),
            centroid,
            bbox: footprint.bbox(),
            valid: validation.is_valid,
            feature: to_geojson_feature(&footprint, &parameters),
            ring: footprint,
        })?;
        return Ok(());
    }

    output.section("Footprint");
    output.kv("Center", location);
    output.kv("Area", format!("{} sq ft", args.area));
    output.kv("Side", format!("{:.1} ft", parameters.side_length_ft()));
    if let Some([lng, lat]) = centroid {
        output.kv("Centroid", format!("{:.6}, {:.6}", lat, lng));
    }
    output.table(
        CORNERS
            .iter()
            .zip(footprint.ring())
            .map(|(&corner, [lng, lat])| CornerRow {
                corner,
                lng: format!("{:.6}", lng),
                lat: format!("{:.6}", lat),
            })
            .collect(),
    );

    Ok(())
}

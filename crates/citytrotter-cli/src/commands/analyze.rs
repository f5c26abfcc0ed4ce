use crate::cli::AnalyzeArgs;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::AnalyzeOutput;
use anyhow::Result;
use citytrotter_client::HttpAnalysisClient;
use citytrotter_core::config::LayeredConfig;
use citytrotter_core::error::CitytrotterError;
use citytrotter_core::models::{
    AnalysisResult, BuildingParameters, Location, SchoolInfo, Severity,
};
use citytrotter_session::{Resolution, SessionConfig, SiteSession};
use std::sync::Arc;
use tabled::Tabled;

pub async fn execute(args: AnalyzeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let api_url = config.api_url.value.as_str();
    let invalid = |e: CitytrotterError| errors::from_core(api_url, e);

    let location = Location::new(args.lat, args.lng).map_err(invalid)?;
    let parameters = parameters_from_args(&args).map_err(invalid)?;

    let client = HttpAnalysisClient::new(api_url);
    let session = SiteSession::new(Arc::new(client), SessionConfig::from(config));

    session.select_location(location).map_err(invalid)?;
    session.update_parameters(parameters).map_err(invalid)?;

    tracing::info!(lat = location.lat, lng = location.lng, api_url, "Analyzing building placement");
    let ticket = session.request_analysis().map_err(invalid)?;

    let result = match ticket.outcome().await.map_err(invalid)? {
        Resolution::Accepted(result) => result,
        Resolution::Discarded => {
            return Err(errors::CliError::new("Analysis was superseded before it completed").into())
        }
    };

    let snapshot = session.snapshot();
    let site = &snapshot.site;
    let parameters = site.parameters();
    let Some(footprint) = site.footprint() else {
        return Err(errors::CliError::new("Site has no footprint after analysis").into());
    };

    if output.is_json() {
        output.result(AnalyzeOutput {
            location,
            parameters,
            height_ft: parameters.height_ft(),
            footprint: &footprint,
            result: &result,
        })?;
        return Ok(());
    }

    output.section("Site");
    output.kv("Location", location);
    output.kv("Building", format!("{} ({} units)", parameters.building_type, parameters.units));
    output.kv("Height", format!("{} stories / {} ft", parameters.stories, parameters.height_ft()));
    output.kv("Footprint", format!("{} sq ft", parameters.footprint_area_sq_ft));
    output.kv("Parking", parameters.parking_spaces);

    print_report(&result, output);
    Ok(())
}

fn parameters_from_args(args: &AnalyzeArgs) -> citytrotter_core::Result<BuildingParameters> {
    let defaults = BuildingParameters::default();
    let building_type = match args.building_type.as_deref() {
        Some(s) => s.parse()?,
        None => defaults.building_type,
    };

    let parameters = BuildingParameters {
        building_type,
        units: args.units.unwrap_or(defaults.units),
        stories: args.stories.unwrap_or(defaults.stories),
        parking_spaces: args.parking.unwrap_or(defaults.parking_spaces),
        footprint_area_sq_ft: args.area.unwrap_or(defaults.footprint_area_sq_ft),
    };
    parameters.validate()?;
    Ok(parameters)
}

#[derive(Tabled)]
struct SchoolRow {
    #[tabled(rename = "School")]
    name: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Distance (mi)")]
    distance: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
}

#[derive(Tabled)]
struct BottleneckRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Issue")]
    message: String,
}

const METERS_PER_MILE: f64 = 1609.344;

fn school_row(school: &SchoolInfo) -> SchoolRow {
    SchoolRow {
        name: school.name.clone(),
        level: school.grade_level.clone(),
        distance: format!("{:.2}", school.distance / METERS_PER_MILE),
        capacity: format!("{:.0}%", school.capacity_pct),
    }
}

fn print_report(result: &AnalysisResult, output: &OutputWriter) {
    let zoning = &result.zoning;
    output.section("Zoning");
    output.kv("Zone", &zoning.zone);
    output.kv("Compliant", if zoning.compliant { "✓" } else { "✗" });
    for violation in &zoning.violations {
        output.warning(violation);
    }

    let schools = &result.school_impact;
    output.section("Schools");
    output.kv("Students Generated", format!("{:.0}", schools.students_generated));
    output.table(schools.schools.iter().map(school_row).collect());

    let traffic = &result.traffic_impact;
    output.section("Traffic");
    output.kv("Daily Trips", traffic.daily_trips);
    output.kv("Peak Trips", format!("AM {} / PM {}", traffic.peak_trips.am, traffic.peak_trips.pm));

    let transit = &result.transit_access;
    output.section("Transit");
    output.kv(
        "Nearest Station",
        format!("{} ({})", transit.nearest_station.name, transit.nearest_station.line),
    );
    output.kv("Walk Time", format!("{:.0} min", transit.walk_time_minutes));
    output.kv("Transit Score", &transit.transit_score);

    let infra = &result.infrastructure;
    output.section("Infrastructure");
    output.kv("Adequate", if infra.infrastructure_adequate { "✓" } else { "✗" });
    output.kv("Estimated Cost", format!("${:.0}", infra.estimated_cost));

    let economic = &result.economic_impact;
    output.section("Economics");
    output.kv("Annual Tax Revenue", format!("${:.0}", economic.annual_tax_revenue));
    output.kv("Years to Breakeven", format!("{:.1}", economic.years_to_breakeven));
    output.kv(
        "Jobs",
        format!("{} construction / {} permanent", economic.construction_jobs, economic.permanent_jobs),
    );

    output.section("Bottlenecks");
    let high = result.bottlenecks_at(Severity::High).count();
    if high > 0 {
        output.warning(format!("{} high severity bottleneck(s)", high));
    }
    output.table(
        result
            .bottlenecks
            .iter()
            .map(|b| BottleneckRow {
                severity: format!("{:?}", b.severity),
                kind: b.kind.clone(),
                message: b.message.clone(),
            })
            .collect(),
    );

    if !result.ai_report.ai_summary.is_empty() {
        output.section("Summary");
        println!("{}", result.ai_report.ai_summary);
    }
}

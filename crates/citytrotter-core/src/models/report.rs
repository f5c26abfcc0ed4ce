//! Impact report returned by the analysis service.
//!
//! The session treats an [`AnalysisResult`] as one atomic value. The field
//! layout mirrors the service response so presentation code can render it
//! without another mapping step.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Severity attached to bottlenecks and degraded intersections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ZoningResult {
    pub zone: String,
    pub compliant: bool,
    #[serde(default)]
    pub violations: Vec<String>,
    pub max_height: Option<u32>,
    pub max_far: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchoolInfo {
    pub name: String,
    /// Distance from the site in meters
    pub distance: f64,
    pub grade_level: String,
    pub enrollment: u32,
    pub capacity: u32,
    pub capacity_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchoolBottleneck {
    pub school: String,
    pub capacity_pct: f64,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchoolImpact {
    pub students_generated: f64,
    #[serde(default)]
    pub schools: Vec<SchoolInfo>,
    #[serde(default)]
    pub bottlenecks: Vec<SchoolBottleneck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IntersectionImpact {
    pub name: String,
    pub current_los: String,
    pub projected_los: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PeakTrips {
    pub am: u32,
    pub pm: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrafficImpact {
    pub daily_trips: u32,
    #[serde(default)]
    pub peak_trips: PeakTrips,
    #[serde(default)]
    pub los_impacts: Vec<IntersectionImpact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransitStation {
    pub name: String,
    pub line: String,
    /// Distance from the site in meters
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransitAccess {
    pub nearest_station: TransitStation,
    pub walk_time_minutes: f64,
    pub transit_score: String,
    #[serde(default)]
    pub nearby_stations: Vec<TransitStation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InfrastructureImpact {
    pub water_demand: f64,
    pub sewer_demand: f64,
    pub power_demand: f64,
    #[serde(default)]
    pub upgrades_needed: Vec<String>,
    pub estimated_cost: f64,
    pub infrastructure_adequate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShadowSnapshot {
    pub time: String,
    pub shadow_area_sqft: f64,
    pub affected_parcels: u32,
    #[serde(default)]
    pub shadow_geometry: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShadowAnalysis {
    #[serde(default)]
    pub shadows_by_time: Vec<ShadowSnapshot>,
    pub total_affected_parcels: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EconomicImpact {
    pub annual_tax_revenue: f64,
    pub infrastructure_cost: f64,
    pub net_impact_year_1: f64,
    pub years_to_breakeven: f64,
    pub construction_jobs: u32,
    pub permanent_jobs: u32,
}

/// A cross-cutting issue the service flagged for this placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Bottleneck {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AiReport {
    pub ai_summary: String,
    /// Generation time. The service sends local time without an offset,
    /// which is read as UTC.
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()).map_err(de::Error::custom)
}

/// Complete impact analysis of one building placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisResult {
    pub building_id: String,
    pub zoning: ZoningResult,
    pub school_impact: SchoolImpact,
    pub traffic_impact: TrafficImpact,
    pub transit_access: TransitAccess,
    pub infrastructure: InfrastructureImpact,
    pub shadow_analysis: ShadowAnalysis,
    pub economic_impact: EconomicImpact,
    #[serde(default)]
    pub bottlenecks: Vec<Bottleneck>,
    pub ai_report: AiReport,
}

impl AnalysisResult {
    /// Bottlenecks at the given severity
    pub fn bottlenecks_at(&self, severity: Severity) -> impl Iterator<Item = &Bottleneck> {
        self.bottlenecks.iter().filter(move |b| b.severity == severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_wire_names() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"HIGH\"");
        let parsed: Severity = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn test_bottleneck_type_field() {
        let json = r#"{"type":"ZONING","severity":"HIGH","message":"Zoning violations: height"}"#;
        let bottleneck: Bottleneck = serde_json::from_str(json).unwrap();
        assert_eq!(bottleneck.kind, "ZONING");
        assert_eq!(bottleneck.severity, Severity::High);
    }

    #[test]
    fn test_bottlenecks_at_filters_by_severity() {
        let result = AnalysisResult {
            bottlenecks: vec![
                Bottleneck { kind: "TRAFFIC".into(), severity: Severity::High, message: "a".into() },
                Bottleneck {
                    kind: "INFRASTRUCTURE".into(),
                    severity: Severity::Medium,
                    message: "b".into(),
                },
            ],
            ..Default::default()
        };

        let high: Vec<_> = result.bottlenecks_at(Severity::High).collect();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].kind, "TRAFFIC");
    }

    const SERVICE_RESPONSE: &str = r#"{
        "building_id": "bldg_33.7490_-84.3880",
        "zoning": {"zone": "MR-3", "compliant": true, "violations": [], "max_height": 150, "max_far": 4.0},
        "school_impact": {
            "students_generated": 9.0,
            "schools": [{"name": "Grady High School", "distance": 1873.2, "grade_level": "High",
                         "enrollment": 1809, "capacity": 1600, "capacity_pct": 113.0625}],
            "bottlenecks": [{"school": "Grady High School", "capacity_pct": 113.0625,
                             "severity": "MEDIUM", "message": "Grady High School will be at 113% capacity"}]
        },
        "traffic_impact": {
            "daily_trips": 1620, "peak_trips": {"am": 178, "pm": 194},
            "los_impacts": [{"name": "Peachtree St & 10th St", "current_los": "D", "projected_los": "F", "severity": "HIGH"}]
        },
        "transit_access": {
            "nearest_station": {"name": "Five Points", "line": "Red/Gold/Blue/Green", "distance": 412.5},
            "walk_time_minutes": 4.9, "transit_score": "EXCELLENT",
            "nearby_stations": [{"name": "Five Points", "line": "Red/Gold/Blue/Green", "distance": 412.5}]
        },
        "infrastructure": {"water_demand": 45000.0, "sewer_demand": 40500.0, "power_demand": 1200.0,
                           "upgrades_needed": [], "estimated_cost": 0.0, "infrastructure_adequate": true},
        "shadow_analysis": {
            "shadows_by_time": [{"time": "9:00 AM", "shadow_area_sqft": 7644.2, "affected_parcels": 1,
                                 "shadow_geometry": [[-84.38808, 33.74892], [-84.38792, 33.74892]]}],
            "total_affected_parcels": 1
        },
        "economic_impact": {"annual_tax_revenue": 540000.0, "infrastructure_cost": 0.0, "net_impact_year_1": 540000.0,
                            "years_to_breakeven": 0.0, "construction_jobs": 150, "permanent_jobs": 12},
        "bottlenecks": [{"type": "TRAFFIC", "severity": "HIGH", "message": "Peachtree St & 10th St degrades to LOS F"}],
        "ai_report": {"ai_summary": "Moderate impact.", "timestamp": "2026-10-18T12:34:56.123456"}
    }"#;

    #[test]
    fn test_service_response_decodes() {
        let result: AnalysisResult = serde_json::from_str(SERVICE_RESPONSE).unwrap();

        assert_eq!(result.zoning.zone, "MR-3");
        assert_eq!(result.traffic_impact.peak_trips, PeakTrips { am: 178, pm: 194 });
        assert_eq!(result.school_impact.bottlenecks[0].severity, Severity::Medium);
        assert_eq!(result.bottlenecks_at(Severity::High).count(), 1);
        assert_eq!(
            result.ai_report.timestamp.to_rfc3339(),
            "2026-10-18T12:34:56.123456+00:00"
        );
    }

    #[test]
    fn test_timestamp_with_offset_is_normalized_to_utc() {
        let json = r#"{"ai_summary": "", "timestamp": "2026-10-18T08:34:56-04:00"}"#;
        let report: AiReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.timestamp.to_rfc3339(), "2026-10-18T12:34:56+00:00");

        let reparsed: AiReport = serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
        assert_eq!(reparsed, report);
    }

    #[test]
    fn test_unparseable_timestamp_is_rejected() {
        let json = r#"{"ai_summary": "", "timestamp": "yesterday"}"#;
        assert!(serde_json::from_str::<AiReport>(json).is_err());
    }
}

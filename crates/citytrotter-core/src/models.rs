pub mod building;
pub mod footprint;
pub mod layer;
pub mod location;
pub mod report;
pub mod request;

pub use building::{BuildingParameters, BuildingType};
pub use footprint::Footprint;
pub use layer::{DataLayer, DataSummary, HealthStatus, LayerSummary};
pub use location::Location;
pub use report::{
    AiReport, AnalysisResult, Bottleneck, EconomicImpact, InfrastructureImpact,
    IntersectionImpact, PeakTrips, SchoolBottleneck, SchoolImpact, SchoolInfo, Severity, ShadowAnalysis,
    ShadowSnapshot, TrafficImpact, TransitAccess, TransitStation, ZoningResult,
};
pub use request::{AnalysisRequest, Sequence};

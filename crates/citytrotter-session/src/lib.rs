//! CityTrotter Session - Site synchronization and analysis orchestration
//!
//! Keeps the placed building's site model and the remote analysis result
//! consistent while the user drags the marker, edits parameters, and asks
//! for analyses, any of which may overlap an outstanding call.
//!
//! [`AnalysisOrchestrator`] is a synchronous state machine with no I/O.
//! [`SiteSession`] drives it on tokio: it owns the debounce timer, issues
//! calls to an [`AnalysisClient`](citytrotter_core::ports::AnalysisClient),
//! and publishes snapshots to presentation consumers.

pub mod orchestrator;
pub mod results;
pub mod session;
pub mod site;
pub mod timer;

pub use orchestrator::{AnalysisOrchestrator, DebounceToken, Disposition, OrchestratorPhase};
pub use results::{AcceptedResult, ResultStore};
pub use session::{AnalysisTicket, Resolution, SessionConfig, SessionSnapshot, SiteSession};
pub use site::SiteState;
pub use timer::DebounceTimer;

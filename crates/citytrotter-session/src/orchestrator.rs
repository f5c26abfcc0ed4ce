//! Analysis trigger and reconciliation state machine.
//!
//! Every issued request gets a fresh [`Sequence`]. A response is applied
//! only while its sequence is still outstanding and not older than the
//! accepted result, so a slow earlier response can never replace the result
//! of a request issued after it.

use citytrotter_core::error::{AnalysisError, CitytrotterError, Result};
use citytrotter_core::models::{
    AnalysisRequest, AnalysisResult, BuildingParameters, Location, Sequence,
};
use citytrotter_geo::compute_footprint;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::results::ResultStore;
use crate::site::SiteState;

/// Identifies one scheduled debounce so a superseded timer can't fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorPhase {
    Idle,
    /// A re-analysis is scheduled but has not fired yet
    PendingDebounce,
    /// At least one call to the analysis service is outstanding
    InFlight,
}

/// What happened to a response handed to [`AnalysisOrchestrator::on_result`]
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Accepted(Arc<AnalysisResult>),
    Failed(AnalysisError),
    /// Superseded by a newer request or a reset. Not an error.
    Discarded,
}

#[derive(Debug)]
pub struct AnalysisOrchestrator {
    site: SiteState,
    results: ResultStore,
    next_sequence: Sequence,
    outstanding: BTreeSet<Sequence>,
    pending_debounce: Option<DebounceToken>,
    next_token: u64,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisOrchestrator {
    pub fn new() -> Self {
        Self {
            site: SiteState::new(),
            results: ResultStore::new(),
            next_sequence: Sequence(1),
            outstanding: BTreeSet::new(),
            pending_debounce: None,
            next_token: 0,
        }
    }

    pub fn site(&self) -> &SiteState {
        &self.site
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    /// A pending debounce is reported ahead of outstanding calls since it
    /// determines the next request that will be issued.
    pub fn phase(&self) -> OrchestratorPhase {
        if self.pending_debounce.is_some() {
            OrchestratorPhase::PendingDebounce
        } else if !self.outstanding.is_empty() {
            OrchestratorPhase::InFlight
        } else {
            OrchestratorPhase::Idle
        }
    }

    pub fn is_debounce_pending(&self) -> bool {
        self.pending_debounce.is_some()
    }

    /// Sequences issued and not yet resolved or superseded
    pub fn outstanding(&self) -> impl Iterator<Item = Sequence> + '_ {
        self.outstanding.iter().copied()
    }

    pub fn select_location(&mut self, location: Location) -> Result<()> {
        self.site.select_location(location)
    }

    pub fn begin_move(&mut self, location: Location) -> Result<()> {
        self.site.begin_move(location)
    }

    /// Explicit "Analyze" action.
    ///
    /// Fails with [`CitytrotterError::NoLocationSelected`] before touching
    /// any state when no location has been selected.
    pub fn request_analysis(&mut self) -> Result<AnalysisRequest> {
        let location = self.site.location().ok_or(CitytrotterError::NoLocationSelected)?;
        self.cancel_debounce();
        Ok(self.issue(location))
    }

    /// Record new parameters and, once a result has been obtained, schedule
    /// a debounced re-analysis.
    ///
    /// Returns the token of the scheduled debounce; any earlier pending one
    /// is superseded.
    pub fn notify_parameter_change(
        &mut self,
        parameters: BuildingParameters,
    ) -> Result<Option<DebounceToken>> {
        self.site.update_parameters(parameters)?;

        if !self.site.has_analyzed() || self.site.location().is_none() {
            return Ok(None);
        }

        let token = DebounceToken(self.next_token);
        self.next_token += 1;
        if let Some(previous) = self.pending_debounce.replace(token) {
            tracing::debug!(previous = previous.0, token = token.0, "Debounce replaced");
        }
        Ok(Some(token))
    }

    /// Settle a drag. Re-analyzes immediately once a result has been obtained.
    pub fn notify_location_committed(
        &mut self,
        location: Location,
    ) -> Result<Option<AnalysisRequest>> {
        self.site.commit_move(location)?;

        if !self.site.has_analyzed() {
            return Ok(None);
        }

        self.cancel_debounce();
        Ok(Some(self.issue(location)))
    }

    /// Fire a debounce. Tokens that were cancelled or replaced are ignored.
    pub fn fire_debounce(&mut self, token: DebounceToken) -> Option<AnalysisRequest> {
        if self.pending_debounce != Some(token) {
            tracing::debug!(token = token.0, "Ignoring superseded debounce");
            return None;
        }
        self.pending_debounce = None;

        let location = self.site.location()?;
        Some(self.issue(location))
    }

    /// Drop the pending debounce, if any
    pub fn cancel_debounce(&mut self) -> bool {
        match self.pending_debounce.take() {
            Some(token) => {
                tracing::debug!(token = token.0, "Debounce cancelled");
                true
            }
            None => false,
        }
    }

    /// Apply a response from the analysis service.
    pub fn on_result(
        &mut self,
        sequence: Sequence,
        outcome: std::result::Result<AnalysisResult, AnalysisError>,
    ) -> Disposition {
        let was_outstanding = self.outstanding.remove(&sequence);
        let superseded = self.results.accepted_sequence().is_some_and(|accepted| sequence < accepted);

        if !was_outstanding || superseded {
            tracing::debug!(sequence = sequence.0, "Discarding stale analysis response");
            self.results.set_analyzing(!self.outstanding.is_empty());
            return Disposition::Discarded;
        }

        // Anything issued before this request is now superseded
        self.outstanding = self.outstanding.split_off(&sequence);

        let disposition = match outcome {
            Ok(result) => {
                tracing::info!(sequence = sequence.0, building_id = %result.building_id, "Analysis accepted");
                let result = self.results.accept(sequence, result);
                self.site.mark_analyzed();
                Disposition::Accepted(result)
            }
            Err(error) => {
                tracing::warn!(sequence = sequence.0, error = %error, "Analysis failed");
                self.results.record_failure(error.clone());
                Disposition::Failed(error)
            }
        };

        self.results.set_analyzing(!self.outstanding.is_empty());
        disposition
    }

    /// Return to the initial empty session.
    ///
    /// Sequence numbers keep counting up, so responses to requests issued
    /// before the reset are discarded when they arrive.
    pub fn reset(&mut self) {
        self.cancel_debounce();
        self.outstanding.clear();
        self.site.reset();
        self.results.clear();
        tracing::info!("Session reset");
    }

    fn issue(&mut self, location: Location) -> AnalysisRequest {
        let sequence = self.next_sequence;
        self.next_sequence = sequence.next();

        let params = self.site.parameters();
        let footprint = compute_footprint(&location, params.footprint_area_sq_ft);
        let request = AnalysisRequest::new(sequence, location, footprint, params);

        self.outstanding.insert(sequence);
        self.results.set_analyzing(true);

        tracing::debug!(sequence = sequence.0, lat = location.lat, lng = location.lng, "Issuing analysis request");
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citytrotter_core::error::ErrorKind;

    fn downtown() -> Location {
        Location { lat: 33.7490, lng: -84.3880 }
    }

    fn midtown() -> Location {
        Location { lat: 33.7810, lng: -84.3860 }
    }

    fn result(id: &str) -> AnalysisResult {
        AnalysisResult { building_id: id.to_string(), ..Default::default() }
    }

    /// Orchestrator that already holds an accepted result for `downtown()`
    fn analyzed() -> AnalysisOrchestrator {
        let mut orch = AnalysisOrchestrator::new();
        orch.select_location(downtown()).unwrap();
        let request = orch.request_analysis().unwrap();
        orch.on_result(request.sequence, Ok(result("first")));
        orch
    }

    #[test]
    fn test_request_without_location_is_rejected() {
        let mut orch = AnalysisOrchestrator::new();
        let err = orch.request_analysis().unwrap_err();

        assert!(matches!(err, CitytrotterError::NoLocationSelected));
        assert_eq!(orch.phase(), OrchestratorPhase::Idle);
        assert!(!orch.results().is_analyzing());
    }

    #[test]
    fn test_sequences_strictly_increase() {
        let mut orch = AnalysisOrchestrator::new();
        orch.select_location(downtown()).unwrap();

        let a = orch.request_analysis().unwrap().sequence;
        let b = orch.request_analysis().unwrap().sequence;
        orch.reset();
        orch.select_location(downtown()).unwrap();
        let c = orch.request_analysis().unwrap().sequence;

        assert!(a < b && b < c);
    }

    #[test]
    fn test_request_carries_footprint_and_parameters() {
        let mut orch = AnalysisOrchestrator::new();
        orch.select_location(downtown()).unwrap();
        orch.notify_parameter_change(BuildingParameters { units: 120, ..Default::default() })
            .unwrap();

        let request = orch.request_analysis().unwrap();
        assert_eq!(request.units, 120);
        assert_eq!(request.footprint, compute_footprint(&downtown(), 2500.0));
        assert_eq!(orch.phase(), OrchestratorPhase::InFlight);
        assert!(orch.results().is_analyzing());
    }

    #[test]
    fn test_accepted_result_sets_has_analyzed() {
        let orch = analyzed();
        assert!(orch.site().has_analyzed());
        assert_eq!(orch.results().current_result().unwrap().building_id, "first");
        assert_eq!(orch.phase(), OrchestratorPhase::Idle);
    }

    #[test]
    fn test_parameter_change_before_first_analysis_only_records() {
        let mut orch = AnalysisOrchestrator::new();
        orch.select_location(downtown()).unwrap();

        let token = orch
            .notify_parameter_change(BuildingParameters { stories: 12, ..Default::default() })
            .unwrap();

        assert!(token.is_none());
        assert_eq!(orch.site().parameters().stories, 12);
        assert_eq!(orch.phase(), OrchestratorPhase::Idle);
    }

    #[test]
    fn test_parameter_change_replaces_pending_debounce() {
        let mut orch = analyzed();

        let first = orch
            .notify_parameter_change(BuildingParameters { units: 10, ..Default::default() })
            .unwrap()
            .unwrap();
        let second = orch
            .notify_parameter_change(BuildingParameters { units: 20, ..Default::default() })
            .unwrap()
            .unwrap();

        assert_ne!(first, second);
        assert!(orch.fire_debounce(first).is_none());

        let request = orch.fire_debounce(second).unwrap();
        assert_eq!(request.units, 20);
        assert!(!orch.is_debounce_pending());
        assert!(orch.fire_debounce(second).is_none());
    }

    #[test]
    fn test_invalid_parameters_schedule_nothing() {
        let mut orch = analyzed();
        let err = orch
            .notify_parameter_change(BuildingParameters { units: 0, ..Default::default() })
            .unwrap_err();

        assert!(err.is_validation());
        assert!(!orch.is_debounce_pending());
    }

    #[test]
    fn test_explicit_request_cancels_debounce() {
        let mut orch = analyzed();
        let token = orch.notify_parameter_change(BuildingParameters::default()).unwrap().unwrap();

        orch.request_analysis().unwrap();
        assert!(orch.fire_debounce(token).is_none());
    }

    #[test]
    fn test_location_commit_before_first_analysis_is_noop() {
        let mut orch = AnalysisOrchestrator::new();
        assert!(orch.notify_location_committed(downtown()).unwrap().is_none());
        assert_eq!(orch.site().location(), Some(downtown()));
    }

    #[test]
    fn test_location_commit_reanalyzes_immediately() {
        let mut orch = analyzed();
        let token = orch.notify_parameter_change(BuildingParameters::default()).unwrap().unwrap();

        let request = orch.notify_location_committed(midtown()).unwrap().unwrap();

        assert_eq!(request.location, midtown());
        assert!(orch.fire_debounce(token).is_none());
    }

    #[test]
    fn test_begin_move_never_issues() {
        let mut orch = analyzed();
        orch.begin_move(midtown()).unwrap();

        assert_eq!(orch.phase(), OrchestratorPhase::Idle);
        assert_eq!(orch.site().location(), Some(downtown()));
    }

    #[test]
    fn test_late_older_response_is_discarded() {
        let mut orch = AnalysisOrchestrator::new();
        orch.select_location(downtown()).unwrap();
        let older = orch.request_analysis().unwrap().sequence;
        let newer = orch.request_analysis().unwrap().sequence;

        assert!(matches!(orch.on_result(newer, Ok(result("newer"))), Disposition::Accepted(_)));
        assert_eq!(orch.on_result(older, Ok(result("older"))), Disposition::Discarded);

        assert_eq!(orch.results().current_result().unwrap().building_id, "newer");
        assert_eq!(orch.phase(), OrchestratorPhase::Idle);
    }

    #[test]
    fn test_older_response_first_then_newer_wins() {
        let mut orch = AnalysisOrchestrator::new();
        orch.select_location(downtown()).unwrap();
        let older = orch.request_analysis().unwrap().sequence;
        let newer = orch.request_analysis().unwrap().sequence;

        assert!(matches!(orch.on_result(older, Ok(result("older"))), Disposition::Accepted(_)));
        // The newer request is still outstanding
        assert_eq!(orch.phase(), OrchestratorPhase::InFlight);
        assert!(orch.results().is_analyzing());

        orch.on_result(newer, Ok(result("newer")));
        assert_eq!(orch.results().accepted_sequence(), Some(newer));
        assert!(!orch.results().is_analyzing());
    }

    #[test]
    fn test_stale_response_keeps_in_flight_while_newer_outstanding() {
        let mut orch = analyzed();
        let a = orch.request_analysis().unwrap().sequence;
        let b = orch.request_analysis().unwrap().sequence;
        let c = orch.request_analysis().unwrap().sequence;

        orch.on_result(b, Ok(result("b")));
        assert_eq!(orch.on_result(a, Ok(result("a"))), Disposition::Discarded);
        assert_eq!(orch.phase(), OrchestratorPhase::InFlight);
        assert_eq!(orch.outstanding().collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn test_failure_preserves_previous_result() {
        let mut orch = analyzed();
        let request = orch.request_analysis().unwrap();

        let error = AnalysisError::Server { status: 500, message: "boom".to_string() };
        let disposition = orch.on_result(request.sequence, Err(error.clone()));

        assert_eq!(disposition, Disposition::Failed(error));
        assert_eq!(orch.results().current_result().unwrap().building_id, "first");
        assert_eq!(orch.results().last_error_kind(), Some(ErrorKind::Server));
        assert!(!orch.results().is_analyzing());
        assert!(orch.site().has_analyzed());
    }

    #[test]
    fn test_failure_of_newest_supersedes_older_outstanding() {
        let mut orch = analyzed();
        let older = orch.request_analysis().unwrap().sequence;
        let newer = orch.request_analysis().unwrap().sequence;

        orch.on_result(newer, Err(AnalysisError::Network { reason: "reset".to_string() }));
        assert_eq!(orch.on_result(older, Ok(result("older"))), Disposition::Discarded);
        assert_eq!(orch.results().current_result().unwrap().building_id, "first");
    }

    #[test]
    fn test_reset_discards_late_responses() {
        let mut orch = analyzed();
        let request = orch.notify_location_committed(midtown()).unwrap().unwrap();
        let token = orch.notify_parameter_change(BuildingParameters::default()).unwrap().unwrap();

        orch.reset();

        assert!(orch.fire_debounce(token).is_none());
        assert_eq!(orch.on_result(request.sequence, Ok(result("late"))), Disposition::Discarded);
        assert!(orch.results().current().is_none());
        assert!(!orch.site().has_analyzed());
        assert!(orch.site().location().is_none());
        assert_eq!(orch.phase(), OrchestratorPhase::Idle);
    }

    #[test]
    fn test_duplicate_response_is_discarded() {
        let mut orch = AnalysisOrchestrator::new();
        orch.select_location(downtown()).unwrap();
        let seq = orch.request_analysis().unwrap().sequence;

        orch.on_result(seq, Ok(result("once")));
        assert_eq!(orch.on_result(seq, Ok(result("twice"))), Disposition::Discarded);
        assert_eq!(orch.results().current_result().unwrap().building_id, "once");
    }
}

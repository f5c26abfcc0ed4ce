use chrono::{DateTime, Utc};
use citytrotter_core::error::{AnalysisError, ErrorKind};
use citytrotter_core::models::{AnalysisResult, Sequence};
use std::sync::Arc;

/// An analysis result the orchestrator accepted as current
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedResult {
    pub sequence: Sequence,
    pub result: Arc<AnalysisResult>,
    pub received_at: DateTime<Utc>,
}

/// Latest accepted result and analysis status.
///
/// Only the orchestrator writes to it; everything else reads snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    current: Option<AcceptedResult>,
    is_analyzing: bool,
    last_error: Option<AnalysisError>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&AcceptedResult> {
        self.current.as_ref()
    }

    pub fn current_result(&self) -> Option<&AnalysisResult> {
        self.current.as_ref().map(|accepted| accepted.result.as_ref())
    }

    /// Sequence of the currently accepted result
    pub fn accepted_sequence(&self) -> Option<Sequence> {
        self.current.as_ref().map(|accepted| accepted.sequence)
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    pub fn last_error(&self) -> Option<&AnalysisError> {
        self.last_error.as_ref()
    }

    pub fn last_error_kind(&self) -> Option<ErrorKind> {
        self.last_error.as_ref().map(AnalysisError::kind)
    }

    pub(crate) fn accept(&mut self, sequence: Sequence, result: AnalysisResult) -> Arc<AnalysisResult> {
        let result = Arc::new(result);
        self.current =
            Some(AcceptedResult { sequence, result: Arc::clone(&result), received_at: Utc::now() });
        self.last_error = None;
        result
    }

    /// Failures never touch the accepted result
    pub(crate) fn record_failure(&mut self, error: AnalysisError) {
        self.last_error = Some(error);
    }

    pub(crate) fn set_analyzing(&mut self, analyzing: bool) {
        self.is_analyzing = analyzing;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

//! Async driver binding the orchestrator to an analysis client on tokio.

use citytrotter_core::config::{LayeredConfig, DEFAULT_DEBOUNCE_MS, DEFAULT_REQUEST_TIMEOUT_SECS};
use citytrotter_core::error::{AnalysisError, Result};
use citytrotter_core::models::{
    AnalysisRequest, AnalysisResult, BuildingParameters, Location, Sequence,
};
use citytrotter_core::ports::AnalysisClient;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use uuid::Uuid;

use crate::orchestrator::{AnalysisOrchestrator, Disposition, OrchestratorPhase};
use crate::results::ResultStore;
use crate::site::SiteState;
use crate::timer::DebounceTimer;

/// Timing knobs of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Quiet period after the last parameter change before re-analyzing
    pub debounce: Duration,
    /// Calls running longer than this fail as network errors
    pub request_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        }
    }
}

impl From<&LayeredConfig> for SessionConfig {
    fn from(config: &LayeredConfig) -> Self {
        Self { debounce: config.debounce(), request_timeout: config.request_timeout() }
    }
}

/// How an issued request ended, when it did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Accepted(Arc<AnalysisResult>),
    Discarded,
}

/// Handle on one issued analysis request
#[derive(Debug)]
pub struct AnalysisTicket {
    sequence: Sequence,
    outcome: oneshot::Receiver<std::result::Result<Resolution, AnalysisError>>,
}

impl AnalysisTicket {
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Wait for the response to be reconciled.
    ///
    /// Collaborator failures surface here as errors. A response superseded
    /// by a newer request or a reset resolves to [`Resolution::Discarded`].
    pub async fn outcome(self) -> Result<Resolution> {
        match self.outcome.await {
            Ok(Ok(resolution)) => Ok(resolution),
            Ok(Err(error)) => Err(error.into()),
            // The call was dropped with the runtime; nothing was applied
            Err(_) => Ok(Resolution::Discarded),
        }
    }
}

/// Read-only view of the session published to presentation consumers
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub site: SiteState,
    pub results: ResultStore,
    pub phase: OrchestratorPhase,
}

impl SessionSnapshot {
    fn of(orchestrator: &AnalysisOrchestrator) -> Self {
        Self {
            site: orchestrator.site().clone(),
            results: orchestrator.results().clone(),
            phase: orchestrator.phase(),
        }
    }
}

struct Shared {
    id: Uuid,
    config: SessionConfig,
    client: Arc<dyn AnalysisClient>,
    orchestrator: Mutex<AnalysisOrchestrator>,
    timer: Mutex<DebounceTimer>,
    updates: watch::Sender<SessionSnapshot>,
}

/// A user's building placement session.
///
/// Cheap to clone; clones share the same state. All operations that may
/// issue a request spawn onto the current tokio runtime.
#[derive(Clone)]
pub struct SiteSession {
    shared: Arc<Shared>,
}

impl SiteSession {
    pub fn new(client: Arc<dyn AnalysisClient>, config: SessionConfig) -> Self {
        let orchestrator = AnalysisOrchestrator::new();
        let (updates, _) = watch::channel(SessionSnapshot::of(&orchestrator));
        let id = Uuid::new_v4();

        tracing::info!(
            session = %id,
            debounce_ms = config.debounce.as_millis() as u64,
            timeout_secs = config.request_timeout.map(|t| t.as_secs()),
            "Site session started"
        );

        Self {
            shared: Arc::new(Shared {
                id,
                config,
                client,
                orchestrator: Mutex::new(orchestrator),
                timer: Mutex::new(DebounceTimer::new()),
                updates,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Place the building without analyzing it.
    ///
    /// Rejects non-finite or out-of-range coordinates and leaves the site
    /// untouched.
    pub fn select_location(&self, location: Location) -> Result<()> {
        let mut orchestrator = self.shared.orchestrator();
        orchestrator.select_location(location)?;
        self.shared.publish(&orchestrator);
        Ok(())
    }

    /// Follow a drag in progress. Only live previews observe this.
    pub fn begin_move(&self, location: Location) -> Result<()> {
        let mut orchestrator = self.shared.orchestrator();
        orchestrator.begin_move(location)?;
        self.shared.publish(&orchestrator);
        Ok(())
    }

    /// Settle a drag. Returns a ticket when this re-analyzes the site.
    pub fn commit_move(&self, location: Location) -> Result<Option<AnalysisTicket>> {
        let mut orchestrator = self.shared.orchestrator();
        let request = orchestrator.notify_location_committed(location)?;
        if request.is_some() {
            self.shared.timer().cancel();
        }
        let ticket = request.map(|request| Shared::dispatch(&self.shared, request));
        self.shared.publish(&orchestrator);
        Ok(ticket)
    }

    /// Replace the building parameters, scheduling a debounced re-analysis
    /// once the site has been analyzed.
    pub fn update_parameters(&self, parameters: BuildingParameters) -> Result<()> {
        let mut orchestrator = self.shared.orchestrator();
        if let Some(token) = orchestrator.notify_parameter_change(parameters)? {
            let weak: Weak<Shared> = Arc::downgrade(&self.shared);
            self.shared.timer().schedule(self.shared.config.debounce, async move {
                if let Some(shared) = weak.upgrade() {
                    let mut orchestrator = shared.orchestrator();
                    if let Some(request) = orchestrator.fire_debounce(token) {
                        // Nobody awaits a debounced call; failures land in the result store
                        drop(Shared::dispatch(&shared, request));
                    }
                    shared.publish(&orchestrator);
                }
            });
            tracing::debug!(session = %self.shared.id, "Re-analysis scheduled");
        }
        self.shared.publish(&orchestrator);
        Ok(())
    }

    /// Explicit "Analyze" action.
    ///
    /// Fails without calling the service when no location is selected.
    pub fn request_analysis(&self) -> Result<AnalysisTicket> {
        let mut orchestrator = self.shared.orchestrator();
        let request = orchestrator.request_analysis()?;
        self.shared.timer().cancel();
        let ticket = Shared::dispatch(&self.shared, request);
        self.shared.publish(&orchestrator);
        Ok(ticket)
    }

    /// Clear the site and results. Calls still in flight are left to
    /// complete and their responses are discarded.
    pub fn reset(&self) {
        let mut orchestrator = self.shared.orchestrator();
        self.shared.timer().cancel();
        orchestrator.reset();
        self.shared.publish(&orchestrator);
        tracing::info!(session = %self.shared.id, "Site session reset");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Wait until nothing is scheduled or in flight
    pub async fn settled(&self) -> SessionSnapshot {
        let mut updates = self.subscribe();
        let settled = match updates.wait_for(|snapshot| snapshot.phase == OrchestratorPhase::Idle).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }
}

impl Shared {
    // A panic while holding a lock leaves the state machine consistent
    // between transitions, so poisoning is ignored.
    fn orchestrator(&self) -> MutexGuard<'_, AnalysisOrchestrator> {
        self.orchestrator.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timer(&self) -> MutexGuard<'_, DebounceTimer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, orchestrator: &AnalysisOrchestrator) {
        self.updates.send_replace(SessionSnapshot::of(orchestrator));
    }

    /// Issue the call in the background and reconcile its response
    fn dispatch(shared: &Arc<Shared>, request: AnalysisRequest) -> AnalysisTicket {
        let (tx, rx) = oneshot::channel();
        let sequence = request.sequence;
        let shared = Arc::clone(shared);

        tokio::spawn(async move {
            let outcome = shared.call(&request).await;
            let resolution = shared.resolve(sequence, outcome);
            let _ = tx.send(resolution);
        });

        AnalysisTicket { sequence, outcome: rx }
    }

    async fn call(
        &self,
        request: &AnalysisRequest,
    ) -> std::result::Result<AnalysisResult, AnalysisError> {
        match self.config.request_timeout {
            Some(after) => tokio::time::timeout(after, self.client.analyze(request))
                .await
                .unwrap_or(Err(AnalysisError::Timeout { after })),
            None => self.client.analyze(request).await,
        }
    }

    fn resolve(
        &self,
        sequence: Sequence,
        outcome: std::result::Result<AnalysisResult, AnalysisError>,
    ) -> std::result::Result<Resolution, AnalysisError> {
        let mut orchestrator = self.orchestrator();
        let disposition = orchestrator.on_result(sequence, outcome);
        self.publish(&orchestrator);

        match disposition {
            Disposition::Accepted(result) => Ok(Resolution::Accepted(result)),
            Disposition::Discarded => Ok(Resolution::Discarded),
            Disposition::Failed(error) => {
                tracing::warn!(session = %self.id, sequence = sequence.0, error = %error, "Analysis request failed");
                Err(error)
            }
        }
    }
}

//! The batch tester's control surface: periodic discovery plus the run trigger.
//!
//! Discovery and batch runs share the graph and the configuration snapshot.
//! They are kept apart by a three-state machine rather than a lock held
//! across the run: discovery only refreshes from `Idle`, a run only starts
//! from `Idle`, and both return to `Idle` through a drop guard. A run
//! triggered during a discovery tick waits for the tick to finish; only an
//! active run makes a trigger fail with `Busy`.

use crate::config::BatchConfig;
use crate::discovery::{ConfigurationSnapshot, discover};
use crate::driver::JobDriver;
use crate::error::BatchError;
use crate::expander::expand;
use crate::generator::generate;
use crate::graph::GraphView;
use crate::submit::Submitter;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Discovering,
    Running,
}

/// The user-facing control that starts a batch run (a button, in the editor).
pub trait TriggerControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

struct NoTrigger;

impl TriggerControl for NoTrigger {
    fn set_enabled(&self, _enabled: bool) {}
}

/// Summary of a finished batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub sources: usize,
    pub jobs_generated: usize,
    pub jobs_submitted: usize,
    pub sink_recorded: bool,
}

/// Returns the state machine to `Idle` (and re-enables the trigger) on drop.
struct StateGuard {
    state: Arc<Mutex<BatchState>>,
    idle: Arc<Notify>,
    trigger: Option<Arc<dyn TriggerControl>>,
}

impl StateGuard {
    /// Moves from `Idle` to `next`. Otherwise returns the state in the way.
    fn enter(
        state: &Arc<Mutex<BatchState>>,
        idle: &Arc<Notify>,
        next: BatchState,
        trigger: Option<Arc<dyn TriggerControl>>,
    ) -> Result<Self, BatchState> {
        {
            let mut current = state.lock();
            if *current != BatchState::Idle {
                return Err(*current);
            }
            *current = next;
        }
        if let Some(trigger) = &trigger {
            trigger.set_enabled(false);
        }
        Ok(Self {
            state: Arc::clone(state),
            idle: Arc::clone(idle),
            trigger,
        })
    }
}

impl Drop for StateGuard {
    fn drop(&mut self) {
        *self.state.lock() = BatchState::Idle;
        self.idle.notify_waiters();
        if let Some(trigger) = &self.trigger {
            trigger.set_enabled(true);
        }
    }
}

pub struct BatchController<G: ?Sized, S: ?Sized> {
    graph: Arc<G>,
    submitter: Arc<S>,
    config: Arc<BatchConfig>,
    state: Arc<Mutex<BatchState>>,
    idle: Arc<Notify>,
    snapshot: Arc<Mutex<ConfigurationSnapshot>>,
    trigger: Arc<dyn TriggerControl>,
}

impl<G: ?Sized, S: ?Sized> Clone for BatchController<G, S> {
    fn clone(&self) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            submitter: Arc::clone(&self.submitter),
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
            idle: Arc::clone(&self.idle),
            snapshot: Arc::clone(&self.snapshot),
            trigger: Arc::clone(&self.trigger),
        }
    }
}

impl<G, S> BatchController<G, S>
where
    G: GraphView + ?Sized,
    S: Submitter + ?Sized,
{
    pub fn new(graph: Arc<G>, submitter: Arc<S>, config: BatchConfig) -> Self {
        Self {
            graph,
            submitter,
            config: Arc::new(config),
            state: Arc::new(Mutex::new(BatchState::Idle)),
            idle: Arc::new(Notify::new()),
            snapshot: Arc::new(Mutex::new(ConfigurationSnapshot::default())),
            trigger: Arc::new(NoTrigger),
        }
    }

    pub fn with_trigger(mut self, trigger: Arc<dyn TriggerControl>) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn state(&self) -> BatchState {
        *self.state.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.state() == BatchState::Running
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// The most recently discovered snapshot.
    pub fn snapshot(&self) -> ConfigurationSnapshot {
        self.snapshot.lock().clone()
    }

    /// One discovery tick. Returns `false`, leaving the snapshot untouched,
    /// when a batch run is in progress.
    pub fn refresh(&self) -> bool {
        let Ok(_guard) = StateGuard::enter(&self.state, &self.idle, BatchState::Discovering, None)
        else {
            return false;
        };
        let snapshot = discover(self.graph.as_ref(), &self.config);
        *self.snapshot.lock() = snapshot;
        true
    }

    /// Expands the current snapshot into jobs and drives them all.
    ///
    /// Rejected with `BatchError::Busy` if another run is active. A discovery
    /// tick in progress is waited out. The snapshot is frozen on entry;
    /// expansion and generation finish before the first submission, so a bad
    /// payload never leaves a half-applied sweep.
    pub async fn run_batch(&self) -> Result<BatchReport, BatchError> {
        let _guard = loop {
            let idle = self.idle.notified();
            tokio::pin!(idle);
            // Registered before the state check so a tick ending in between
            // still wakes us.
            idle.as_mut().enable();

            match StateGuard::enter(
                &self.state,
                &self.idle,
                BatchState::Running,
                Some(Arc::clone(&self.trigger)),
            ) {
                Ok(guard) => break guard,
                Err(BatchState::Discovering) => {
                    debug!("Batch trigger waiting for the discovery tick to finish");
                    idle.await;
                }
                Err(_) => {
                    debug!("Batch trigger ignored, a run is already in progress");
                    return Err(BatchError::Busy);
                }
            }
        };

        let snapshot = self.snapshot();
        info!(sources = snapshot.len(), "Batch run started");

        let result = self.execute(&snapshot).await;
        match &result {
            Ok(report) => info!(
                jobs = report.jobs_generated,
                submitted = report.jobs_submitted,
                "Batch run finished"
            ),
            Err(e) => error!(error = %e, "Batch run aborted"),
        }
        result
    }

    async fn execute(&self, snapshot: &ConfigurationSnapshot) -> Result<BatchReport, BatchError> {
        let entries = expand(snapshot)?;
        let jobs = generate(&entries);
        info!(variants = entries.len(), jobs = jobs.len(), "Generated jobs");

        let driver = JobDriver::new(
            Arc::clone(&self.graph),
            Arc::clone(&self.submitter),
            self.config.sink.clone(),
        );
        let drive = driver.run(&jobs).await?;

        Ok(BatchReport {
            sources: snapshot.len(),
            jobs_generated: jobs.len(),
            jobs_submitted: drive.jobs_submitted,
            sink_recorded: drive.sink_recorded,
        })
    }
}

impl<G, S> BatchController<G, S>
where
    G: GraphView + ?Sized + 'static,
    S: Submitter + ?Sized + 'static,
{
    /// Starts the periodic discovery task on the current tokio runtime.
    ///
    /// The first tick fires immediately, then every `poll_interval_ms`.
    pub fn spawn_discovery(&self) -> DiscoveryTask {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let controller = self.clone();
        let interval = self.config.poll_interval();
        if self.config.poll_interval_ms == 0 {
            warn!("poll_interval_ms is zero, polling every millisecond");
        }

        let handle = tokio::spawn(async move {
            info!(interval_ms = interval.as_millis() as u64, "Discovery started");
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !controller.refresh() {
                            debug!("Discovery skipped while a batch run is active");
                        }
                    }
                    _ = token.cancelled() => {
                        info!("Discovery stopped");
                        break;
                    }
                }
            }
        });

        DiscoveryTask {
            cancel,
            handle: Some(handle),
        }
    }
}

/// Handle to the periodic discovery task. Dropping it cancels the task.
pub struct DiscoveryTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl DiscoveryTask {
    /// Cancels the task and waits for it to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "Discovery task ended abnormally");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DiscoveryTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

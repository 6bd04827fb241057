//! Progress tracking service.

use chrono::{DateTime, Utc};
use movein_core::{default_steps, ProgressState, StepDefinition, StepId};
use movein_storage::{KeyValueStore, StorageError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::TrackerError;

/// Key the checklist flags are stored under.
pub const DEFAULT_STORAGE_KEY: &str = "moveInSteps";

const NOTICE_READY: &str =
    "You've successfully completed all steps. You can now proceed with your move-in.";
const NOTICE_PENDING: &str =
    "You have pending actions. Please complete all steps to proceed with your move-in.";

/// Tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Storage key for the serialized flag mapping
    pub storage_key: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Which path `load` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet, started from the default state
    Fresh,
    /// Stored flags were read back
    Restored,
    /// Stored flags were unusable and the default state was used instead
    Recovered,
}

/// Status of one step at snapshot time.
#[derive(Debug, Clone, Serialize)]
pub struct StepStatus {
    /// Step id
    pub id: StepId,
    /// Display label
    pub label: String,
    /// Call-to-action for an incomplete step
    pub action: String,
    /// Whether the step counts as complete
    pub complete: bool,
    /// Whether completion is forced rather than user-driven
    pub forced: bool,
}

/// A snapshot of progress at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Per-step status in display order
    pub steps: Vec<StepStatus>,

    /// Completed steps, forced ones included
    pub completed: usize,

    /// Total steps
    pub total: usize,

    /// Percentage complete
    pub percentage: f32,

    /// Every step is complete
    pub ready: bool,
}

/// Tracks which move-in steps are done.
///
/// Policy: state is loaded once with [`load`](Self::load) and the whole
/// mapping is written back after every [`mark_complete`](Self::mark_complete).
/// Store failures are logged and never surfaced; the in-memory state stays
/// authoritative for the session.
pub struct ProgressTracker<S: KeyValueStore> {
    store: S,
    config: TrackerConfig,
    definitions: Vec<StepDefinition>,
    steps: ProgressState,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    /// Create a tracker over the default checklist with nothing completed.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: TrackerConfig::default(),
            definitions: default_steps(),
            steps: ProgressState::new(),
        }
    }

    /// Set configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the checklist.
    pub fn with_steps(mut self, definitions: Vec<StepDefinition>) -> Self {
        self.definitions = definitions;
        self
    }

    /// Read persisted flags into memory.
    ///
    /// Falls back to the empty state when nothing is stored, when the stored
    /// value is not a flag mapping, or when the store cannot be read.
    pub async fn load(&mut self) -> LoadOutcome {
        match self.read_state().await {
            Ok(Some(state)) => {
                debug!(key = %self.config.storage_key, entries = state.len(), "restored progress");
                self.steps = state;
                LoadOutcome::Restored
            }
            Ok(None) => {
                debug!(key = %self.config.storage_key, "no stored progress");
                self.steps = ProgressState::new();
                LoadOutcome::Fresh
            }
            Err(e) => {
                warn!(error = %e, "falling back to empty progress");
                self.steps = ProgressState::new();
                LoadOutcome::Recovered
            }
        }
    }

    /// Mark a step complete and persist the full state.
    ///
    /// Re-marking a complete step rewrites the same state. Ids that are not on
    /// the checklist are ignored.
    pub async fn mark_complete(&mut self, id: &str) {
        let Some(step_id) = self.definition(id).map(|d| d.id.clone()) else {
            warn!(step = id, "ignoring unknown step");
            return;
        };

        self.steps = self.steps.with_completed(&step_id);
        info!(step = %step_id, ready = self.all_complete(), "step completed");

        if let Err(e) = self.persist().await {
            warn!(error = %e, "progress kept in memory only");
        }
    }

    /// Whether a step counts as complete.
    pub fn is_complete(&self, id: &str) -> bool {
        let forced = self
            .definition(id)
            .map(|d| d.forced_complete)
            .unwrap_or(false);
        forced || self.steps.get(id)
    }

    /// Whether every step on the checklist is complete.
    pub fn all_complete(&self) -> bool {
        self.definitions
            .iter()
            .all(|d| self.is_complete(d.id.as_str()))
    }

    /// Steps still to do, in display order.
    pub fn pending_steps(&self) -> Vec<&StepDefinition> {
        self.definitions
            .iter()
            .filter(|d| !self.is_complete(d.id.as_str()))
            .collect()
    }

    /// Status message for the current state.
    pub fn notice(&self) -> &'static str {
        if self.all_complete() {
            NOTICE_READY
        } else {
            NOTICE_PENDING
        }
    }

    /// Take a progress snapshot.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let steps: Vec<StepStatus> = self
            .definitions
            .iter()
            .map(|d| StepStatus {
                id: d.id.clone(),
                label: d.label.clone(),
                action: d.action.clone(),
                complete: self.is_complete(d.id.as_str()),
                forced: d.forced_complete,
            })
            .collect();

        let total = steps.len();
        let completed = steps.iter().filter(|s| s.complete).count();
        let percentage = if total > 0 {
            (completed as f32 / total as f32) * 100.0
        } else {
            0.0
        };

        ProgressSnapshot {
            timestamp: Utc::now(),
            steps,
            completed,
            total,
            percentage,
            ready: completed == total,
        }
    }

    /// Stored flags, unknown keys included.
    pub fn steps(&self) -> &ProgressState {
        &self.steps
    }

    /// The checklist, in display order.
    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }

    /// Look up a step on the checklist.
    pub fn definition(&self, id: &str) -> Option<&StepDefinition> {
        self.definitions.iter().find(|d| d.id.as_str() == id)
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn read_state(&self) -> Result<Option<ProgressState>, TrackerError> {
        let key = &self.config.storage_key;
        let raw = self
            .store
            .get(key)
            .await
            .map_err(|source| TrackerError::PersistenceRead {
                key: key.clone(),
                source,
            })?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        ProgressState::from_json(&raw)
            .map(Some)
            .map_err(|source| TrackerError::CorruptState {
                key: key.clone(),
                source,
            })
    }

    async fn persist(&mut self) -> Result<(), TrackerError> {
        let key = self.config.storage_key.clone();
        let write_error = |source: StorageError| TrackerError::PersistenceWrite {
            key: key.clone(),
            source,
        };

        let json = self.steps.to_json().map_err(|e| write_error(e.into()))?;
        self.store.set(&key, &json).await.map_err(write_error)?;

        debug!(key = %key, entries = self.steps.len(), "persisted progress");
        Ok(())
    }
}

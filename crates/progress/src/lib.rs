//! Progress Tracking (Layer 2)
//!
//! Move-in checklist completion, persistence policy, and the readiness gate.

#![warn(missing_docs)]

pub mod error;
pub mod tracker;

pub use error::TrackerError;
pub use tracker::{
    LoadOutcome, ProgressSnapshot, ProgressTracker, StepStatus, TrackerConfig,
    DEFAULT_STORAGE_KEY,
};

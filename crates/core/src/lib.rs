//! Move-in core data models.
//!
//! This crate defines the checklist steps and the completion state the
//! progress tracker reads and persists.

#![warn(missing_docs)]

// Core identities
mod id;

// Checklist
mod step;
mod state;

// Re-exports
pub use id::StepId;
pub use step::{default_steps, StepDefinition};
pub use state::{ParseStateError, ProgressState};

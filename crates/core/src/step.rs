//! Step model - the static checklist a move-in goes through.

use serde::{Deserialize, Serialize};
use crate::id::StepId;

/// A single milestone of the move-in checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Unique identifier, also the key in the stored flag mapping
    pub id: StepId,

    /// Human readable label
    pub label: String,

    /// Step is not user-driven and always reported complete
    #[serde(default)]
    pub forced_complete: bool,

    /// Call-to-action shown while the step is incomplete
    pub action: String,
}

impl StepDefinition {
    /// Create a user-driven step with the generic "Complete" action.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: StepId::new(id),
            label: label.into(),
            forced_complete: false,
            action: "Complete".to_string(),
        }
    }

    /// Mark the step as always complete.
    pub fn forced(mut self) -> Self {
        self.forced_complete = true;
        self
    }

    /// Override the call-to-action label.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}

/// The move-in checklist, in display order.
pub fn default_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("contractSigned", "Contract signed").with_action("Activate Now"),
        StepDefinition::new("depositPaid", "Deposit paid").with_action("Pay Now"),
        StepDefinition::new("membershipPaid", "Membership fee paid").forced(),
        StepDefinition::new("welcomeEmailSent", "Your welcome email has been sent"),
    ]
}

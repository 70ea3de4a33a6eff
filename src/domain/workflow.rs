//! Button-driven status workflows
//!
//! Requests and feedback only move when an admin clicks a transition button.
//! The dashboard renders exactly `available_transitions()` as buttons and the
//! server rejects anything else.

use super::DomainError;

pub trait Workflow: Copy + PartialEq + Sized + 'static {
    /// Statuses reachable in one step from `self`
    fn available_transitions(self) -> &'static [Self];

    /// Wire name, e.g. `IN_PROGRESS`
    fn as_str(self) -> &'static str;

    fn can_transition_to(self, next: Self) -> bool {
        self.available_transitions().contains(&next)
    }

    fn is_terminal(self) -> bool {
        self.available_transitions().is_empty()
    }

    /// Validate a requested change, returning the target status on success
    fn transition(self, next: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }

    /// Action names for the detail view
    fn available_actions(self) -> Vec<&'static str> {
        self.available_transitions()
            .iter()
            .map(|s| s.as_str())
            .collect()
    }
}

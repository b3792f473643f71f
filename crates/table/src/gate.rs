//! Status transition gate.
//!
//! A transition is only written after the gate allows it and the user
//! confirms. Two transitions never reach confirmation: re-applying the
//! record's current status, and applying the status that defines the active
//! partition (the row would vanish from the very view the action was taken
//! in, so the menu does not offer it).

#![forbid(unsafe_code)]

use fleetdeck_core::PartitionSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDecision {
    /// Requested status equals the record's current one; surface an info
    /// notice, perform no write.
    NoOp,
    /// Requested status is the active partition's defining status.
    PartitionBlocked,
    /// Permitted, pending explicit user confirmation.
    NeedsConfirmation,
}

pub fn decide(
    current: Option<&str>,
    requested: &str,
    active: &PartitionSpec,
) -> TransitionDecision {
    if current == Some(requested) {
        return TransitionDecision::NoOp;
    }
    if active.status == Some(requested) {
        return TransitionDecision::PartitionBlocked;
    }
    TransitionDecision::NeedsConfirmation
}

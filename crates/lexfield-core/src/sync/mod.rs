//! Value synchronisation between the host form value and the live editor.
//!
//! Two paths share one [`SyncState`]:
//!
//! - **apply**: a new host value is pushed into the engine, then a settle
//!   observation captures what the engine normalised it to.
//! - **emit**: engine change notifications are filtered against the settled
//!   baseline and the last emitted value before reaching the host.
//!
//! Both paths compare [`ContentHash`]es rather than documents, so an emitted
//! value that round-trips back through the host is recognised as an echo.

mod apply;
mod emit;
mod field;

pub use apply::{ApplyOutcome, Incoming, SettleObservation, apply_incoming, observe_settled};
pub use emit::{EmitDecision, decide_emit, forward_nested};
pub use field::EditorField;

use crate::hash::ContentHash;
use crate::schedule::CancelHandle;

/// Synchronisation bookkeeping for one mounted editor field.
///
/// Created fresh per mount and dropped on unmount. Nested editors never share
/// one; they report through the parent field instead.
#[derive(Debug, Default)]
pub struct SyncState {
    /// Hash of the last host value pushed into the engine.
    pub last_applied_hash: Option<ContentHash>,
    /// Hash of the last value pushed out to the host.
    pub last_emitted_hash: Option<ContentHash>,
    /// Hash of the engine's state once it settled after the last apply.
    pub normalized_incoming_hash: Option<ContentHash>,
    /// False while a settle observation is outstanding.
    pub has_normalized_baseline: bool,
    /// Cancels the outstanding settle observation, if any.
    pub cancel_waiter: Option<CancelHandle>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the outstanding settle observation. Returns whether there was one.
    pub fn cancel_settle(&mut self) -> bool {
        match self.cancel_waiter.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_settling(&self) -> bool {
        self.cancel_waiter
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_no_baseline() {
        let state = SyncState::new();
        assert!(!state.has_normalized_baseline);
        assert!(state.last_applied_hash.is_none());
        assert!(!state.is_settling());
    }

    #[test]
    fn test_cancel_settle() {
        let handle = CancelHandle::new();
        let mut state = SyncState {
            cancel_waiter: Some(handle.clone()),
            ..SyncState::default()
        };

        assert!(state.is_settling());
        assert!(state.cancel_settle());
        assert!(handle.is_cancelled());
        assert!(!state.cancel_settle());
    }
}

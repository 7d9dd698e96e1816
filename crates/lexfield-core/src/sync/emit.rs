//! Emit path: filter engine changes before they reach the host.

use crate::hash::ContentHash;
use crate::tags::UpdateTags;

use super::SyncState;

/// Verdict on one engine change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitDecision {
    /// Propagate to the host.
    Emit,
    /// A host value is present but its settle observation has not completed;
    /// this is load-time normalisation, not a user edit.
    AwaitingBaseline,
    /// The engine is back at exactly the settled incoming state.
    MatchesBaseline,
    /// Same as the last value already sent out.
    DuplicateEmit,
}

impl EmitDecision {
    pub fn is_emit(self) -> bool {
        matches!(self, Self::Emit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emit => "emit",
            Self::AwaitingBaseline => "awaitingBaseline",
            Self::MatchesBaseline => "matchesBaseline",
            Self::DuplicateEmit => "duplicateEmit",
        }
    }
}

/// Decide whether a change hashing to `next_hash` should be propagated.
///
/// On [`EmitDecision::Emit`] the hash is recorded as the last emitted value.
pub fn decide_emit(sync: &mut SyncState, has_incoming: bool, next_hash: ContentHash) -> EmitDecision {
    if has_incoming && !sync.has_normalized_baseline {
        tracing::trace!(%next_hash, "waiting for settled baseline");
        return EmitDecision::AwaitingBaseline;
    }

    if sync.normalized_incoming_hash == Some(next_hash) {
        tracing::trace!(%next_hash, "change matches settled baseline");
        return EmitDecision::MatchesBaseline;
    }

    if sync.last_emitted_hash == Some(next_hash) {
        tracing::trace!(%next_hash, "change already emitted");
        return EmitDecision::DuplicateEmit;
    }

    sync.last_emitted_hash = Some(next_hash);
    EmitDecision::Emit
}

/// Whether a nested sub-editor's change should be forwarded to the parent.
///
/// Nested apply echoes and pure focus transitions carry no content change.
pub fn forward_nested(tags: &UpdateTags) -> bool {
    !tags.is_apply() && !tags.is_focus_only()
}

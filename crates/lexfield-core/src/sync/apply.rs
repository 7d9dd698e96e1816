//! Apply path: push host values into the engine.

use crate::engine::EditorEngine;
use crate::error::Result;
use crate::hash::{ContentHash, hash_state};
use crate::schedule::RoundScheduler;
use crate::state::DocumentState;
use crate::tags::APPLY_VALUE_TAG;

use super::SyncState;

/// A host value together with its precomputed hash.
#[derive(Debug, Clone, Copy)]
pub struct Incoming<'a> {
    pub value: &'a DocumentState,
    pub hash: ContentHash,
}

impl<'a> Incoming<'a> {
    pub fn new(value: &'a DocumentState) -> Self {
        Self {
            value,
            hash: hash_state(value),
        }
    }
}

/// What the apply path did with an incoming value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// No host value.
    Absent,
    /// The value is our own last emit coming back.
    Echo,
    /// Already applied; any in-flight settle observation is left alone.
    Unchanged,
    /// Pushed into the engine; a settle observation is pending.
    Applied,
}

impl ApplyOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Echo => "echo",
            Self::Unchanged => "unchanged",
            Self::Applied => "applied",
        }
    }
}

/// Pending capture of the engine's settled state after an apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleObservation {
    /// Raw hash of the value that was applied.
    pub applied: ContentHash,
}

/// Decide whether `incoming` should replace the live engine state, and do so.
///
/// On apply the previous settle observation is cancelled and a new one is
/// queued on `settle` to fire after `settle_rounds`. The observation is owned
/// by the scheduler, not by the caller, so it survives the caller going away
/// and only a later apply can supersede it.
pub fn apply_incoming<E: EditorEngine>(
    sync: &mut SyncState,
    settle: &mut RoundScheduler<SettleObservation>,
    engine: &mut E,
    incoming: Option<Incoming<'_>>,
    settle_rounds: u32,
) -> Result<ApplyOutcome> {
    let Some(incoming) = incoming else {
        return Ok(ApplyOutcome::Absent);
    };

    if sync.last_emitted_hash == Some(incoming.hash) {
        if !sync.has_normalized_baseline {
            sync.has_normalized_baseline = true;
            sync.cancel_settle();
        }
        tracing::trace!(hash = %incoming.hash, "incoming value is an echo of last emit");
        return Ok(ApplyOutcome::Echo);
    }

    if sync.last_applied_hash == Some(incoming.hash) {
        return Ok(ApplyOutcome::Unchanged);
    }

    if sync.cancel_settle() {
        tracing::trace!("superseding pending settle observation");
    }
    sync.has_normalized_baseline = false;

    let parsed = engine.parse(incoming.value)?;
    engine.replace_state(parsed, APPLY_VALUE_TAG)?;
    sync.last_applied_hash = Some(incoming.hash);

    let handle = settle.schedule(
        settle_rounds,
        SettleObservation {
            applied: incoming.hash,
        },
    );
    sync.cancel_waiter = Some(handle);

    tracing::debug!(hash = %incoming.hash, settle_rounds, "applied incoming value");
    Ok(ApplyOutcome::Applied)
}

/// Capture the engine's settled state as the new baseline.
///
/// Called when a [`SettleObservation`] comes due. Returns the settled hash.
///
/// If the engine cannot be read the observation is spent but no baseline is
/// recorded, so emits stay gated until the next apply.
pub fn observe_settled<E: EditorEngine>(sync: &mut SyncState, engine: &E) -> Result<ContentHash> {
    sync.cancel_waiter = None;
    let settled = hash_state(&engine.current_document()?);
    sync.normalized_incoming_hash = Some(settled);
    sync.has_normalized_baseline = true;
    Ok(settled)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::FieldError;

    /// Engine double that stores serialized states and counts replacements.
    #[derive(Default)]
    struct RecordingEngine {
        current: Option<DocumentState>,
        replaced: Vec<(DocumentState, String)>,
        normalize: Option<DocumentState>,
        reject_replace: bool,
        unreadable: bool,
    }

    impl EditorEngine for RecordingEngine {
        type State = DocumentState;

        fn parse(&self, value: &DocumentState) -> Result<DocumentState> {
            if value.as_value().get("root").is_none() {
                return Err(FieldError::Parse("missing root".into()));
            }
            Ok(value.clone())
        }

        fn replace_state(&mut self, state: DocumentState, tag: &str) -> Result<()> {
            if self.reject_replace {
                return Err(FieldError::Parse("unknown node type".into()));
            }
            self.replaced.push((state.clone(), tag.to_string()));
            self.current = Some(self.normalize.clone().unwrap_or(state));
            Ok(())
        }

        fn current_state(&self) -> Result<DocumentState> {
            if self.unreadable {
                return Err(FieldError::Engine("editor destroyed".into()));
            }
            Ok(self.current.clone().unwrap_or_else(DocumentState::empty))
        }

        fn to_serializable(&self, state: &DocumentState) -> Result<DocumentState> {
            Ok(state.clone())
        }
    }

    fn doc(text: &str) -> DocumentState {
        DocumentState::from(json!({ "root": { "type": "root", "text": text } }))
    }

    fn drain(scheduler: &mut RoundScheduler<SettleObservation>, rounds: u32) -> Vec<SettleObservation> {
        (0..rounds).flat_map(|_| scheduler.advance()).collect()
    }

    #[test]
    fn test_absent_value_is_noop() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine::default();

        let outcome = apply_incoming(&mut sync, &mut settle, &mut engine, None, 3).unwrap();
        assert_eq!(outcome, ApplyOutcome::Absent);
        assert!(engine.replaced.is_empty());
    }

    #[test]
    fn test_apply_once_for_same_hash() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine::default();
        let a = doc("a");

        let first = apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3);
        let second = apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3);

        assert_eq!(first.unwrap(), ApplyOutcome::Applied);
        assert_eq!(second.unwrap(), ApplyOutcome::Unchanged);
        assert_eq!(engine.replaced.len(), 1);
        assert_eq!(engine.replaced[0].1, APPLY_VALUE_TAG);
        assert_eq!(sync.last_applied_hash, Some(a.content_hash()));
    }

    #[test]
    fn test_unchanged_keeps_pending_observation() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine::default();
        let a = doc("a");

        apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3).unwrap();
        settle.advance();
        apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3).unwrap();

        assert!(sync.is_settling());
        assert_eq!(drain(&mut settle, 2).len(), 1);
    }

    #[test]
    fn test_echo_skips_apply_and_sets_baseline() {
        let a = doc("a");
        let mut sync = SyncState {
            last_emitted_hash: Some(a.content_hash()),
            ..SyncState::default()
        };
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine::default();

        let outcome =
            apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3).unwrap();

        assert_eq!(outcome, ApplyOutcome::Echo);
        assert!(engine.replaced.is_empty());
        assert!(sync.has_normalized_baseline);
    }

    #[test]
    fn test_echo_cancels_outstanding_observation() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine::default();
        let a = doc("a");
        let b = doc("b");

        apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3).unwrap();
        sync.last_emitted_hash = Some(b.content_hash());
        let outcome =
            apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&b)), 3).unwrap();

        assert_eq!(outcome, ApplyOutcome::Echo);
        assert!(sync.has_normalized_baseline);
        assert!(drain(&mut settle, 3).is_empty());
    }

    #[test]
    fn test_new_value_clears_baseline_and_supersedes() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine::default();
        let a = doc("a");
        let c = doc("c");

        apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3).unwrap();
        settle.advance();
        sync.has_normalized_baseline = true;
        apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&c)), 3).unwrap();
        assert!(!sync.has_normalized_baseline);

        let fired = drain(&mut settle, 3);
        assert_eq!(
            fired,
            vec![SettleObservation {
                applied: c.content_hash()
            }]
        );
    }

    #[test]
    fn test_observe_settled_uses_engine_state() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let normalized = doc("normalized");
        let mut engine = RecordingEngine {
            normalize: Some(normalized.clone()),
            ..RecordingEngine::default()
        };
        let raw = doc("raw");

        apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&raw)), 1).unwrap();
        assert_eq!(settle.advance().len(), 1);
        let settled = observe_settled(&mut sync, &engine).unwrap();

        assert_eq!(settled, normalized.content_hash());
        assert_eq!(sync.normalized_incoming_hash, Some(normalized.content_hash()));
        assert_eq!(sync.last_applied_hash, Some(raw.content_hash()));
        assert!(sync.has_normalized_baseline);
        assert!(!sync.is_settling());
    }

    #[test]
    fn test_parse_failure_propagates() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine::default();
        let bad = DocumentState::from(json!({ "nope": true }));

        let err = apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&bad)), 3)
            .unwrap_err();

        assert!(matches!(err, FieldError::Parse(_)));
        assert!(engine.replaced.is_empty());
        assert!(sync.last_applied_hash.is_none());
        assert!(settle.is_idle());
    }

    #[test]
    fn test_rejected_replace_is_not_recorded() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine {
            reject_replace: true,
            ..RecordingEngine::default()
        };
        let a = doc("a");

        let err = apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3)
            .unwrap_err();
        assert!(matches!(err, FieldError::Parse(_)));
        assert!(sync.last_applied_hash.is_none());
        assert!(settle.is_idle());

        // Once the engine accepts it, the same value is applied rather than skipped.
        engine.reject_replace = false;
        let retry =
            apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 3).unwrap();
        assert_eq!(retry, ApplyOutcome::Applied);
        assert_eq!(engine.replaced.len(), 1);
    }

    #[test]
    fn test_unreadable_engine_leaves_baseline_unset() {
        let mut sync = SyncState::new();
        let mut settle = RoundScheduler::new();
        let mut engine = RecordingEngine::default();
        let a = doc("a");

        apply_incoming(&mut sync, &mut settle, &mut engine, Some(Incoming::new(&a)), 1).unwrap();
        engine.unreadable = true;
        assert_eq!(settle.advance().len(), 1);

        let err = observe_settled(&mut sync, &engine).unwrap_err();
        assert!(matches!(err, FieldError::Engine(_)));
        assert!(sync.normalized_incoming_hash.is_none());
        assert!(!sync.has_normalized_baseline);
        assert!(!sync.is_settling());
    }
}

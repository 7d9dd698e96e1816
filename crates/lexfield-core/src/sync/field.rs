//! `EditorField`: one mounted field driven by the host event loop.

use web_time::Instant;

use crate::cache::PreloadCache;
use crate::config::FieldConfig;
use crate::engine::EditorEngine;
use crate::error::Result;
use crate::hash::hash_state;
use crate::host::FieldHost;
use crate::schedule::{IdleDispatcher, RoundScheduler};
use crate::state::DocumentState;
use crate::tags::UpdateTags;

use super::{
    ApplyOutcome, EmitDecision, Incoming, SettleObservation, SyncState, apply_incoming,
    decide_emit, forward_nested, observe_settled,
};

/// One mounted rich-text field: an engine, its host value slot, and the
/// bookkeeping that keeps them from echoing into each other.
///
/// The host event loop drives it:
/// - [`on_value`](Self::on_value) whenever the form value changes
/// - [`on_change`](Self::on_change) for every engine change notification
/// - [`tick`](Self::tick) once per scheduling round (microtask, frame)
/// - [`idle`](Self::idle) / [`poll`](Self::poll) to flush coalesced emits
pub struct EditorField<E, H> {
    config: FieldConfig,
    engine: E,
    host: H,
    sync: SyncState,
    settle: RoundScheduler<SettleObservation>,
    dispatch: IdleDispatcher<DocumentState>,
    preload: PreloadCache,
}

impl<E: EditorEngine, H: FieldHost> EditorField<E, H> {
    pub fn new(engine: E, host: H, config: FieldConfig) -> Result<Self> {
        config.validate()?;
        let dispatch = IdleDispatcher::new(config.emit_timeout());
        Ok(Self {
            config,
            engine,
            host,
            sync: SyncState::new(),
            settle: RoundScheduler::new(),
            dispatch,
            preload: PreloadCache::new(),
        })
    }

    /// Create the field and apply the host's current value.
    pub fn mount(engine: E, host: H, config: FieldConfig) -> Result<Self> {
        let mut field = Self::new(engine, host, config)?;
        field.on_value()?;
        Ok(field)
    }

    /// Run the apply path against the host's current value.
    pub fn on_value(&mut self) -> Result<ApplyOutcome> {
        let value = self.host.incoming_value();
        apply_incoming(
            &mut self.sync,
            &mut self.settle,
            &mut self.engine,
            value.as_ref().map(Incoming::new),
            self.config.settle_rounds,
        )
    }

    /// Handle an engine change notification.
    ///
    /// Returns the decision if the change was judged immediately, or `None` if
    /// it was queued for idle time.
    pub fn on_change(&mut self, state: DocumentState, tags: &UpdateTags) -> Option<EmitDecision> {
        self.on_change_at(state, tags, Instant::now())
    }

    pub fn on_change_at(
        &mut self,
        state: DocumentState,
        tags: &UpdateTags,
        now: Instant,
    ) -> Option<EmitDecision> {
        if !self.config.idle_scheduling {
            return Some(self.dispatch_update(state));
        }

        if self.dispatch.schedule(state, now).is_some() {
            tracing::trace!(tags = ?tags, "superseded pending field update");
        }
        None
    }

    /// Handle a change from a nested sub-editor (caption, admonition body).
    ///
    /// Forwarded changes carry the parent engine's full state, since the
    /// parent's serialized form is what the host stores. If the parent state
    /// cannot be read nothing is forwarded.
    pub fn on_nested_change(&mut self, tags: &UpdateTags) -> Result<Option<EmitDecision>> {
        if !forward_nested(tags) {
            return Ok(None);
        }
        let state = self.engine.current_document()?;
        Ok(self.on_change(state, tags))
    }

    /// Advance one scheduling round, running any settle observation now due.
    pub fn tick(&mut self) -> Result<()> {
        for observation in self.settle.advance() {
            let settled = observe_settled(&mut self.sync, &self.engine)?;
            tracing::debug!(
                applied = %observation.applied,
                %settled,
                "captured settled baseline"
            );
        }
        Ok(())
    }

    /// The host has idle time: flush the pending update, if any.
    pub fn idle(&mut self) -> Option<EmitDecision> {
        let state = self.dispatch.take_idle()?;
        Some(self.dispatch_update(state))
    }

    /// Flush the pending update if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<EmitDecision> {
        let state = self.dispatch.take_expired(now)?;
        Some(self.dispatch_update(state))
    }

    /// Throw away all synchronisation state and apply the host value afresh.
    pub fn remount(&mut self) -> Result<ApplyOutcome> {
        self.sync.cancel_settle();
        self.sync = SyncState::new();
        self.settle = RoundScheduler::new();
        self.dispatch.cancel();
        self.preload.clear();
        self.on_value()
    }

    fn dispatch_update(&mut self, state: DocumentState) -> EmitDecision {
        let next_hash = hash_state(&state);
        let has_incoming = self.host.incoming_value().is_some();
        let decision = decide_emit(&mut self.sync, has_incoming, next_hash);
        if decision.is_emit() {
            tracing::debug!(%next_hash, "emitting field value");
            self.host.set_value(state);
        }
        decision
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn preload_cache(&mut self) -> &mut PreloadCache {
        &mut self.preload
    }

    /// Settle observations still waiting on scheduling rounds.
    pub fn pending_settles(&self) -> usize {
        self.settle.pending()
    }

    pub fn has_pending_update(&self) -> bool {
        self.dispatch.is_pending()
    }
}

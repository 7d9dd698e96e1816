//! lexfield-core: keeps a rich-text editor engine and a host form field in sync.
//!
//! This crate provides:
//! - `hash_state` / `ContentHash` - order-independent FNV-1a fingerprints of serialized states
//! - `EditorField<E, H>` - the apply/emit state machine for one mounted field
//! - `EditorEngine` and `FieldHost` traits - the seams to the engine and the form
//! - `RoundScheduler` / `IdleDispatcher` - cooperative settle and coalescing primitives
//! - Plugin support: command dispatch, image preload cache, related-document loading

pub mod cache;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod host;
pub mod related;
pub mod schedule;
pub mod state;
pub mod sync;
pub mod tags;

pub use cache::PreloadCache;
pub use commands::{CommandId, CommandPriority, CommandRegistry};
pub use config::FieldConfig;
pub use engine::EditorEngine;
pub use error::{FieldError, Result, ValidationError};
pub use hash::{ContentHash, canonical_json, hash_state, hash_str, hash_value};
pub use host::{FieldHost, ValidateOptions, validate_rich_text};
pub use related::{
    RelatedQuery, RelatedStore, RequestContext, load_related, load_related_with_context,
};
pub use schedule::{CancelHandle, IdleDispatcher, RoundScheduler};
pub use smol_str::SmolStr;
pub use state::DocumentState;
pub use sync::{
    ApplyOutcome, EditorField, EmitDecision, Incoming, SettleObservation, SyncState,
    apply_incoming, decide_emit, forward_nested, observe_settled,
};
pub use tags::{APPLY_VALUE_TAG, FOCUS_TAG, UpdateTags};

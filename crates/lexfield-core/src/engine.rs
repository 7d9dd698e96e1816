//! The seam between the field and the rich-text engine.
//!
//! The engine owns its internal document model, transforms and selection;
//! the field only parses values into it, replaces its state wholesale and
//! reads it back out in serialized form.

use crate::error::Result;
use crate::state::DocumentState;

/// Operations the synchronizer needs from a live editor instance.
pub trait EditorEngine {
    /// The engine's internal representation of a document.
    type State;

    /// Parse a serialized state. Malformed input is an error, not a fallback.
    fn parse(&self, value: &DocumentState) -> Result<Self::State>;

    /// Replace the live state, tagging the resulting update with `tag`.
    ///
    /// An engine that rejects the state reports [`FieldError::Parse`](crate::FieldError::Parse).
    fn replace_state(&mut self, state: Self::State, tag: &str) -> Result<()>;

    /// Snapshot of the live state, including any normalisation already committed.
    fn current_state(&self) -> Result<Self::State>;

    fn to_serializable(&self, state: &Self::State) -> Result<DocumentState>;

    /// Current live state in serialized form.
    fn current_document(&self) -> Result<DocumentState> {
        self.to_serializable(&self.current_state()?)
    }
}

//! Update tags attached to engine change notifications.

use std::collections::BTreeSet;

use smol_str::SmolStr;

/// Marks the engine update that replaces the whole state with a host value.
pub const APPLY_VALUE_TAG: &str = "payload-apply-value";

/// Emitted by the engine for pure focus transitions.
pub const FOCUS_TAG: &str = "focus";

/// The opaque tag set carried by a change notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTags(BTreeSet<SmolStr>);

impl UpdateTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<SmolStr>) -> bool {
        self.0.insert(tag.into())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(SmolStr::as_str)
    }

    /// The update came from applying a host value.
    pub fn is_apply(&self) -> bool {
        self.contains(APPLY_VALUE_TAG)
    }

    /// The tag set is exactly `{focus}`.
    pub fn is_focus_only(&self) -> bool {
        self.len() == 1 && self.contains(FOCUS_TAG)
    }
}

impl<S: Into<SmolStr>> FromIterator<S> for UpdateTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

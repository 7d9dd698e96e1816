//! Image preload cache.
//!
//! Inline image nodes preload their source before rendering. The set of URLs
//! already loaded is owned by the field root and handed down to nodes. It is
//! unbounded and only cleared on a full remount.

use std::collections::HashSet;

use smol_str::SmolStr;

#[derive(Debug, Clone, Default)]
pub struct PreloadCache {
    loaded: HashSet<SmolStr>,
}

impl PreloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `url` unless it is already cached.
    ///
    /// Returns `Ok(true)` if `load` ran and succeeded, `Ok(false)` on a cache
    /// hit. A failed load is not cached, so the next call retries.
    pub fn preload<E>(
        &mut self,
        url: &str,
        load: impl FnOnce(&str) -> Result<(), E>,
    ) -> Result<bool, E> {
        if self.loaded.contains(url) {
            return Ok(false);
        }
        load(url)?;
        self.loaded.insert(SmolStr::new(url));
        Ok(true)
    }

    /// Record a URL loaded elsewhere (for example by the browser itself).
    pub fn mark_loaded(&mut self, url: &str) -> bool {
        self.loaded.insert(SmolStr::new(url))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.loaded.contains(url)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn clear(&mut self) {
        self.loaded.clear();
    }
}

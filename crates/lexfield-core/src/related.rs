//! Loading documents referenced from rich-text nodes.
//!
//! A missing or unreachable related document is a normal outcome: failures are
//! logged and come back as `None`.

use std::collections::HashMap;
use std::future::Future;

use serde_json::Value;
use smol_str::SmolStr;

use crate::error::Result;

/// Lookup of one related document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedQuery {
    pub collection: SmolStr,
    pub id: SmolStr,
    pub depth: u32,
    pub locale: Option<SmolStr>,
}

impl RelatedQuery {
    pub fn new(collection: impl Into<SmolStr>, id: impl Into<SmolStr>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            depth: 0,
            locale: None,
        }
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn locale(mut self, locale: impl Into<SmolStr>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

/// The host's document store.
///
/// `context` is the request's visited-id guard. Stores that resolve references
/// inside the loaded document go through [`load_related_with_context`] with it,
/// so a cycle is cut at any depth.
pub trait RelatedStore {
    fn find_by_id(
        &self,
        query: &RelatedQuery,
        context: &mut RequestContext,
    ) -> impl Future<Output = Result<Value>>;
}

/// Ids already loaded per context key during one request.
///
/// Guards against reference cycles: a document that embeds itself, directly
/// or through another, is only loaded once.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    visited: HashMap<SmolStr, Vec<SmolStr>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` under `key`. Returns false if it was already recorded.
    pub fn visit(&mut self, key: &str, id: &str) -> bool {
        let ids = self.visited.entry(SmolStr::new(key)).or_default();
        if ids.iter().any(|seen| seen == id) {
            return false;
        }
        ids.push(SmolStr::new(id));
        true
    }

    pub fn visited(&self, key: &str) -> &[SmolStr] {
        self.visited
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Load one related document in a fresh request context.
pub async fn load_related<S: RelatedStore>(store: &S, query: &RelatedQuery) -> Option<Value> {
    find_logged(store, &mut RequestContext::new(), query).await
}

async fn find_logged<S: RelatedStore>(
    store: &S,
    context: &mut RequestContext,
    query: &RelatedQuery,
) -> Option<Value> {
    match store.find_by_id(query, context).await {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::error!(
                collection = %query.collection,
                id = %query.id,
                error = %e,
                "failed to load related document"
            );
            None
        }
    }
}

/// Like [`load_related`], but skips ids already visited under `key` in `context`.
pub async fn load_related_with_context<S: RelatedStore>(
    store: &S,
    context: &mut RequestContext,
    key: &str,
    query: &RelatedQuery,
) -> Option<Value> {
    if !context.visit(key, &query.id) {
        tracing::debug!(key, id = %query.id, "related document already visited");
        return None;
    }
    find_logged(store, context, query).await
}

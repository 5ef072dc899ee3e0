// ── Paginated resources ──
//
// A `Resource` is a row type with a server collection behind it; a
// `ResourceSource` is how that collection is reached. Everything else in
// this module is generic over the two.

pub mod batch;
pub mod controller;
pub mod debounce;
pub mod fetch;
pub mod query_state;
pub mod selection;
pub mod sources;
pub mod stats;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{EntityId, ListQuery, PageEnvelope, StatsSpec, StatsSummary};

/// A row type served by a paginated list endpoint.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Collection name, as used in `/api/{kind}`.
    const KIND: &'static str;
    /// Filter keys the list endpoint accepts.
    const FILTERS: &'static [&'static str];
    /// How the statistics panel is counted.
    const STATS: StatsSpec;

    fn id(&self) -> &EntityId;
}

/// Server access for one resource type.
#[async_trait]
pub trait ResourceSource: Send + Sync + 'static {
    type Item: Resource;

    async fn list(&self, query: &ListQuery) -> Result<PageEnvelope<Self::Item>, CoreError>;

    /// Precomputed summary; may be unavailable.
    async fn stats(&self) -> Result<StatsSummary, CoreError>;

    async fn delete(&self, id: &EntityId) -> Result<(), CoreError>;

    fn supports_bulk_delete(&self) -> bool {
        false
    }

    /// Delete all ids in one request (all-or-nothing).
    async fn bulk_delete(&self, _ids: &[EntityId]) -> Result<(), CoreError> {
        Err(CoreError::Unsupported {
            operation: format!("bulk delete of {}", Self::Item::KIND),
            required: "a bulk-delete endpoint".into(),
        })
    }
}

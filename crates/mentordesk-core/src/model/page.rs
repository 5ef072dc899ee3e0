// ── Page envelope ──
//
// One server page of items plus its pagination metadata. Construction
// enforces the envelope invariants so consumers never re-check them.

use serde::Serialize;
use tracing::warn;

use super::EntityId;
use crate::resource::Resource;

/// Pagination metadata of one list response.
///
/// Invariants: `last_page >= 1`, `1 <= current_page <= last_page`,
/// `per_page >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    current_page: u32,
    last_page: u32,
    per_page: u32,
    total: u64,
}

impl Pagination {
    /// Build pagination metadata, clamping out-of-range values.
    pub fn new(current_page: u32, last_page: u32, per_page: u32, total: u64) -> Self {
        let last_page = last_page.max(1);
        Self {
            current_page: current_page.clamp(1, last_page),
            last_page,
            per_page: per_page.max(1),
            total,
        }
    }

    /// Metadata for "nothing loaded yet".
    pub fn empty(per_page: u32) -> Self {
        Self::new(1, 1, per_page, 0)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// A page of items with its pagination metadata.
///
/// Invariant: `items.len() <= pagination.per_page()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageEnvelope<T> {
    items: Vec<T>,
    #[serde(flatten)]
    pagination: Pagination,
}

impl<T> PageEnvelope<T> {
    pub fn new(mut items: Vec<T>, pagination: Pagination) -> Self {
        let limit = usize::try_from(pagination.per_page()).unwrap_or(usize::MAX);
        if items.len() > limit {
            warn!(
                received = items.len(),
                per_page = limit,
                "page larger than per_page; truncating"
            );
            items.truncate(limit);
        }
        Self { items, pagination }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn into_parts(self) -> (Vec<T>, Pagination) {
        (self.items, self.pagination)
    }
}

impl<T: Resource> PageEnvelope<T> {
    /// Identifiers of the items on this page, in page order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }
}

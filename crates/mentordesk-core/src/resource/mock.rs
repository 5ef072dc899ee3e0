// In-memory `ResourceSource` for controller tests.

#![allow(clippy::unwrap_used, clippy::as_conversions, clippy::cast_possible_truncation)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{
    CategoryCount, EntityId, ListQuery, PageEnvelope, Pagination, StatsSpec, StatsSummary,
};

use super::{Resource, ResourceSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: EntityId,
    pub kind: &'static str,
    pub status: &'static str,
}

impl Resource for Item {
    const KIND: &'static str = "items";
    const FILTERS: &'static [&'static str] = &["kind", "status"];
    const STATS: StatsSpec = StatsSpec {
        category_field: "kind",
        categories: &["a", "b"],
        status_field: "status",
        active_value: "active",
    };

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// `n` items, ids 1..=n, alternating kind a/b, every third inactive.
pub fn items(n: u64) -> Vec<Item> {
    (1..=n)
        .map(|i| Item {
            id: EntityId::Numeric(i),
            kind: if i % 2 == 0 { "b" } else { "a" },
            status: if i % 3 == 0 { "inactive" } else { "active" },
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct MockSource {
    items: Mutex<Vec<Item>>,
    /// Artificial latency per requested page.
    page_delays: HashMap<u32, Duration>,
    pub fail_list: bool,
    pub fail_stats: bool,
    pub fail_delete: HashSet<EntityId>,
    pub bulk: bool,
    pub list_calls: AtomicUsize,
    queries: Mutex<Vec<ListQuery>>,
}

impl MockSource {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn with_page_delay(mut self, page: u32, delay: Duration) -> Self {
        self.page_delays.insert(page, delay);
        self
    }

    pub fn queries(&self) -> Vec<ListQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    fn matching(&self, query: &ListQuery) -> Vec<Item> {
        let criteria = query.criteria();
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|item| criteria.filter("kind").is_none_or(|k| k == item.kind))
            .filter(|item| criteria.filter("status").is_none_or(|s| s == item.status))
            .cloned()
            .collect()
    }

    /// What a correct summary endpoint would return.
    pub fn true_summary(&self) -> StatsSummary {
        let items = self.items.lock().unwrap();
        let mut counts: HashMap<String, CategoryCount> = HashMap::new();
        for item in items.iter() {
            let entry = counts.entry(item.kind.to_owned()).or_default();
            entry.total += 1;
            if item.status == "active" {
                entry.active += 1;
            }
        }
        let total = items.len() as u64;
        let active = items.iter().filter(|i| i.status == "active").count() as u64;
        StatsSummary::from_counts(&Item::STATS, total, active, counts)
    }
}

#[async_trait]
impl ResourceSource for MockSource {
    type Item = Item;

    async fn list(&self, query: &ListQuery) -> Result<PageEnvelope<Item>, CoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.page_delays.get(&query.page()) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_list {
            return Err(CoreError::Api {
                message: "list failed".into(),
                status: Some(500),
            });
        }

        let matching = self.matching(query);
        let per_page = query.per_page() as usize;
        let total = matching.len() as u64;
        let last_page = u32::try_from(matching.len().div_ceil(per_page)).unwrap();
        let start = (query.page() as usize - 1) * per_page;
        let page_items = matching.into_iter().skip(start).take(per_page).collect();
        Ok(PageEnvelope::new(
            page_items,
            Pagination::new(query.page(), last_page, query.per_page(), total),
        ))
    }

    async fn stats(&self) -> Result<StatsSummary, CoreError> {
        if self.fail_stats {
            return Err(CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: "items/stats".into(),
            });
        }
        Ok(self.true_summary())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        if self.fail_delete.contains(id) {
            return Err(CoreError::Forbidden {
                message: format!("cannot delete {id}"),
            });
        }
        self.items.lock().unwrap().retain(|item| &item.id != id);
        Ok(())
    }

    fn supports_bulk_delete(&self) -> bool {
        self.bulk
    }

    async fn bulk_delete(&self, ids: &[EntityId]) -> Result<(), CoreError> {
        if ids.iter().any(|id| self.fail_delete.contains(id)) {
            return Err(CoreError::ValidationFailed {
                message: "bulk delete rejected".into(),
            });
        }
        self.items.lock().unwrap().retain(|item| !ids.contains(&item.id));
        Ok(())
    }
}

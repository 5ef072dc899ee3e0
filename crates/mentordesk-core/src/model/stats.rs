// ── Statistics summary ──

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Which list filters a resource's statistics are counted over.
///
/// `categories` is the closed set of values of `category_field` that the
/// summary reports; "active" rows are those with
/// `status_field == active_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSpec {
    pub category_field: &'static str,
    pub categories: &'static [&'static str],
    pub status_field: &'static str,
    pub active_value: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub total: u64,
    pub active: u64,
}

/// Aggregate counts for one resource.
///
/// Whichever way it was built, a summary conformed to a [`StatsSpec`] has
/// exactly one entry per declared category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total: u64,
    pub active: u64,
    pub by_category: BTreeMap<String, CategoryCount>,
}

impl StatsSummary {
    /// All-zero summary with every declared category present.
    pub fn zero(spec: &StatsSpec) -> Self {
        Self {
            total: 0,
            active: 0,
            by_category: spec
                .categories
                .iter()
                .map(|c| ((*c).to_owned(), CategoryCount::default()))
                .collect(),
        }
    }

    /// Build from raw counts, keeping only (and all of) the declared categories.
    pub fn from_counts(
        spec: &StatsSpec,
        total: u64,
        active: u64,
        mut counts: HashMap<String, CategoryCount>,
    ) -> Self {
        let by_category = spec
            .categories
            .iter()
            .map(|c| ((*c).to_owned(), counts.remove(*c).unwrap_or_default()))
            .collect();
        Self {
            total,
            active,
            by_category,
        }
    }

    /// Re-shape an existing summary to the declared categories.
    pub fn conform(self, spec: &StatsSpec) -> Self {
        Self::from_counts(
            spec,
            self.total,
            self.active,
            self.by_category.into_iter().collect(),
        )
    }

    pub fn category(&self, name: &str) -> CategoryCount {
        self.by_category.get(name).copied().unwrap_or_default()
    }
}

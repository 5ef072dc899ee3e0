// ── Statistics with fallback ──
//
// Two ways to build the same `StatsSummary`: ask the summary endpoint
// (`DirectStats`), or count rows through the list endpoint with one-row
// queries (`DerivedStats`). The aggregator tries a primary strategy and
// falls back to a second; it does not know which is which.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::future::{try_join, try_join_all};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{CategoryCount, Criteria, ListQuery, StatsSpec, StatsSummary};
use crate::notify::Notifier;

use super::{Resource, ResourceSource};

/// One way of producing a summary.
#[async_trait]
pub trait StatsStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn summarize(&self) -> Result<StatsSummary, CoreError>;
}

// ── Direct ───────────────────────────────────────────────────────────

/// Precomputed summary from `GET /api/{resource}/stats`.
pub struct DirectStats<S> {
    source: Arc<S>,
}

impl<S> DirectStats<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: ResourceSource> StatsStrategy for DirectStats<S> {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn summarize(&self) -> Result<StatsSummary, CoreError> {
        let raw = self.source.stats().await?;
        Ok(raw.conform(&<S::Item as Resource>::STATS))
    }
}

// ── Derived ──────────────────────────────────────────────────────────

/// Summary rebuilt from `total` counts of filtered one-row list queries.
pub struct DerivedStats<S> {
    source: Arc<S>,
}

impl<S> DerivedStats<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

impl<S: ResourceSource> DerivedStats<S> {
    async fn count(&self, criteria: Criteria) -> Result<u64, CoreError> {
        let page = self.source.list(&ListQuery::count(criteria)).await?;
        Ok(page.pagination().total())
    }

    async fn category(&self, spec: &StatsSpec, category: &str) -> Result<CategoryCount, CoreError> {
        let all = Criteria::default().with_filter(spec.category_field, category);
        let active = all
            .clone()
            .with_filter(spec.status_field, spec.active_value);
        let (total, active) = try_join(self.count(all), self.count(active)).await?;
        Ok(CategoryCount { total, active })
    }
}

#[async_trait]
impl<S: ResourceSource> StatsStrategy for DerivedStats<S> {
    fn name(&self) -> &'static str {
        "derived"
    }

    async fn summarize(&self) -> Result<StatsSummary, CoreError> {
        let spec = <S::Item as Resource>::STATS;
        let overall = try_join(
            self.count(Criteria::default()),
            self.count(Criteria::default().with_filter(spec.status_field, spec.active_value)),
        );
        let per_category = try_join_all(
            spec.categories
                .iter()
                .map(|category| self.category(&spec, category)),
        );
        let ((total, active), counts) = try_join(overall, per_category).await?;

        let counts: HashMap<String, CategoryCount> = spec
            .categories
            .iter()
            .map(|c| (*c).to_owned())
            .zip(counts)
            .collect();
        Ok(StatsSummary::from_counts(&spec, total, active, counts))
    }
}

// ── Aggregator ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOrigin {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOutcome {
    Fresh(StatsOrigin),
    /// Both strategies failed; the previous summary is kept.
    Unavailable,
    /// A newer refresh was issued meanwhile; result discarded.
    Stale,
    Cancelled,
}

pub struct StatsAggregator {
    kind: &'static str,
    primary: Arc<dyn StatsStrategy>,
    fallback: Arc<dyn StatsStrategy>,
    summary: watch::Sender<StatsSummary>,
    latest: AtomicU64,
    notifier: Notifier,
    cancel: CancellationToken,
}

impl StatsAggregator {
    pub fn new(
        kind: &'static str,
        spec: &StatsSpec,
        primary: Arc<dyn StatsStrategy>,
        fallback: Arc<dyn StatsStrategy>,
        notifier: Notifier,
        cancel: CancellationToken,
    ) -> Self {
        let (summary, _) = watch::channel(StatsSummary::zero(spec));
        Self {
            kind,
            primary,
            fallback,
            summary,
            latest: AtomicU64::new(0),
            notifier,
            cancel,
        }
    }

    /// Direct first, derived on failure.
    pub fn for_source<S: ResourceSource>(
        source: &Arc<S>,
        notifier: Notifier,
        cancel: CancellationToken,
    ) -> Self {
        Self::new(
            <S::Item as Resource>::KIND,
            &<S::Item as Resource>::STATS,
            Arc::new(DirectStats::new(source.clone())),
            Arc::new(DerivedStats::new(source.clone())),
            notifier,
            cancel,
        )
    }

    pub fn summary(&self) -> StatsSummary {
        self.summary.borrow().clone()
    }

    /// Refresh the summary. Only the most recently issued refresh may
    /// replace it.
    pub async fn refresh(&self) -> StatsOutcome {
        let request_id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let attempt = async {
            match self.primary.summarize().await {
                Ok(summary) => Ok((StatsOrigin::Primary, summary)),
                Err(primary_err) => {
                    debug!(
                        resource = self.kind,
                        strategy = self.primary.name(),
                        error = %primary_err,
                        "stats unavailable; falling back"
                    );
                    self.fallback
                        .summarize()
                        .await
                        .map(|summary| (StatsOrigin::Fallback, summary))
                }
            }
        };

        let result = tokio::select! {
            () = self.cancel.cancelled() => return StatsOutcome::Cancelled,
            result = attempt => result,
        };

        match result {
            Ok((origin, summary)) => {
                // Checked under the channel lock so a newer result cannot
                // land between the check and the write.
                let applied = self.summary.send_if_modified(|current| {
                    if self.latest.load(Ordering::Acquire) != request_id {
                        return false;
                    }
                    *current = summary;
                    true
                });
                if applied {
                    StatsOutcome::Fresh(origin)
                } else {
                    debug!(resource = self.kind, request_id, "discarding stale stats");
                    StatsOutcome::Stale
                }
            }
            Err(_) if self.latest.load(Ordering::Acquire) != request_id => StatsOutcome::Stale,
            Err(e) => {
                warn!(
                    resource = self.kind,
                    strategy = self.fallback.name(),
                    error = %e,
                    "stats fallback failed"
                );
                self.notifier
                    .warning(format!("Statistics for {} are unavailable", self.kind));
                StatsOutcome::Unavailable
            }
        }
    }
}

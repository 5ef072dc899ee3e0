// ── Resource controller ──
//
// One per mounted list screen. Owns the query state, the fetch cycle, the
// selection, the stats aggregator and the teardown token; every operation
// reports an outcome rather than an error the screen has to handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{AdminConfig, DEFAULT_PER_PAGE, DEFAULT_SEARCH_DEBOUNCE};
use crate::error::CoreError;
use crate::model::{Criteria, EntityId, ListQuery, StatsSummary};
use crate::notify::Notifier;

use super::batch::{self, BatchAction, BatchReport};
use super::debounce::Debouncer;
use super::fetch::{FetchCycle, FetchOutcome, FetchState};
use super::query_state::QueryState;
use super::selection::Selection;
use super::stats::{StatsAggregator, StatsOutcome};
use super::{Resource, ResourceSource};

/// Per-screen list tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    pub per_page: u32,
    pub search_debounce: Duration,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl From<&AdminConfig> for ListSettings {
    fn from(config: &AdminConfig) -> Self {
        Self {
            per_page: config.per_page,
            search_debounce: config.search_debounce,
        }
    }
}

/// List-screen engine for one resource type.
///
/// Cheaply cloneable via `Arc`; clones drive the same screen.
pub struct ResourceController<S: ResourceSource> {
    inner: Arc<ControllerInner<S>>,
}

impl<S: ResourceSource> Clone for ResourceController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<S: ResourceSource> {
    source: Arc<S>,
    query: Mutex<QueryState>,
    fetch: FetchCycle<S::Item>,
    selection: Mutex<Selection>,
    stats: StatsAggregator,
    debouncer: Debouncer,
    notifier: Notifier,
    cancel: CancellationToken,
}

impl<S: ResourceSource> ResourceController<S> {
    const KIND: &'static str = <S::Item as Resource>::KIND;

    pub fn new(source: Arc<S>, settings: ListSettings, notifier: Notifier) -> Self {
        let cancel = CancellationToken::new();
        let stats = StatsAggregator::for_source(&source, notifier.clone(), cancel.clone());
        Self {
            inner: Arc::new(ControllerInner {
                query: Mutex::new(QueryState::new(settings.per_page)),
                fetch: FetchCycle::new(settings.per_page, cancel.clone(), notifier.clone()),
                selection: Mutex::new(Selection::new()),
                stats,
                debouncer: Debouncer::new(settings.search_debounce, cancel.clone()),
                source,
                notifier,
                cancel,
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Initial load: first page and statistics, concurrently.
    pub async fn mount(&self) -> (FetchOutcome, StatsOutcome) {
        debug!(resource = Self::KIND, "mounting list screen");
        tokio::join!(self.refetch(), self.refresh_stats())
    }

    /// Cancel pending searches and suppress any in-flight result.
    pub fn teardown(&self) {
        self.inner.debouncer.cancel();
        self.inner.cancel.cancel();
        debug!(resource = Self::KIND, "list screen torn down");
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Re-issue the current query.
    ///
    /// A page past the end (after deleting the last rows of the final page)
    /// is clamped to the last page and fetched once more.
    pub async fn refetch(&self) -> FetchOutcome {
        let requested = self.query_state().query().page();
        let outcome = self.fetch_current().await;
        if !outcome.is_applied() {
            return outcome;
        }

        let last_page = self.inner.fetch.snapshot().pagination.last_page();
        if requested <= last_page {
            return outcome;
        }
        let clamped = {
            let mut state = self.query_state();
            state.query().page() == requested && state.set_page(last_page)
        };
        if !clamped {
            return outcome;
        }
        debug!(
            resource = Self::KIND,
            requested, last_page, "page out of range, clamping"
        );
        self.fetch_current().await
    }

    async fn fetch_current(&self) -> FetchOutcome {
        let query = self.query_state().query();
        self.inner
            .fetch
            .run_applying(self.inner.source.as_ref(), query, |ids| {
                self.selection().sync(ids.iter().cloned());
            })
            .await
    }

    /// Set (or clear, with a blank value) one filter. Refetches only if the
    /// payload changed; unknown filter keys are rejected.
    pub async fn set_filter(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Option<FetchOutcome>, CoreError> {
        Self::check_filter(key)?;
        let changed = self.query_state().set_filter(key, value);
        Ok(self.refetch_if(changed).await)
    }

    /// Replace the whole payload and page, then fetch once.
    pub async fn navigate(&self, criteria: Criteria, page: u32) -> Result<FetchOutcome, CoreError> {
        for key in criteria.filters().keys() {
            Self::check_filter(key)?;
        }
        {
            let mut state = self.query_state();
            state.set_criteria(criteria);
            state.set_page(page);
        }
        Ok(self.refetch().await)
    }

    fn check_filter(key: &str) -> Result<(), CoreError> {
        let filters = <S::Item as Resource>::FILTERS;
        if filters.contains(&key) {
            return Ok(());
        }
        Err(CoreError::ValidationFailed {
            message: format!(
                "unknown {} filter '{key}' (expected one of: {})",
                Self::KIND,
                filters.join(", ")
            ),
        })
    }

    pub async fn clear_filters(&self) -> Option<FetchOutcome> {
        let changed = self.query_state().clear_filters();
        self.refetch_if(changed).await
    }

    pub async fn set_page(&self, page: u32) -> Option<FetchOutcome> {
        let changed = self.query_state().set_page(page);
        self.refetch_if(changed).await
    }

    /// Record a keystroke; only the last value after the quiet period is
    /// applied.
    pub fn search_input(&self, text: &str) {
        let this = self.clone();
        let text = text.to_owned();
        self.inner.debouncer.schedule(async move {
            this.apply_search(&text).await;
        });
    }

    /// Apply a search term immediately, bypassing the debounce.
    pub async fn apply_search(&self, text: &str) -> Option<FetchOutcome> {
        self.inner.debouncer.cancel();
        let changed = self.query_state().set_search(text);
        self.refetch_if(changed).await
    }

    async fn refetch_if(&self, changed: bool) -> Option<FetchOutcome> {
        if changed {
            Some(self.refetch().await)
        } else {
            None
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn toggle(&self, id: &EntityId) -> bool {
        self.selection().toggle(id)
    }

    pub fn toggle_all(&self) {
        self.selection().toggle_all();
    }

    pub fn selected(&self) -> Vec<EntityId> {
        self.selection().selected()
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection().is_all_selected()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Delete the selection, then reload the page and the statistics.
    ///
    /// Succeeded ids leave the selection; failed ids stay selected if they
    /// are still on the reloaded page.
    pub async fn delete_selected(&self) -> Result<BatchReport, CoreError> {
        let ids = self.selected();
        let report = batch::execute(self.inner.source.as_ref(), BatchAction::Delete, &ids).await?;

        self.selection().remove(&report.succeeded);
        let summary = report.summary(Self::KIND);
        if report.is_complete_success() {
            info!(
                resource = Self::KIND,
                count = report.succeeded.len(),
                "batch delete complete"
            );
            self.inner.notifier.success(summary);
        } else if report.succeeded.is_empty() {
            self.inner.notifier.error(summary);
        } else {
            self.inner.notifier.warning(summary);
        }

        tokio::join!(self.refetch(), self.refresh_stats());
        Ok(report)
    }

    // ── Statistics ───────────────────────────────────────────────────

    pub async fn refresh_stats(&self) -> StatsOutcome {
        self.inner.stats.refresh().await
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn state(&self) -> FetchState<S::Item> {
        self.inner.fetch.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<S::Item>> {
        self.inner.fetch.subscribe()
    }

    pub fn stats(&self) -> StatsSummary {
        self.inner.stats.summary()
    }

    /// The query the next fetch would send.
    pub fn query(&self) -> ListQuery {
        self.query_state().query()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    fn query_state(&self) -> MutexGuard<'_, QueryState> {
        self.inner.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn selection(&self) -> MutexGuard<'_, Selection> {
        self.inner
            .selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Resource fetch cycle ──
//
// One list request at a time is "current". Each run takes a fresh request
// id; a result is applied only if its id is still the latest and the cycle
// has not been torn down. Failures keep the previous page on screen.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{EntityId, ListQuery, Pagination};
use crate::notify::Notifier;

use super::{Resource, ResourceSource};

/// Observable list state of one screen.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    pub items: Arc<Vec<T>>,
    pub pagination: Pagination,
    pub loading: bool,
    /// Message of the last failed fetch; cleared on the next success.
    pub error: Option<String>,
    /// Query whose result is currently shown.
    pub query: Option<ListQuery>,
}

impl<T> FetchState<T> {
    fn initial(per_page: u32) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            pagination: Pagination::empty(per_page),
            loading: false,
            error: None,
            query: None,
        }
    }
}

/// What happened to one fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Result applied; the ids now on screen.
    Applied { ids: Vec<EntityId> },
    /// Request failed; previous state kept.
    Failed(CoreError),
    /// A newer request was issued meanwhile; result discarded.
    Stale,
    /// Torn down before the result arrived.
    Cancelled,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

pub struct FetchCycle<T: Resource> {
    state: watch::Sender<FetchState<T>>,
    latest: AtomicU64,
    cancel: CancellationToken,
    notifier: Notifier,
}

impl<T: Resource> FetchCycle<T> {
    pub fn new(per_page: u32, cancel: CancellationToken, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(FetchState::initial(per_page));
        Self {
            state,
            latest: AtomicU64::new(0),
            cancel,
            notifier,
        }
    }

    pub fn snapshot(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Issue `query` as the new current request and apply its result if it
    /// is still current when it arrives.
    pub async fn run<S>(&self, source: &S, query: ListQuery) -> FetchOutcome
    where
        S: ResourceSource<Item = T> + ?Sized,
    {
        self.run_applying(source, query, |_| ()).await
    }

    /// Like [`run`](Self::run), calling `on_apply` with the new page's ids
    /// while the state lock is still held. Observers never see the new page
    /// paired with state derived from the old one.
    pub async fn run_applying<S, F>(
        &self,
        source: &S,
        query: ListQuery,
        on_apply: F,
    ) -> FetchOutcome
    where
        S: ResourceSource<Item = T> + ?Sized,
        F: FnOnce(&[EntityId]),
    {
        if self.cancel.is_cancelled() {
            return FetchOutcome::Cancelled;
        }
        let request_id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        self.state.send_modify(|s| s.loading = true);
        debug!(resource = T::KIND, request_id, page = query.page(), "fetching page");

        let result = tokio::select! {
            () = self.cancel.cancelled() => return FetchOutcome::Cancelled,
            result = source.list(&query) => result,
        };

        match result {
            Ok(page) => {
                let ids = page.ids();
                let (items, pagination) = page.into_parts();
                let applied = self.state.send_if_modified(|s| {
                    if !self.is_current(request_id) {
                        return false;
                    }
                    s.items = Arc::new(items);
                    s.pagination = pagination;
                    s.loading = false;
                    s.error = None;
                    s.query = Some(query);
                    on_apply(&ids);
                    true
                });
                if applied {
                    FetchOutcome::Applied { ids }
                } else {
                    self.discarded(request_id)
                }
            }
            Err(e) => {
                let message = e.to_string();
                let applied = self.state.send_if_modified(|s| {
                    if !self.is_current(request_id) {
                        return false;
                    }
                    s.loading = false;
                    s.error = Some(message.clone());
                    true
                });
                if !applied {
                    return self.discarded(request_id);
                }
                warn!(resource = T::KIND, request_id, error = %e, "fetch failed");
                self.notifier
                    .error(format!("Failed to load {}: {message}", T::KIND));
                FetchOutcome::Failed(e)
            }
        }
    }

    fn is_current(&self, request_id: u64) -> bool {
        !self.cancel.is_cancelled() && self.latest.load(Ordering::Acquire) == request_id
    }

    fn discarded(&self, request_id: u64) -> FetchOutcome {
        if self.cancel.is_cancelled() {
            return FetchOutcome::Cancelled;
        }
        debug!(resource = T::KIND, request_id, "discarding stale response");
        FetchOutcome::Stale
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;
    use crate::model::Criteria;
    use crate::notify::{NotificationLevel, drain};
    use crate::resource::mock::{MockSource, items};

    fn cycle() -> FetchCycle<crate::resource::mock::Item> {
        FetchCycle::new(10, CancellationToken::new(), Notifier::new())
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_of_superseded_request_is_discarded() {
        let source =
            MockSource::new(items(25)).with_page_delay(1, Duration::from_millis(500));
        let cycle = cycle();

        let (a, b) = tokio::join!(
            cycle.run(&source, ListQuery::new(1, 10, Criteria::default())),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                cycle.run(&source, ListQuery::new(2, 10, Criteria::default())).await
            }
        );

        assert!(matches!(a, FetchOutcome::Stale));
        assert!(b.is_applied());
        let state = cycle.snapshot();
        assert_eq!(state.pagination.current_page(), 2);
        assert_eq!(state.items[0].id, EntityId::Numeric(11));
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn apply_hook_sees_only_the_current_page() {
        let source =
            MockSource::new(items(25)).with_page_delay(1, Duration::from_millis(500));
        let cycle = cycle();
        let seen = std::sync::Mutex::new(Vec::new());

        let (a, b) = tokio::join!(
            cycle.run_applying(&source, ListQuery::new(1, 10, Criteria::default()), |ids| {
                seen.lock().unwrap().push(ids.to_vec());
            }),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                cycle
                    .run_applying(&source, ListQuery::new(2, 10, Criteria::default()), |ids| {
                        seen.lock().unwrap().push(ids.to_vec());
                    })
                    .await
            }
        );

        assert!(matches!(a, FetchOutcome::Stale));
        assert!(b.is_applied());
        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0], EntityId::Numeric(11));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_previous_items() {
        let mut source = MockSource::new(items(5));
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        let cycle = FetchCycle::new(10, CancellationToken::new(), notifier);

        cycle.run(&source, ListQuery::new(1, 10, Criteria::default())).await;
        source.fail_list = true;
        let outcome = cycle
            .run(&source, ListQuery::new(2, 10, Criteria::default()))
            .await;

        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        let state = cycle.snapshot();
        assert_eq!(state.items.len(), 5);
        assert_eq!(state.pagination.current_page(), 1);
        assert!(state.error.is_some());
        let notes = drain(&mut rx);
        assert_eq!(notes.last().unwrap().level, NotificationLevel::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_applied_after_teardown() {
        let source = MockSource::new(items(5)).with_page_delay(1, Duration::from_millis(200));
        let cancel = CancellationToken::new();
        let cycle: FetchCycle<crate::resource::mock::Item> =
            FetchCycle::new(10, cancel.clone(), Notifier::new());

        let (outcome, ()) = tokio::join!(
            cycle.run(&source, ListQuery::new(1, 10, Criteria::default())),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                cancel.cancel();
            }
        );

        assert!(matches!(outcome, FetchOutcome::Cancelled));
        assert!(cycle.snapshot().items.is_empty());
    }

    #[tokio::test]
    async fn empty_result_is_a_single_page() {
        let source = MockSource::new(Vec::new());
        let cycle = cycle();

        cycle.run(&source, ListQuery::new(1, 10, Criteria::default())).await;
        let state = cycle.snapshot();
        assert!(state.items.is_empty());
        assert_eq!(state.pagination.last_page(), 1);
    }
}

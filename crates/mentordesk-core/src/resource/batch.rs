// ── Batch mutation executor ──
//
// Best-effort: with a bulk endpoint the whole batch succeeds or fails
// together; otherwise every id is attempted concurrently and failures are
// reported per id without stopping the rest.

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::EntityId;

use super::{Resource, ResourceSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    Delete,
}

/// Per-id result of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<EntityId>,
    pub failed: Vec<(EntityId, String)>,
}

impl BatchReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line aggregate for a notification.
    pub fn summary(&self, kind: &str) -> String {
        match (self.succeeded.len(), self.failed.len()) {
            (ok, 0) => format!("Deleted {ok} {kind}"),
            (0, failed) => format!("Failed to delete {failed} {kind}"),
            (ok, failed) => format!("Deleted {ok} {kind}, {failed} failed"),
        }
    }
}

/// Apply `action` to `ids`. An empty id list is rejected before any request.
pub async fn execute<S>(
    source: &S,
    action: BatchAction,
    ids: &[EntityId],
) -> Result<BatchReport, CoreError>
where
    S: ResourceSource + ?Sized,
{
    if ids.is_empty() {
        return Err(CoreError::EmptySelection);
    }
    let kind = <S::Item as Resource>::KIND;
    debug!(resource = kind, ?action, count = ids.len(), "executing batch");

    match action {
        BatchAction::Delete if source.supports_bulk_delete() => {
            Ok(match source.bulk_delete(ids).await {
                Ok(()) => BatchReport {
                    succeeded: ids.to_vec(),
                    failed: Vec::new(),
                },
                Err(e) => {
                    warn!(resource = kind, error = %e, "bulk delete failed");
                    let reason = e.to_string();
                    BatchReport {
                        succeeded: Vec::new(),
                        failed: ids.iter().map(|id| (id.clone(), reason.clone())).collect(),
                    }
                }
            })
        }
        BatchAction::Delete => {
            let results = join_all(ids.iter().map(|id| source.delete(id))).await;
            let mut report = BatchReport::default();
            for (id, result) in ids.iter().zip(results) {
                match result {
                    Ok(()) => report.succeeded.push(id.clone()),
                    Err(e) => {
                        warn!(resource = kind, %id, error = %e, "delete failed");
                        report.failed.push((id.clone(), e.to_string()));
                    }
                }
            }
            Ok(report)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::resource::mock::{MockSource, items};

    fn ids(raw: &[u64]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId::from).collect()
    }

    #[tokio::test]
    async fn empty_selection_makes_no_request() {
        let source = MockSource::new(items(3));
        let err = execute(&source, BatchAction::Delete, &[]).await.unwrap_err();
        assert!(matches!(err, CoreError::EmptySelection));
        assert_eq!(source.remaining(), 3);
    }

    #[tokio::test]
    async fn per_id_deletes_report_partial_failure() {
        let mut source = MockSource::new(items(4));
        source.fail_delete.insert(EntityId::from(2));

        let report = execute(&source, BatchAction::Delete, &ids(&[1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(report.succeeded, ids(&[1, 3]));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, EntityId::from(2));
        assert_eq!(report.summary("items"), "Deleted 2 items, 1 failed");
        assert_eq!(source.remaining(), 2);
    }

    #[tokio::test]
    async fn bulk_delete_is_all_or_nothing() {
        let mut source = MockSource::new(items(4));
        source.bulk = true;
        source.fail_delete.insert(EntityId::from(2));

        let report = execute(&source, BatchAction::Delete, &ids(&[1, 2]))
            .await
            .unwrap();

        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert_eq!(source.remaining(), 4);
    }
}

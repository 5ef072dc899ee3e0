// Mentee endpoints
//
// The mentee resource is the only one with a batch delete endpoint; the
// others are deleted one id at a time.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{BulkDeleteRequest, MenteeResponse, PageResponse, StatsResponse};

impl ApiClient {
    /// List one page of mentees.
    ///
    /// `GET /api/mentees?page=&per_page=&gender=&status=&search=`
    pub async fn list_mentees(
        &self,
        params: &[(String, String)],
    ) -> Result<PageResponse<MenteeResponse>, Error> {
        self.get_with_params("mentees", params).await
    }

    /// Precomputed mentee counts.
    ///
    /// `GET /api/mentees/stats`
    pub async fn mentee_stats(&self) -> Result<StatsResponse, Error> {
        self.get("mentees/stats").await
    }

    /// `DELETE /api/mentees/{id}`
    pub async fn delete_mentee(&self, id: u64) -> Result<(), Error> {
        debug!(id, "deleting mentee");
        self.delete(&format!("mentees/{id}")).await
    }

    /// Delete several mentees in one call.
    ///
    /// `POST /api/mentees/bulk-delete` with `{"ids": [...]}`
    pub async fn bulk_delete_mentees(&self, ids: &[u64]) -> Result<(), Error> {
        debug!(count = ids.len(), "bulk deleting mentees");
        self.post_no_response("mentees/bulk-delete", &BulkDeleteRequest { ids })
            .await
    }
}

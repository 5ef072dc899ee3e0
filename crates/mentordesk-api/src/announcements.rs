// Announcement endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{AnnouncementResponse, PageResponse, StatsResponse};

impl ApiClient {
    /// List one page of announcements.
    ///
    /// `GET /api/announcements?page=&per_page=&category=&status=&search=`
    pub async fn list_announcements(
        &self,
        params: &[(String, String)],
    ) -> Result<PageResponse<AnnouncementResponse>, Error> {
        self.get_with_params("announcements", params).await
    }

    /// `GET /api/announcements/stats`
    pub async fn announcement_stats(&self) -> Result<StatsResponse, Error> {
        self.get("announcements/stats").await
    }

    /// `DELETE /api/announcements/{id}`
    pub async fn delete_announcement(&self, id: u64) -> Result<(), Error> {
        debug!(id, "deleting announcement");
        self.delete(&format!("announcements/{id}")).await
    }
}

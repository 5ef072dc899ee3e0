// ── HTTP-backed resource sources ──

use std::sync::Arc;

use async_trait::async_trait;

use mentordesk_api::ApiClient;

use crate::convert::envelope_from;
use crate::error::CoreError;
use crate::model::{
    Announcement, EntityId, ListQuery, Mentee, PageEnvelope, StatsSummary,
};

use super::{Resource, ResourceSource};

/// The REST API keys rows by integer; string keys cannot be addressed.
fn require_numeric<T: Resource>(id: &EntityId) -> Result<u64, CoreError> {
    id.as_numeric().ok_or_else(|| CoreError::NotFound {
        entity_type: T::KIND.to_owned(),
        identifier: id.to_string(),
    })
}

// ── Mentees ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MenteeSource {
    client: Arc<ApiClient>,
}

impl MenteeSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSource for MenteeSource {
    type Item = Mentee;

    async fn list(&self, query: &ListQuery) -> Result<PageEnvelope<Mentee>, CoreError> {
        let page = self.client.list_mentees(&query.to_params()).await?;
        Ok(envelope_from(page))
    }

    async fn stats(&self) -> Result<StatsSummary, CoreError> {
        Ok(self.client.mentee_stats().await?.into())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let id = require_numeric::<Mentee>(id)?;
        Ok(self.client.delete_mentee(id).await?)
    }

    fn supports_bulk_delete(&self) -> bool {
        true
    }

    async fn bulk_delete(&self, ids: &[EntityId]) -> Result<(), CoreError> {
        let ids = ids
            .iter()
            .map(require_numeric::<Mentee>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.client.bulk_delete_mentees(&ids).await?)
    }
}

// ── Announcements ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AnnouncementSource {
    client: Arc<ApiClient>,
}

impl AnnouncementSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSource for AnnouncementSource {
    type Item = Announcement;

    async fn list(&self, query: &ListQuery) -> Result<PageEnvelope<Announcement>, CoreError> {
        let page = self.client.list_announcements(&query.to_params()).await?;
        Ok(envelope_from(page))
    }

    async fn stats(&self) -> Result<StatsSummary, CoreError> {
        Ok(self.client.announcement_stats().await?.into())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let id = require_numeric::<Announcement>(id)?;
        Ok(self.client.delete_announcement(id).await?)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, StatsSpec};
use crate::resource::Resource;

/// A program-wide announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: EntityId,
    pub title: String,
    pub body: Option<String>,
    /// `general`, `event` or `urgent`.
    pub category: Option<String>,
    /// `draft` or `published`.
    pub status: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Resource for Announcement {
    const KIND: &'static str = "announcements";
    const FILTERS: &'static [&'static str] = &["category", "status"];
    const STATS: StatsSpec = StatsSpec {
        category_field: "category",
        categories: &["general", "event", "urgent"],
        status_field: "status",
        active_value: "published",
    };

    fn id(&self) -> &EntityId {
        &self.id
    }
}

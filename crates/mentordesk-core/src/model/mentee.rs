use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, StatsSpec};
use crate::resource::Resource;

/// A mentee enrolled in the program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mentee {
    pub id: EntityId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// `male` or `female`.
    pub gender: Option<String>,
    /// `active`, `inactive` or `graduated`.
    pub status: Option<String>,
    pub mentor_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Resource for Mentee {
    const KIND: &'static str = "mentees";
    const FILTERS: &'static [&'static str] = &["gender", "status", "mentor_id"];
    const STATS: StatsSpec = StatsSpec {
        category_field: "gender",
        categories: &["male", "female"],
        status_field: "status",
        active_value: "active",
    };

    fn id(&self) -> &EntityId {
        &self.id
    }
}

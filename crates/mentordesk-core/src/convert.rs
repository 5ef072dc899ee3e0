// ── API-to-domain type conversions ──
//
// Bridges raw `mentordesk_api` response types into canonical
// `mentordesk_core::model` domain types. Each `From` impl normalizes field
// names, parses timestamps, and drops blank optional strings.

use chrono::{DateTime, NaiveDateTime, Utc};

use mentordesk_api::types::{
    AnnouncementResponse, CategoryCountResponse, MenteeResponse, PageResponse,
    PaginationResponse, StatsResponse,
};

use crate::model::{
    Announcement, CategoryCount, EntityId, Mentee, PageEnvelope, Pagination, StatsSummary,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an API timestamp: RFC 3339, or `YYYY-MM-DD HH:MM:SS` taken as UTC.
fn parse_datetime(raw: Option<&String>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Pagination ─────────────────────────────────────────────────────

impl From<PaginationResponse> for Pagination {
    fn from(p: PaginationResponse) -> Self {
        Pagination::new(p.current_page, p.last_page, p.per_page, p.total)
    }
}

/// Convert a wire page into a domain envelope, enforcing its invariants.
pub fn envelope_from<W, T: From<W>>(page: PageResponse<W>) -> PageEnvelope<T> {
    PageEnvelope::new(
        page.data.into_iter().map(T::from).collect(),
        page.pagination.into(),
    )
}

// ── Mentees ────────────────────────────────────────────────────────

impl From<MenteeResponse> for Mentee {
    fn from(m: MenteeResponse) -> Self {
        let created_at = parse_datetime(m.created_at.as_ref());
        Mentee {
            id: EntityId::Numeric(m.id),
            name: m.name,
            email: non_blank(m.email),
            phone: non_blank(m.phone),
            gender: non_blank(m.gender),
            status: non_blank(m.status),
            mentor_name: m.mentor.map(|mentor| mentor.name),
            created_at,
        }
    }
}

// ── Announcements ──────────────────────────────────────────────────

impl From<AnnouncementResponse> for Announcement {
    fn from(a: AnnouncementResponse) -> Self {
        let published_at = parse_datetime(a.published_at.as_ref());
        Announcement {
            id: EntityId::Numeric(a.id),
            title: a.title,
            body: non_blank(a.content),
            category: non_blank(a.category),
            status: non_blank(a.status),
            published_at,
        }
    }
}

// ── Statistics ─────────────────────────────────────────────────────

impl From<CategoryCountResponse> for CategoryCount {
    fn from(c: CategoryCountResponse) -> Self {
        CategoryCount {
            total: c.total,
            active: c.active,
        }
    }
}

/// Raw summary; callers conform it to the resource's `StatsSpec`.
impl From<StatsResponse> for StatsSummary {
    fn from(s: StatsResponse) -> Self {
        StatsSummary {
            total: s.total,
            active: s.active,
            by_category: s
                .by_category
                .into_iter()
                .map(|(k, v)| (k, v.into()))
                .collect(),
        }
    }
}

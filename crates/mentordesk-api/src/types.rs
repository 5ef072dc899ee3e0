//! Wire types for the program's REST API.
//!
//! All list endpoints share the `{ data, pagination }` envelope. Field names
//! are snake_case on the wire, matching the Rust field names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// Envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResponse {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

// ── Mentees ──────────────────────────────────────────────────────────

/// Mentee row, from `GET /api/mentees`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenteeResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// `male` or `female`.
    #[serde(default)]
    pub gender: Option<String>,
    /// `active`, `inactive` or `graduated`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub mentor: Option<MentorRef>,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorRef {
    pub id: u64,
    pub name: String,
}

// ── Announcements ────────────────────────────────────────────────────

/// Announcement row, from `GET /api/announcements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementResponse {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    /// `general`, `event` or `urgent`.
    #[serde(default)]
    pub category: Option<String>,
    /// `draft` or `published`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

// ── Statistics ───────────────────────────────────────────────────────

/// Precomputed summary, from `GET /api/{resource}/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total: u64,
    pub active: u64,
    #[serde(default)]
    pub by_category: HashMap<String, CategoryCountResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCountResponse {
    pub total: u64,
    pub active: u64,
}

// ── Mutations ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteRequest<'a> {
    pub ids: &'a [u64],
}

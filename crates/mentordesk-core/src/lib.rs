//! Session guard and paginated resource controllers for the mentoring
//! program's admin console.
//!
//! Two concerns live here, everything else is rendering:
//!
//! - **Session** ([`session`]): [`AuthResolver`] derives a validated
//!   [`AuthState`] from the persisted [`SessionStore`] exactly once per load;
//!   [`RouteGuard`] turns that state plus a route's allow-list into a
//!   [`GuardDecision`] (`Loading`, `Authorized` or a `Redirect` instruction).
//!
//! - **Resources** ([`resource`]): [`ResourceController`] is the list-screen
//!   engine shared by mentees and announcements: [`QueryState`] with
//!   debounced search, a last-request-wins [`FetchCycle`], a page-scoped
//!   [`Selection`], best-effort batch deletes, and a [`StatsAggregator`] that
//!   falls back to derived counts when the summary endpoint is unavailable.
//!
//! User-visible outcomes are published through a [`Notifier`]; no controller
//! operation panics or leaks a transport error to the rendering layer.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod notify;
pub mod resource;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::AdminConfig;
pub use error::CoreError;
pub use notify::{Notification, NotificationLevel, Notifier};
pub use resource::batch::{BatchAction, BatchReport};
pub use resource::controller::{ListSettings, ResourceController};
pub use resource::fetch::{FetchCycle, FetchOutcome, FetchState};
pub use resource::query_state::QueryState;
pub use resource::selection::Selection;
pub use resource::sources::{AnnouncementSource, MenteeSource};
pub use resource::stats::{
    DerivedStats, DirectStats, StatsAggregator, StatsOrigin, StatsOutcome, StatsStrategy,
};
pub use resource::{Resource, ResourceSource};
pub use session::guard::{
    GuardDecision, LandingRoutes, ProtectedRoute, Redirect, RedirectReason, RouteGuard,
};
pub use session::resolver::AuthResolver;
pub use session::store::{FileSessionStore, MemorySessionStore, SessionStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Announcement, AuthState, CategoryCount, Criteria, EntityId, ListQuery, Mentee, PageEnvelope,
    Pagination, Role, StatsSpec, StatsSummary, User,
};

// ── Domain model ──

pub mod announcement;
pub mod entity_id;
pub mod mentee;
pub mod page;
pub mod query;
pub mod role;
pub mod session;
pub mod stats;

pub use announcement::Announcement;
pub use entity_id::EntityId;
pub use mentee::Mentee;
pub use page::{PageEnvelope, Pagination};
pub use query::{Criteria, ListQuery};
pub use role::Role;
pub use session::{AuthState, User};
pub use stats::{CategoryCount, StatsSpec, StatsSummary};

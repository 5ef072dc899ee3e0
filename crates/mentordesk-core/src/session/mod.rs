// ── Session layer ──
//
// Persisted session → validated `AuthState` → per-route guard decision.

pub mod guard;
pub mod resolver;
pub mod store;

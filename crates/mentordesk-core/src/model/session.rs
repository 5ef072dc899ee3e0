// ── Session-derived state ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EntityId, Role};

/// A signed-in console user with a validated role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub role: Role,
    /// Remaining profile fields from the login response (name, email, ...).
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    pub fn name(&self) -> Option<&str> {
        self.profile.get("name").and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.profile.get("email").and_then(Value::as_str)
    }
}

/// Snapshot of the authentication state for one application load.
///
/// Produced by [`AuthResolver`](crate::AuthResolver); consumers hold it by
/// value or observe it through a watch channel, never re-derive it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthState {
    pub role: Option<Role>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub user: Option<User>,
}

impl AuthState {
    /// State while the store is being read and the settle delay runs.
    pub fn loading() -> Self {
        Self {
            role: None,
            is_authenticated: false,
            loading: true,
            user: None,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            role: None,
            is_authenticated: false,
            loading: false,
            user: None,
        }
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            role: Some(user.role),
            is_authenticated: true,
            loading: false,
            user: Some(user),
        }
    }
}

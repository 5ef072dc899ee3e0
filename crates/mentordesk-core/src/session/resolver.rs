// ── Auth session resolver ──
//
// Derives the validated `AuthState` from the persisted store exactly once
// per application load. Concurrent callers share the single resolution;
// later callers get the memoized state. Errors never escape: anything that
// is not a well-formed session with a known role is cleared and treated as
// signed out.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

use mentordesk_api::BearerToken;

use crate::error::CoreError;
use crate::model::{AuthState, EntityId, Role, User};

use super::store::{SessionStore, TOKEN_KEY, USER_KEY};

/// User record as persisted; the role is still an unchecked string.
#[derive(Debug, Deserialize)]
struct StoredUser {
    id: EntityId,
    role: String,
    #[serde(flatten)]
    profile: Map<String, Value>,
}

/// What the store holds, before the settle delay.
enum Classified {
    SignedOut,
    Valid { token: BearerToken, user: User },
    Invalid { reason: String },
}

/// Handle to the session for one application load.
///
/// Cheaply cloneable; all clones share the same resolution.
#[derive(Clone)]
pub struct AuthResolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    store: Arc<dyn SessionStore>,
    settle_delay: Duration,
    state: watch::Sender<AuthState>,
    init: OnceCell<()>,
    token: RwLock<Option<BearerToken>>,
    /// Bumped by `logout`, under the token lock; a resolution started in an
    /// older generation publishes nothing.
    generation: AtomicU64,
}

impl AuthResolver {
    pub fn new(store: Arc<dyn SessionStore>, settle_delay: Duration) -> Self {
        let (state, _) = watch::channel(AuthState::loading());
        Self {
            inner: Arc::new(ResolverInner {
                store,
                settle_delay,
                state,
                init: OnceCell::new(),
                token: RwLock::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Resolve the session (first call only) and return the state.
    pub async fn resolve(&self) -> AuthState {
        self.inner
            .init
            .get_or_init(|| async {
                let generation = self.inner.generation.load(Ordering::Acquire);
                let classified = classify(self.inner.store.as_ref());
                tokio::time::sleep(self.inner.settle_delay).await;
                self.publish(generation, classified);
            })
            .await;
        self.current()
    }

    /// Latest published state; `loading` until the first resolution finishes.
    pub fn current(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Observe `loading → resolved` transitions and later logouts.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    /// Bearer token of the resolved session, if authenticated.
    pub fn token(&self) -> Option<BearerToken> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear the persisted session and publish a signed-out state.
    ///
    /// A store failure is reported but the in-memory state is signed out
    /// regardless.
    pub fn logout(&self) -> Result<(), CoreError> {
        {
            let mut token = self
                .inner
                .token
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            self.inner.generation.fetch_add(1, Ordering::AcqRel);
            *token = None;
        }
        let cleared = self.inner.store.clear_session();
        // Mark the load resolved so a later `resolve()` does not re-read.
        let _ = self.inner.init.set(());
        self.inner.state.send_replace(AuthState::unauthenticated());
        info!("session cleared");
        cleared
    }

    fn publish(&self, generation: u64, classified: Classified) {
        let mut current_token = self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if self.inner.generation.load(Ordering::Acquire) != generation {
            debug!("logged out during resolution; discarding resolved session");
            return;
        }
        let state = match classified {
            Classified::SignedOut => AuthState::unauthenticated(),
            Classified::Valid { token, user } => {
                debug!(role = %user.role, user_id = %user.id, "session resolved");
                *current_token = Some(token);
                AuthState::authenticated(user)
            }
            Classified::Invalid { reason } => {
                warn!(%reason, "invalid session; clearing");
                if let Err(e) = self.inner.store.clear_session() {
                    warn!(error = %e, "failed to clear invalid session");
                }
                AuthState::unauthenticated()
            }
        };
        self.inner.state.send_replace(state);
        drop(current_token);
    }
}

fn classify(store: &dyn SessionStore) -> Classified {
    let token = match store.get(TOKEN_KEY) {
        Ok(Some(token)) if !token.trim().is_empty() => token,
        Ok(_) => {
            // A user record without a token is leftover state.
            if matches!(store.get(USER_KEY), Ok(Some(_))) {
                if let Err(e) = store.remove(USER_KEY) {
                    warn!(error = %e, "failed to remove orphaned user record");
                }
            }
            return Classified::SignedOut;
        }
        Err(e) => {
            return Classified::Invalid {
                reason: e.to_string(),
            };
        }
    };

    let raw_user = match store.get(USER_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            return Classified::Invalid {
                reason: "token without user record".into(),
            };
        }
        Err(e) => {
            return Classified::Invalid {
                reason: e.to_string(),
            };
        }
    };

    let stored: StoredUser = match serde_json::from_str(&raw_user) {
        Ok(stored) => stored,
        Err(e) => {
            return Classified::Invalid {
                reason: format!("malformed user record: {e}"),
            };
        }
    };

    let Ok(role) = Role::from_str(&stored.role) else {
        return Classified::Invalid {
            reason: format!("unknown role '{}'", stored.role),
        };
    };

    Classified::Valid {
        token: BearerToken::new(token.trim()),
        user: User {
            id: stored.id,
            role,
            profile: stored.profile,
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::session::store::{FileSessionStore, MemorySessionStore};

    const SETTLE: Duration = Duration::from_millis(100);

    fn resolver(entries: &[(&str, &str)]) -> (AuthResolver, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::with_entries(entries.iter().copied()));
        (AuthResolver::new(store.clone(), SETTLE), store)
    }

    #[tokio::test(start_paused = true)]
    async fn valid_session_is_authenticated() {
        let (resolver, _) = resolver(&[
            (TOKEN_KEY, "tok"),
            (USER_KEY, r#"{"id":4,"role":"mentor","name":"Ada"}"#),
        ]);

        let state = resolver.resolve().await;
        assert!(state.is_authenticated);
        assert!(!state.loading);
        assert_eq!(state.role, Some(Role::Mentor));
        assert_eq!(state.user.unwrap().name(), Some("Ada"));
        assert_eq!(resolver.token().unwrap().expose(), "tok");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_role_clears_the_store() {
        let (resolver, store) = resolver(&[
            (TOKEN_KEY, "tok"),
            (USER_KEY, r#"{"id":4,"role":"editor"}"#),
        ]);

        let state = resolver.resolve().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.role, None);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USER_KEY).unwrap(), None);
        assert!(resolver.token().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_user_is_treated_as_invalid() {
        let (resolver, store) = resolver(&[(TOKEN_KEY, "tok"), (USER_KEY, "{not json")]);

        assert!(!resolver.resolve().await.is_authenticated);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn no_token_is_signed_out_and_drops_orphaned_user() {
        let (resolver, store) = resolver(&[(USER_KEY, r#"{"id":1,"role":"admin"}"#)]);

        let state = resolver.resolve().await;
        assert_eq!(state, AuthState::unauthenticated());
        assert_eq!(store.get(USER_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_only_during_settle_delay() {
        let (resolver, _) = resolver(&[
            (TOKEN_KEY, "tok"),
            (USER_KEY, r#"{"id":1,"role":"admin"}"#),
        ]);
        let mut rx = resolver.subscribe();
        assert!(rx.borrow().loading);

        let task = tokio::spawn({
            let resolver = resolver.clone();
            async move { resolver.resolve().await }
        });
        tokio::time::sleep(SETTLE / 2).await;
        assert!(resolver.current().loading);

        rx.changed().await.unwrap();
        assert!(!rx.borrow().loading);
        assert!(task.await.unwrap().is_authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn resolution_happens_once() {
        let (resolver, store) = resolver(&[
            (TOKEN_KEY, "tok"),
            (USER_KEY, r#"{"id":1,"role":"admin"}"#),
        ]);

        let (a, b) = tokio::join!(resolver.resolve(), resolver.resolve());
        assert_eq!(a, b);

        // Store changes after resolution are not observed in this load.
        store.clear_session().unwrap();
        assert!(resolver.resolve().await.is_authenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_store_is_treated_as_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let store = Arc::new(FileSessionStore::new(&path));
        let resolver = AuthResolver::new(store.clone(), SETTLE);

        let state = resolver.resolve().await;
        assert_eq!(state, AuthState::unauthenticated());
        assert!(resolver.token().is_none());

        // The corrupt file was replaced by an empty session.
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        let left: Map<String, Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(left.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_during_settle_delay_wins() {
        let (resolver, store) = resolver(&[
            (TOKEN_KEY, "tok"),
            (USER_KEY, r#"{"id":1,"role":"admin"}"#),
        ]);

        let pending = tokio::spawn({
            let resolver = resolver.clone();
            async move { resolver.resolve().await }
        });
        tokio::time::sleep(SETTLE / 2).await;
        resolver.logout().unwrap();

        let state = pending.await.unwrap();
        assert_eq!(state, AuthState::unauthenticated());
        assert_eq!(resolver.current(), AuthState::unauthenticated());
        assert!(resolver.token().is_none());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn logout_clears_and_publishes() {
        let (resolver, store) = resolver(&[
            (TOKEN_KEY, "tok"),
            (USER_KEY, r#"{"id":1,"role":"admin"}"#),
        ]);
        resolver.resolve().await;

        resolver.logout().unwrap();
        assert_eq!(resolver.current(), AuthState::unauthenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert!(resolver.token().is_none());
    }
}

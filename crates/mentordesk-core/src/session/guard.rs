// ── Route authorization guard ──
//
// `decide` is the pure decision; `RouteGuard` adds the side effects that go
// with enforcing it (one access-denied notice per denial, the one-shot login
// notice, clearing a session whose role has nowhere to land).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AdminConfig;
use crate::model::{AuthState, Role};
use crate::notify::Notifier;

use super::resolver::AuthResolver;
use super::store::LOGIN_SUCCESS_KEY;

/// A view and the roles allowed to see it (empty = any signed-in role).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub path: String,
    pub allowed_roles: Vec<Role>,
}

impl ProtectedRoute {
    pub fn new(path: impl Into<String>, allowed_roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            path: path.into(),
            allowed_roles: allowed_roles.into_iter().collect(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.contains(&role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    Unauthenticated,
    Forbidden,
    UnmappedRole,
}

/// Navigation instruction; the caller performs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub target: String,
    /// Originally requested location, for returning after login.
    pub return_to: Option<String>,
    pub reason: RedirectReason,
    /// The session must be cleared before navigating.
    pub clear_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session still resolving: render nothing, do not navigate.
    Loading,
    Authorized,
    Redirect(Redirect),
}

/// Login path plus the role → landing route map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingRoutes {
    pub login: String,
    pub by_role: HashMap<Role, String>,
}

impl LandingRoutes {
    pub fn new(login: impl Into<String>, by_role: HashMap<Role, String>) -> Self {
        Self {
            login: login.into(),
            by_role,
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.login_path.clone(), config.landing_routes.clone())
    }

    pub fn landing(&self, role: Role) -> Option<&str> {
        self.by_role.get(&role).map(String::as_str)
    }
}

/// Pure guard decision for one navigation.
pub fn decide(
    state: &AuthState,
    route: &ProtectedRoute,
    location: &str,
    routes: &LandingRoutes,
) -> GuardDecision {
    if state.loading {
        return GuardDecision::Loading;
    }

    let role = match state.role {
        Some(role) if state.is_authenticated => role,
        _ => {
            return GuardDecision::Redirect(Redirect {
                target: routes.login.clone(),
                return_to: Some(location.to_owned()),
                reason: RedirectReason::Unauthenticated,
                clear_session: false,
            });
        }
    };

    if route.allows(role) {
        return GuardDecision::Authorized;
    }

    match routes.landing(role) {
        Some(landing) => GuardDecision::Redirect(Redirect {
            target: landing.to_owned(),
            return_to: None,
            reason: RedirectReason::Forbidden,
            clear_session: false,
        }),
        None => GuardDecision::Redirect(Redirect {
            target: routes.login.clone(),
            return_to: None,
            reason: RedirectReason::UnmappedRole,
            clear_session: true,
        }),
    }
}

/// Stateful guard for one console session.
#[derive(Debug)]
pub struct RouteGuard {
    routes: LandingRoutes,
    notifier: Notifier,
    denied_shown: AtomicBool,
}

impl RouteGuard {
    pub fn new(routes: LandingRoutes, notifier: Notifier) -> Self {
        Self {
            routes,
            notifier,
            denied_shown: AtomicBool::new(false),
        }
    }

    pub fn routes(&self) -> &LandingRoutes {
        &self.routes
    }

    /// Decision for the given state, without side effects.
    pub fn evaluate(&self, state: &AuthState, route: &ProtectedRoute, location: &str) -> GuardDecision {
        decide(state, route, location, &self.routes)
    }

    /// Resolve the session, decide, and apply the decision's side effects.
    pub async fn enforce(
        &self,
        resolver: &AuthResolver,
        route: &ProtectedRoute,
        location: &str,
    ) -> GuardDecision {
        let state = resolver.resolve().await;
        let decision = self.evaluate(&state, route, location);

        match &decision {
            GuardDecision::Loading => {}
            GuardDecision::Authorized => {
                self.denied_shown.store(false, Ordering::Release);
                self.announce_login(resolver);
            }
            GuardDecision::Redirect(redirect) => {
                debug!(
                    route = %route.path,
                    target = %redirect.target,
                    reason = ?redirect.reason,
                    "navigation redirected"
                );
                if redirect.clear_session {
                    if let Err(e) = resolver.logout() {
                        warn!(error = %e, "failed to clear session for unmapped role");
                    }
                }
                if redirect.reason != RedirectReason::Unauthenticated
                    && !self.denied_shown.swap(true, Ordering::AcqRel)
                {
                    self.notifier
                        .error(format!("Access denied: you cannot view {}", route.path));
                }
            }
        }
        decision
    }

    fn announce_login(&self, resolver: &AuthResolver) {
        match resolver.store().take(LOGIN_SUCCESS_KEY) {
            Ok(Some(_)) => {
                let who = resolver
                    .current()
                    .role
                    .map_or("user", Role::label);
                self.notifier.success(format!("Signed in as {who}"));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read login flag"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::Map;

    use super::*;
    use crate::config::{DEFAULT_LOGIN_PATH, default_landing_routes};
    use crate::model::{EntityId, User};
    use crate::notify::{NotificationLevel, drain};
    use crate::session::store::{MemorySessionStore, SessionStore, TOKEN_KEY, USER_KEY};

    fn routes() -> LandingRoutes {
        LandingRoutes::new(DEFAULT_LOGIN_PATH, default_landing_routes())
    }

    fn signed_in(role: Role) -> AuthState {
        AuthState::authenticated(User {
            id: EntityId::Numeric(1),
            role,
            profile: Map::new(),
        })
    }

    fn admin_only() -> ProtectedRoute {
        ProtectedRoute::new("/admin/mentees", [Role::Admin, Role::SuperAdmin])
    }

    #[test]
    fn loading_renders_nothing() {
        let decision = decide(&AuthState::loading(), &admin_only(), "/admin/mentees", &routes());
        assert_eq!(decision, GuardDecision::Loading);
    }

    #[test]
    fn unauthenticated_goes_to_login_with_location() {
        let decision = decide(
            &AuthState::unauthenticated(),
            &admin_only(),
            "/admin/mentees?page=2",
            &routes(),
        );
        assert_eq!(
            decision,
            GuardDecision::Redirect(Redirect {
                target: "/login".into(),
                return_to: Some("/admin/mentees?page=2".into()),
                reason: RedirectReason::Unauthenticated,
                clear_session: false,
            })
        );
    }

    #[test]
    fn empty_allow_list_admits_any_role() {
        let route = ProtectedRoute::new("/profile", []);
        for role in [Role::SuperAdmin, Role::Admin, Role::Mentor] {
            assert_eq!(
                decide(&signed_in(role), &route, "/profile", &routes()),
                GuardDecision::Authorized
            );
        }
    }

    #[test]
    fn disallowed_role_lands_on_its_dashboard() {
        let decision = decide(&signed_in(Role::Mentor), &admin_only(), "/admin/mentees", &routes());
        let GuardDecision::Redirect(redirect) = decision else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.target, "/mentor/dashboard");
        assert_eq!(redirect.reason, RedirectReason::Forbidden);
        assert!(!redirect.clear_session);
    }

    #[test]
    fn role_without_landing_clears_session() {
        let routes = LandingRoutes::new("/login", HashMap::new());
        let decision = decide(&signed_in(Role::Mentor), &admin_only(), "/admin/mentees", &routes);
        let GuardDecision::Redirect(redirect) = decision else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.target, "/login");
        assert!(redirect.clear_session);
    }

    fn session(role: &str) -> Arc<MemorySessionStore> {
        Arc::new(MemorySessionStore::with_entries([
            (TOKEN_KEY.to_owned(), "tok".to_owned()),
            (USER_KEY.to_owned(), format!(r#"{{"id":1,"role":"{role}"}}"#)),
        ]))
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_role_is_redirected_to_login_and_cleared() {
        let store = session("editor");
        let resolver = AuthResolver::new(store.clone(), Duration::from_millis(100));
        let guard = RouteGuard::new(routes(), Notifier::new());

        let decision = guard.enforce(&resolver, &admin_only(), "/admin/mentees").await;
        let GuardDecision::Redirect(redirect) = decision else {
            panic!("expected redirect");
        };
        assert_eq!(redirect.target, "/login");
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn access_denied_is_announced_once() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        let resolver = AuthResolver::new(session("mentor"), Duration::ZERO);
        let guard = RouteGuard::new(routes(), notifier);

        guard.enforce(&resolver, &admin_only(), "/admin/mentees").await;
        guard.enforce(&resolver, &admin_only(), "/admin/mentees").await;

        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn login_success_flag_is_consumed_once() {
        let store = session("admin");
        store.set(LOGIN_SUCCESS_KEY, "true").unwrap();
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        let resolver = AuthResolver::new(store.clone(), Duration::ZERO);
        let guard = RouteGuard::new(routes(), notifier);

        assert_eq!(
            guard.enforce(&resolver, &admin_only(), "/admin/mentees").await,
            GuardDecision::Authorized
        );
        guard.enforce(&resolver, &admin_only(), "/admin/mentees").await;

        let notes = drain(&mut rx);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Success);
        assert_eq!(store.get(LOGIN_SUCCESS_KEY).unwrap(), None);
    }
}

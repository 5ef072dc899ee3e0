//! Per-invocation console context.
//!
//! Holds the loaded configuration, the session resolver and route guard, and
//! the notification feed. Commands authorize against a protected route before
//! touching the API.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use mentordesk_api::{ApiClient, TransportConfig};
use mentordesk_config::{Config, Profile};
use mentordesk_core::{
    AdminConfig, AuthResolver, FileSessionStore, GuardDecision, LandingRoutes, Notification,
    Notifier, ProtectedRoute, RedirectReason, RouteGuard,
};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

pub struct Console {
    config: Config,
    profile: Option<Profile>,
    resolver: AuthResolver,
    guard: RouteGuard,
    notifier: Notifier,
    notes: broadcast::Receiver<Notification>,
}

impl Console {
    pub fn new(global: &GlobalOpts, cfg: Config) -> Result<Self, CliError> {
        let profile = config::active_profile(global, &cfg)?;
        let session_path = config::resolve_session_path(global, profile.as_ref());
        tracing::debug!(path = %session_path.display(), "using session file");

        let store = Arc::new(FileSessionStore::new(session_path));
        let resolver = AuthResolver::new(
            store,
            Duration::from_millis(cfg.defaults.settle_delay_ms),
        );

        let notifier = Notifier::new();
        let notes = notifier.subscribe();
        let routes = LandingRoutes::new(cfg.routes.login.clone(), cfg.routes.landing_map());
        let guard = RouteGuard::new(routes, notifier.clone());

        Ok(Self {
            config: cfg,
            profile,
            resolver,
            guard,
            notifier,
            notes,
        })
    }

    pub fn resolver(&self) -> &AuthResolver {
        &self.resolver
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Resolve the session and check it against `route`.
    pub async fn authorize(&self, route: &ProtectedRoute) -> Result<(), CliError> {
        match self.guard.enforce(&self.resolver, route, &route.path).await {
            GuardDecision::Authorized => Ok(()),
            // resolve() never returns a loading state once awaited
            GuardDecision::Loading => Err(CliError::Internal("session still resolving".into())),
            GuardDecision::Redirect(redirect) => match redirect.reason {
                RedirectReason::Unauthenticated => Err(CliError::NotSignedIn {
                    login: redirect.target,
                }),
                RedirectReason::Forbidden => Err(CliError::AccessDenied {
                    route: route.path.clone(),
                    hint: format!("Your role lands on {}.", redirect.target),
                }),
                RedirectReason::UnmappedRole => Err(CliError::AccessDenied {
                    route: route.path.clone(),
                    hint: format!(
                        "Your role has no landing page; the session was cleared. Sign in at {}.",
                        redirect.target
                    ),
                }),
            },
        }
    }

    pub fn admin_config(&self, global: &GlobalOpts) -> Result<AdminConfig, CliError> {
        config::resolve_admin_config(global, &self.config, self.profile.as_ref())
    }

    /// API client carrying the resolved session token.
    pub fn client(&self, admin: &AdminConfig) -> Result<Arc<ApiClient>, CliError> {
        let mut transport = TransportConfig {
            timeout: admin.timeout,
            ..TransportConfig::default()
        };
        if let Some(token) = self.resolver.token() {
            transport = transport.with_token(token);
        }
        let client = ApiClient::new(admin.api_url.as_str(), &transport)
            .map_err(mentordesk_core::CoreError::from)?;
        Ok(Arc::new(client))
    }

    /// Print every notification published so far.
    pub fn flush_notifications(&mut self, global: &GlobalOpts) {
        let notes = mentordesk_core::notify::drain(&mut self.notes);
        output::print_notifications(&notes, global.quiet, &global.color);
    }
}

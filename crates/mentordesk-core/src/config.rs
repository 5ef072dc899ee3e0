// ── Runtime console configuration ──
//
// These types describe how the console talks to the API and how screens
// behave. They never touch disk: the CLI (via mentordesk-config) builds an
// `AdminConfig` and hands it in.

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::model::Role;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Landing route per role, used when a role is denied a page.
pub fn default_landing_routes() -> HashMap<Role, String> {
    HashMap::from([
        (Role::SuperAdmin, "/super-admin/dashboard".to_owned()),
        (Role::Admin, "/admin/dashboard".to_owned()),
        (Role::Mentor, "/mentor/dashboard".to_owned()),
    ])
}

/// Configuration for one console instance.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// API base URL (e.g., `https://mentoring.example.org`).
    pub api_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Rows per list page.
    pub per_page: u32,
    /// Quiet period before a search term is applied.
    pub search_debounce: Duration,
    /// Delay before the resolved session is published.
    pub settle_delay: Duration,
    /// Where unauthenticated users are sent.
    pub login_path: String,
    /// Role → landing route.
    pub landing_routes: HashMap<Role, String>,
}

impl AdminConfig {
    /// Configuration with default tuning for the given API.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: Duration::from_secs(30),
            per_page: DEFAULT_PER_PAGE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            settle_delay: DEFAULT_SETTLE_DELAY,
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            landing_routes: default_landing_routes(),
        }
    }
}

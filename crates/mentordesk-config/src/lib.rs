//! Shared configuration for mentordesk tools.
//!
//! TOML profiles plus `MENTORDESK_*` environment overrides, translated into
//! `mentordesk_core::AdminConfig`. Nested keys in the environment use a
//! double underscore (`MENTORDESK_DEFAULTS__PER_PAGE=25`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mentordesk_core::config::{
    DEFAULT_LOGIN_PATH, DEFAULT_PER_PAGE, DEFAULT_SEARCH_DEBOUNCE, DEFAULT_SETTLE_DELAY,
};
use mentordesk_core::{AdminConfig, Role};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Login path and per-role landing routes.
    #[serde(default)]
    pub routes: Routes,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            routes: Routes::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile, listing the known ones on failure.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles.get(name).ok_or_else(|| {
            let mut available: Vec<String> = self.profiles.keys().cloned().collect();
            available.sort();
            ConfigError::ProfileNotFound {
                name: name.into(),
                available,
            }
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            per_page: default_per_page(),
            search_debounce_ms: default_search_debounce_ms(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}
fn default_search_debounce_ms() -> u64 {
    duration_ms(DEFAULT_SEARCH_DEBOUNCE)
}
fn default_settle_delay_ms() -> u64 {
    duration_ms(DEFAULT_SETTLE_DELAY)
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Navigation targets used by the route guard.
///
/// A role whose route is blank has no landing page: a denied navigation
/// signs that user out.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Routes {
    #[serde(default = "default_login")]
    pub login: String,
    #[serde(default)]
    pub super_admin: String,
    #[serde(default)]
    pub admin: String,
    #[serde(default)]
    pub mentor: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            login: default_login(),
            super_admin: "/super-admin/dashboard".into(),
            admin: "/admin/dashboard".into(),
            mentor: "/mentor/dashboard".into(),
        }
    }
}

fn default_login() -> String {
    DEFAULT_LOGIN_PATH.into()
}

impl Routes {
    /// Role → landing route, skipping blank routes.
    pub fn landing_map(&self) -> HashMap<Role, String> {
        [
            (Role::SuperAdmin, &self.super_admin),
            (Role::Admin, &self.admin),
            (Role::Mentor, &self.mentor),
        ]
        .into_iter()
        .filter(|(_, route)| !route.trim().is_empty())
        .map(|(role, route)| (role, route.trim().to_owned()))
        .collect()
    }
}

/// A named API profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://mentoring.example.org").
    pub api_url: String,

    /// Where the persisted session lives (defaults to the platform data dir).
    pub session_file: Option<PathBuf>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override page size.
    pub per_page: Option<u32>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "mentordesk", "mentordesk")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mentordesk");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the persisted session.
pub fn default_session_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MENTORDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core ─────────────────────────────────────────────

/// Parse and validate an API base URL.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Build an `AdminConfig` for an API URL using the config's defaults and
/// routes.
pub fn admin_config(cfg: &Config, api_url: url::Url) -> AdminConfig {
    let mut admin = AdminConfig::new(api_url);
    admin.timeout = Duration::from_secs(cfg.defaults.timeout);
    admin.per_page = cfg.defaults.per_page.max(1);
    admin.search_debounce = Duration::from_millis(cfg.defaults.search_debounce_ms);
    admin.settle_delay = Duration::from_millis(cfg.defaults.settle_delay_ms);
    admin.login_path.clone_from(&cfg.routes.login);
    admin.landing_routes = cfg.routes.landing_map();
    admin
}

/// Build an `AdminConfig` from a profile; profile values win over defaults.
pub fn profile_to_admin_config(cfg: &Config, profile: &Profile) -> Result<AdminConfig, ConfigError> {
    let mut admin = admin_config(cfg, parse_api_url(&profile.api_url)?);
    if let Some(timeout) = profile.timeout {
        admin.timeout = Duration::from_secs(timeout);
    }
    if let Some(per_page) = profile.per_page {
        admin.per_page = per_page.max(1);
    }
    Ok(admin)
}

/// Session file for a profile (profile setting or platform default).
pub fn session_path(profile: Option<&Profile>) -> PathBuf {
    profile
        .and_then(|p| p.session_file.clone())
        .unwrap_or_else(default_session_path)
}

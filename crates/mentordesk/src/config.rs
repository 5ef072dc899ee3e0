//! CLI-specific config helpers.
//!
//! Translates mentordesk-config types plus CLI flags into the values the
//! console needs: the active profile, the `AdminConfig`, and the session file.

use std::path::PathBuf;
use std::time::Duration;

use mentordesk_config::{Config, Profile};
use mentordesk_core::AdminConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use mentordesk_config::{config_path, load_config, save_config};

/// Determine the active profile name from CLI flags, config, or fallback.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Look up the active profile.
///
/// An explicitly requested profile must exist; a missing default profile
/// just means "no profile".
pub fn active_profile(global: &GlobalOpts, cfg: &Config) -> Result<Option<Profile>, CliError> {
    let name = active_profile_name(global, cfg);
    match cfg.profile(&name) {
        Ok(profile) => Ok(Some(profile.clone())),
        Err(err) if global.profile.is_some() => Err(err.into()),
        Err(_) => Ok(None),
    }
}

/// Build the `AdminConfig` for API commands. `--api-url` wins over the profile.
pub fn resolve_admin_config(
    global: &GlobalOpts,
    cfg: &Config,
    profile: Option<&Profile>,
) -> Result<AdminConfig, CliError> {
    let mut admin = match (global.api_url.as_deref(), profile) {
        (Some(raw), profile) => {
            let mut admin = mentordesk_config::admin_config(cfg, mentordesk_config::parse_api_url(raw)?);
            if let Some(per_page) = profile.and_then(|p| p.per_page) {
                admin.per_page = per_page.max(1);
            }
            admin
        }
        (None, Some(profile)) => mentordesk_config::profile_to_admin_config(cfg, profile)?,
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(secs) = global.timeout {
        admin.timeout = Duration::from_secs(secs);
    }
    Ok(admin)
}

/// Session file: `--session-file`, then the profile, then the platform default.
pub fn resolve_session_path(global: &GlobalOpts, profile: Option<&Profile>) -> PathBuf {
    global
        .session_file
        .clone()
        .unwrap_or_else(|| mentordesk_config::session_path(profile))
}

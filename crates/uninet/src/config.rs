//! `GlobalOpts`-aware configuration resolution.
//!
//! The flag-free pieces (TOML structs, paths, credential chain) live in
//! `uninet-config`; this module layers CLI flag overrides on top and is
//! the single place where a profile becomes a `ControllerConfig`.

use std::time::Duration;

use secrecy::SecretString;

use uninet_api::ControllerConfig;
use uninet_api::transport::TlsMode;
use uninet_config::{Config, Profile};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
///
/// Flag beats env beats profile for every field; clap already folds the
/// `UNIFI_*` env vars into the flags.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    // 1. Controller URL (flag > env > profile)
    let url_str = global.controller.as_deref().unwrap_or(&profile.controller);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials
    let username = global
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => uninet_config::resolve_password(profile, profile_name)?,
    };

    // 3. TLS + timeout, with flag overrides
    let mut transport = uninet_config::profile_transport(profile);
    if global.insecure {
        transport.tls = TlsMode::DangerAcceptInvalid;
    }
    transport.timeout = Duration::from_secs(global.timeout);

    // 4. Site (flag > env > profile)
    let site = global.site.as_deref().unwrap_or(&profile.site).to_string();

    Ok(ControllerConfig {
        url,
        username,
        password,
        site,
        transport,
        session_file: uninet_config::session_path(),
    })
}

//! Configuration for the uninet CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! state paths, and translation to `uninet_api::ControllerConfig`.
//! The CLI adds `GlobalOpts`-aware wrappers on top of the flag-free
//! resolution helpers here.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use uninet_api::ControllerConfig;
use uninet_api::transport::{TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Settings applied when neither a flag nor a profile says otherwise.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named controller profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://192.168.1.1").
    pub controller: String,

    /// Site name; `default` on most installs.
    #[serde(default = "default_site")]
    pub site: String,

    /// Local account username.
    pub username: Option<String>,

    /// Local account password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            controller: String::new(),
            site: default_site(),
            username: None,
            password: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_site() -> String {
    "default".into()
}

// ── State paths ─────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "uninet", "uninet").map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the session cache path (login cookies, CSRF token, dialect).
///
/// One file, stamped with the controller URL -- switching controllers
/// invalidates it rather than mixing sessions.
pub fn session_path() -> PathBuf {
    ProjectDirs::from("com", "uninet", "uninet").map_or_else(
        || home_fallback(".local/state").join("session.json"),
        |dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.cache_dir())
                .join("session.json")
        },
    )
}

fn home_fallback(subdir: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(subdir);
    p.push("uninet");
    p
}

// ── Config loading and saving ───────────────────────────────────────

/// Load the config file merged with `UNINET_*` environment overrides.
///
/// Defaults fill anything the file and environment leave unset, so a
/// missing file yields a usable config rather than an error.
pub fn load_config() -> Result<Config, ConfigError> {
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("UNINET_").split("_"))
        .extract()?;
    Ok(config)
}

/// Like [`load_config`], but swallows load errors in favor of defaults.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Write the config as pretty TOML to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve a password from the flag-free chain.
///
/// `UNIFI_PASSWORD`, then the system keyring (`uninet` /
/// `{profile}/password`), then plaintext in the config file.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var("UNIFI_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("uninet", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve username + password from the credential chain, flag-free.
///
/// Username comes from the profile, then `UNIFI_USERNAME`; the password
/// follows [`resolve_password`].
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("UNIFI_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let password = resolve_password(profile, profile_name)?;
    Ok((username, password))
}

/// Build a `ControllerConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ControllerConfig, ConfigError> {
    let url: url::Url = profile
        .controller
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "controller".into(),
            reason: format!("invalid URL: {}", profile.controller),
        })?;

    let (username, password) = resolve_credentials(profile, profile_name)?;

    Ok(ControllerConfig {
        url,
        username,
        password,
        site: profile.site.clone(),
        transport: profile_transport(profile),
        session_file: session_path(),
    })
}

/// TLS + timeout settings from a profile.
pub fn profile_transport(profile: &Profile) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::DangerAcceptInvalid // local controllers typically self-signed
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(default_timeout())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_names_the_default_profile() {
        let cfg = Config::default();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(!cfg.defaults.insecure);
    }

    #[test]
    fn profile_parses_from_toml_with_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            default_profile = "home"

            [profiles.home]
            controller = "https://192.168.1.1"
            username = "admin"
            "#,
        )
        .unwrap();

        let profile = &cfg.profiles["home"];
        assert_eq!(profile.controller, "https://192.168.1.1");
        assert_eq!(profile.site, "default");
        assert_eq!(profile.username.as_deref(), Some("admin"));
        assert!(profile.password.is_none());
    }

    #[test]
    fn profile_overrides_survive_a_save_round_trip() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                controller: "https://10.0.0.1:8443".into(),
                site: "lab".into(),
                username: Some("svc".into()),
                timeout: Some(5),
                ..Profile::default()
            },
        );

        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        let profile = &back.profiles["lab"];
        assert_eq!(profile.site, "lab");
        assert_eq!(profile.timeout, Some(5));
    }

    #[test]
    fn transport_defaults_to_skipping_verification() {
        let profile = Profile {
            controller: "https://192.168.1.1".into(),
            ..Profile::default()
        };
        let transport = profile_transport(&profile);
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn transport_uses_the_ca_cert_when_given() {
        let profile = Profile {
            controller: "https://192.168.1.1".into(),
            ca_cert: Some(PathBuf::from("/etc/ssl/unifi.pem")),
            timeout: Some(10),
            ..Profile::default()
        };
        let transport = profile_transport(&profile);
        assert!(matches!(transport.tls, TlsMode::CustomCa(ref p) if p.ends_with("unifi.pem")));
        assert_eq!(transport.timeout, Duration::from_secs(10));
    }

    #[test]
    fn bad_controller_url_is_a_validation_error() {
        let profile = Profile {
            controller: "not a url".into(),
            username: Some("admin".into()),
            password: Some("secret".into()),
            ..Profile::default()
        };
        let err = profile_to_controller_config(&profile, "default").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "controller"));
    }
}

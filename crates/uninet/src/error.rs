//! CLI error types with miette diagnostics.
//!
//! Maps `uninet_api::Error` and `uninet_config::ConfigError` into
//! user-facing errors with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use uninet_config::ConfigError;

/// Exit codes, kept stable for scripting.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(uninet::connection_failed),
        help(
            "Check that the controller is running and accessible.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(uninet::timeout),
        help("Increase --timeout or check controller responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(uninet::auth_failed),
        help(
            "Verify the username and password for this controller.\n\
             Store the password with: uninet profile set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("Session expired and could not be renewed")]
    #[diagnostic(
        code(uninet::session_expired),
        help(
            "The controller rejected both the cached session and a fresh login.\n\
             Check the account on the controller, then run: uninet logout"
        )
    )]
    SessionExpired,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(uninet::no_credentials),
        help(
            "Configure credentials with: uninet profile init\n\
             Or set UNIFI_USERNAME and UNIFI_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(uninet::not_found),
        help("Run: uninet {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} name '{identifier}' is ambiguous")]
    #[diagnostic(
        code(uninet::ambiguous),
        help("Matches: {matches}\nUse the MAC address to pick one.")
    )]
    Ambiguous {
        resource_type: String,
        identifier: String,
        matches: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(uninet::api_error))]
    ApiError { status: u16, message: String },

    #[error("Controller rejected the command: {action}")]
    #[diagnostic(
        code(uninet::rejected),
        help("The controller answered rc=error. Check the target still exists.")
    )]
    Rejected { action: String },

    #[error("Controller sent an unparseable response: {message}")]
    #[diagnostic(
        code(uninet::invalid_response),
        help(
            "The URL may point at something other than a UniFi controller,\n\
             or the controller version is unsupported."
        )
    )]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(uninet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(uninet::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: uninet profile init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(uninet::no_config),
        help(
            "Create one with: uninet profile init\n\
             Or pass --controller (-c) directly.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(uninet::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(uninet::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(uninet::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::SessionExpired | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── uninet_api::Error → CliError mapping ─────────────────────────────

impl From<uninet_api::Error> for CliError {
    fn from(err: uninet_api::Error) -> Self {
        use uninet_api::Error;

        let timed_out = err.is_timeout();
        match err {
            Error::Connection { url, source } => {
                if timed_out {
                    Self::Timeout { url }
                } else {
                    Self::ConnectionFailed { url, source }
                }
            }

            Error::Authentication { message, .. } => Self::AuthFailed { message },

            Error::SessionExpired => Self::SessionExpired,

            Error::Api { status, body } => Self::ApiError {
                status,
                message: body,
            },

            Error::Deserialization { message, .. } => Self::InvalidResponse { message },

            Error::Tls(message) => Self::Validation {
                field: "tls".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Serialization(e) => Self::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

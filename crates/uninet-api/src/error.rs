use thiserror::Error;

/// Top-level error type for the `uninet-api` crate.
///
/// The four failure modes callers must tell apart are: bad credentials
/// (`Authentication`), the controller being unreachable (`Connection`), a
/// session that could not be revived mid-request (`SessionExpired`), and the
/// controller answering with a non-2xx status (`Api`). `uninet` maps these
/// into user-facing diagnostics and exit codes.
#[derive(Debug, Error)]
pub enum Error {
    /// Login failed (wrong credentials, missing API access, account locked).
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        /// HTTP status of the rejected login attempt, when one was received.
        status: Option<u16>,
    },

    /// Transport-level failure: connection refused, DNS failure, TLS error,
    /// or a request that timed out before the controller answered.
    #[error("Could not reach controller at {url}")]
    Connection {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The controller rejected the session mid-request and a fresh login did
    /// not stick either.
    #[error("Session expired and re-login failed")]
    SessionExpired,

    /// The controller answered with an HTTP error status (>= 400) that was
    /// not an authentication rejection.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// JSON deserialization failed, with a body excerpt for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// TLS setup or HTTP client construction failed (bad CA file, invalid cert).
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    pub(crate) fn connection(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Connection {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// The HTTP status carried by this error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the underlying transport failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Connection { source, .. } => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }

    /// Returns `true` if this error means credentials or the session are bad
    /// and a fresh login might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }
}

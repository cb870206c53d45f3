// Local controller HTTP client
//
// Wraps `reqwest::Client` with dialect-aware URL construction, explicit
// cookie replay, and a single forced re-login when the controller rejects
// a session mid-request. Endpoint families (clients, devices, etc.) are
// implemented as inherent methods in separate files to keep this module
// focused on request mechanics.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use reqwest::{Method, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Dialect;
use crate::error::Error;
use crate::session::{Session, SessionStore};
use crate::transport::TransportConfig;

/// Everything needed to construct a [`LocalClient`].
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller root, e.g. `https://192.168.1.1` or `https://host:8443`.
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Site identifier; `default` on most installs.
    pub site: String,
    pub transport: TransportConfig,
    /// Where the login session is persisted between runs.
    pub session_file: PathBuf,
}

/// In-memory session material, replayed on every request.
#[derive(Default)]
struct SessionState {
    cookies: BTreeMap<String, String>,
    csrf_token: Option<String>,
    dialect: Option<Dialect>,
}

/// Client for a UniFi Network controller's site-scoped API.
///
/// Requests carry the persisted session cookies explicitly and unwrap
/// nothing: callers get the parsed JSON body verbatim, while the typed
/// endpoint methods layered on top handle the `{ meta, data }` envelope.
pub struct LocalClient {
    http: reqwest::Client,
    /// Controller root with any trailing slash stripped. Doubles as the
    /// identity a persisted session is scoped to.
    origin: String,
    site: String,
    username: String,
    password: SecretString,
    store: SessionStore,
    state: RwLock<SessionState>,
}

impl LocalClient {
    /// Build a client from controller settings.
    ///
    /// Credentials are required up front; dialect detection and login are
    /// deferred until the first request needs them.
    pub fn new(config: ControllerConfig) -> Result<Self, Error> {
        if config.username.is_empty() || config.password.expose_secret().is_empty() {
            return Err(Error::Authentication {
                message: "controller credentials are not configured".into(),
                status: None,
            });
        }

        let http = config.transport.build_client()?;
        let origin = config.url.as_str().trim_end_matches('/').to_owned();

        Ok(Self {
            http,
            origin,
            site: config.site,
            username: config.username,
            password: config.password,
            store: SessionStore::new(config.session_file),
            state: RwLock::new(SessionState::default()),
        })
    }

    /// The controller root URL (no trailing slash).
    pub fn controller_url(&self) -> &str {
        &self.origin
    }

    /// The site identifier requests are scoped to.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The detected dialect, once a probe or login has run.
    pub fn dialect(&self) -> Option<Dialect> {
        self.state.read().expect("session state lock poisoned").dialect
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn set_dialect(&self, dialect: Dialect) {
        self.state.write().expect("session state lock poisoned").dialect = Some(dialect);
    }

    /// Install fresh session material in memory and persist it.
    ///
    /// A failure to write the session file is logged, not raised: the
    /// login itself succeeded and the in-memory session is good.
    pub(crate) fn install_session(
        &self,
        cookies: BTreeMap<String, String>,
        csrf_token: Option<String>,
        dialect: Dialect,
    ) {
        {
            let mut state = self.state.write().expect("session state lock poisoned");
            state.cookies.clone_from(&cookies);
            state.csrf_token.clone_from(&csrf_token);
            state.dialect = Some(dialect);
        }

        let session = Session::new(self.origin.clone(), cookies, csrf_token, dialect);
        if let Err(err) = self.store.save(&session) {
            warn!(path = %self.store.path().display(), %err, "failed to persist session");
        }
    }

    /// Drop the session from memory and disk. The dialect stays.
    pub(crate) fn clear_session(&self) {
        {
            let mut state = self.state.write().expect("session state lock poisoned");
            state.cookies.clear();
            state.csrf_token = None;
        }
        self.store.clear();
    }

    // ── Request execution ────────────────────────────────────────────

    /// `GET` a site-scoped endpoint, returning the parsed body verbatim.
    pub async fn get(&self, endpoint: &str) -> Result<Value, Error> {
        self.request(Method::GET, endpoint, None).await
    }

    /// `POST` a site-scoped endpoint with a JSON body.
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, Error> {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    /// Make sure a session is in place: reuse the persisted one when it is
    /// still valid for this controller, otherwise log in fresh.
    async fn ensure_authenticated(&self) -> Result<(), Error> {
        if let Some(session) = self.store.load(&self.origin) {
            let mut state = self.state.write().expect("session state lock poisoned");
            state.cookies = session.cookies;
            state.csrf_token = session.csrf_token;
            if let Some(dialect) = session.dialect {
                state.dialect = Some(dialect);
            }
            return Ok(());
        }
        self.login().await
    }

    /// Execute one authenticated request.
    ///
    /// A mid-flight `401` forces a re-login and a single retry; a second
    /// `401` means fresh cookies are not being honored either and the
    /// session is declared dead. Other `>= 400` statuses surface as
    /// [`Error::Api`] with the body attached.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        self.ensure_authenticated().await?;

        for attempt in 0..2 {
            let url = self.api_url(endpoint);
            debug!("{method} {url} (attempt {attempt})");

            let mut req = self
                .http
                .request(method.clone(), &url)
                .header(header::ACCEPT, "application/json");

            {
                let state = self.state.read().expect("session state lock poisoned");
                if !state.cookies.is_empty() {
                    req = req.header(header::COOKIE, cookie_header(&state.cookies));
                }
                if let Some(token) = &state.csrf_token {
                    req = req.header("X-CSRF-Token", token);
                }
            }

            if let Some(body) = body {
                req = req.json(body);
            }

            let resp = req.send().await.map_err(|e| Error::connection(&url, e))?;
            let status = resp.status();

            if status == StatusCode::UNAUTHORIZED {
                if attempt == 0 {
                    debug!("controller rejected the session, re-authenticating");
                    self.clear_session();
                    self.login().await?;
                    continue;
                }
                return Err(Error::SessionExpired);
            }

            if status.is_client_error() || status.is_server_error() {
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let text = resp.text().await.map_err(|e| Error::connection(&url, e))?;
            return serde_json::from_str(&text).map_err(|err| Error::Deserialization {
                message: err.to_string(),
                body: preview(&text),
            });
        }

        Err(Error::SessionExpired)
    }

    /// Build a site-scoped URL: `{origin}{prefix}/{endpoint}`.
    ///
    /// Sessions normally know their dialect by the time a request is made;
    /// if not, the UniFi OS prefix is assumed.
    fn api_url(&self, endpoint: &str) -> String {
        let dialect = self.dialect().unwrap_or(Dialect::Udm);
        format!(
            "{}{}/{}",
            self.origin,
            dialect.api_prefix(&self.site),
            endpoint.trim_start_matches('/')
        )
    }
}

fn cookie_header(cookies: &BTreeMap<String, String>) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn preview(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_owned();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

// ── Envelope helpers ─────────────────────────────────────────────────

/// Unwrap the `data` array of a legacy envelope into typed records.
///
/// A missing or `null` `data` key is an empty result, not an error.
pub(crate) fn data_records<T: DeserializeOwned>(response: &Value) -> Result<Vec<T>, Error> {
    let data = match response.get("data") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(data) => data,
    };
    Vec::<T>::deserialize(data).map_err(|err| Error::Deserialization {
        message: err.to_string(),
        body: preview(&data.to_string()),
    })
}

/// `meta.rc == "ok"` is the legacy envelope's success flag.
pub(crate) fn rc_ok(response: &Value) -> bool {
    response.pointer("/meta/rc").and_then(Value::as_str) == Some("ok")
}

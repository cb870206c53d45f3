// Authentication and dialect detection
//
// Controllers come in two shapes: UniFi OS devices (UDM, UCG, Cloud Key
// Gen2+) that tuck the network app behind `/proxy/network`, and classic
// self-hosted or first-gen Cloud Key controllers that serve it at the
// root. Login paths, API prefixes, and CSRF handling differ between the
// two, so the client probes once and remembers the answer.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::client::LocalClient;
use crate::error::Error;

/// Which API dialect the controller speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// UniFi OS device -- network app proxied behind `/proxy/network`.
    Udm,
    /// Classic controller (self-hosted or first-gen Cloud Key) -- no prefix.
    Legacy,
}

impl Dialect {
    /// The login endpoint path.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Udm => "/api/auth/login",
            Self::Legacy => "/api/login",
        }
    }

    /// The site-scoped API prefix.
    pub fn api_prefix(self, site: &str) -> String {
        match self {
            Self::Udm => format!("/proxy/network/api/s/{site}"),
            Self::Legacy => format!("/api/s/{site}"),
        }
    }
}

/// Outcome of a UniFi OS login attempt.
enum UdmLogin {
    Authenticated,
    /// The endpoint is missing or misbehaving; fall back to the classic path.
    TryLegacy,
}

impl LocalClient {
    /// Authenticate with the controller, probing its dialect first if it is
    /// not already known.
    ///
    /// On success the session cookies (and the CSRF token on UniFi OS) are
    /// installed in memory and persisted through the session store.
    pub async fn login(&self) -> Result<(), Error> {
        let dialect = match self.dialect() {
            Some(known) => known,
            None => {
                let detected = self.probe_dialect().await;
                self.set_dialect(detected);
                detected
            }
        };

        if dialect == Dialect::Udm {
            match self.login_udm().await? {
                UdmLogin::Authenticated => return Ok(()),
                UdmLogin::TryLegacy => {
                    debug!("UniFi OS login endpoint unavailable, trying classic login");
                    self.set_dialect(Dialect::Legacy);
                }
            }
        }

        self.login_legacy().await
    }

    /// Forget the current session, in memory and on disk.
    ///
    /// The detected dialect is kept: it is a property of the controller,
    /// not of the session.
    pub fn logout(&self) {
        debug!("discarding session");
        self.clear_session();
    }

    /// Probe unauthenticated endpoints to classify the controller.
    ///
    /// UniFi OS answers `401` on `/api/users/self` (classic controllers
    /// answer `404` there); classic controllers serve `/status` without
    /// auth. Detection never fails: if neither probe gets an HTTP answer,
    /// the controller is assumed to be UniFi OS.
    async fn probe_dialect(&self) -> Dialect {
        let probe = format!("{}/api/users/self", self.controller_url());
        debug!("probing for UniFi OS at {probe}");
        if let Ok(resp) = self.http().get(&probe).send().await {
            if resp.status() == StatusCode::UNAUTHORIZED {
                debug!("controller speaks the UniFi OS dialect");
                return Dialect::Udm;
            }
        }

        let probe = format!("{}/status", self.controller_url());
        debug!("probing classic status endpoint at {probe}");
        match self.http().get(&probe).send().await {
            Ok(_) => {
                debug!("controller speaks the classic dialect");
                Dialect::Legacy
            }
            Err(_) => {
                debug!("both probes failed, assuming UniFi OS");
                Dialect::Udm
            }
        }
    }

    /// `POST /api/auth/login` -- UniFi OS style.
    ///
    /// A `200` yields cookies plus an `X-CSRF-Token` header. `401`/`403`
    /// are credential failures; anything else means the endpoint is not
    /// what we expected and the classic path should be tried.
    async fn login_udm(&self) -> Result<UdmLogin, Error> {
        let url = format!("{}{}", self.controller_url(), Dialect::Udm.login_path());
        debug!("attempting UniFi OS login at {url}");

        let resp = self
            .http()
            .post(&url)
            .json(&self.login_body())
            .send()
            .await
            .map_err(|e| Error::connection(&url, e))?;

        match resp.status() {
            StatusCode::OK => {
                let csrf_token = csrf_header(resp.headers());
                let cookies = response_cookies(resp.headers());
                self.install_session(cookies, csrf_token, Dialect::Udm);
                debug!("UniFi OS login successful");
                Ok(UdmLogin::Authenticated)
            }
            StatusCode::FORBIDDEN => Err(Error::Authentication {
                message: "invalid username or password (or the account lacks API access)".into(),
                status: Some(403),
            }),
            StatusCode::UNAUTHORIZED => Err(Error::Authentication {
                message: "invalid username or password".into(),
                status: Some(401),
            }),
            status => {
                debug!("unexpected HTTP {status} from UniFi OS login");
                Ok(UdmLogin::TryLegacy)
            }
        }
    }

    /// `POST /api/login` -- classic controller style.
    ///
    /// Classic controllers answer `400` with a `meta.msg` explaining the
    /// rejection; `Invalid` in that message means bad credentials.
    async fn login_legacy(&self) -> Result<(), Error> {
        let url = format!("{}{}", self.controller_url(), Dialect::Legacy.login_path());
        debug!("attempting classic login at {url}");

        let resp = self
            .http()
            .post(&url)
            .json(&self.login_body())
            .send()
            .await
            .map_err(|e| Error::connection(&url, e))?;

        let status = resp.status();
        match status {
            StatusCode::OK => {
                let cookies = response_cookies(resp.headers());
                self.install_session(cookies, None, Dialect::Legacy);
                debug!("classic login successful");
                Ok(())
            }
            StatusCode::BAD_REQUEST => {
                let body = resp.text().await.unwrap_or_default();
                let invalid_creds = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| {
                        v.pointer("/meta/msg")
                            .and_then(Value::as_str)
                            .map(|msg| msg.contains("Invalid"))
                    })
                    .unwrap_or(false);
                let message = if invalid_creds {
                    "invalid username or password".to_owned()
                } else {
                    "credentials rejected by controller".to_owned()
                };
                Err(Error::Authentication {
                    message,
                    status: Some(400),
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Authentication {
                message: "invalid username or password".into(),
                status: Some(status.as_u16()),
            }),
            status => Err(Error::Authentication {
                message: format!("HTTP {}", status.as_u16()),
                status: Some(status.as_u16()),
            }),
        }
    }

    fn login_body(&self) -> Value {
        json!({
            "username": self.username(),
            "password": self.password().expose_secret(),
            "remember": true,
        })
    }
}

/// Collect `name=value` pairs from `Set-Cookie` headers, dropping
/// attributes like `Path` and `Expires`.
fn response_cookies(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();
    for header in headers.get_all(header::SET_COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        if let Some((name, rest)) = raw.split_once('=') {
            let value = rest.split(';').next().unwrap_or("");
            cookies.insert(name.trim().to_owned(), value.trim().to_owned());
        }
    }
    cookies
}

/// The CSRF token UniFi OS hands back on login, if present.
fn csrf_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn dialect_login_paths() {
        assert_eq!(Dialect::Udm.login_path(), "/api/auth/login");
        assert_eq!(Dialect::Legacy.login_path(), "/api/login");
    }

    #[test]
    fn dialect_api_prefixes() {
        assert_eq!(
            Dialect::Udm.api_prefix("default"),
            "/proxy/network/api/s/default"
        );
        assert_eq!(Dialect::Legacy.api_prefix("branch"), "/api/s/branch");
    }

    #[test]
    fn dialect_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Dialect::Udm).unwrap(), "\"udm\"");
        assert_eq!(
            serde_json::from_str::<Dialect>("\"legacy\"").unwrap(),
            Dialect::Legacy
        );
    }

    #[test]
    fn cookies_are_collected_without_attributes() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("TOKEN=abc123; Path=/; HttpOnly; Secure"),
        );
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("csrf_token=xyz; Path=/"),
        );

        let cookies = response_cookies(&headers);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.get("TOKEN").map(String::as_str), Some("abc123"));
        assert_eq!(cookies.get("csrf_token").map(String::as_str), Some("xyz"));
    }

    #[test]
    fn malformed_set_cookie_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.append(header::SET_COOKIE, HeaderValue::from_static("no-equals-sign"));
        assert!(response_cookies(&headers).is_empty());
    }

    #[test]
    fn csrf_header_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("X-CSRF-Token", HeaderValue::from_static("tok-1"));
        assert_eq!(csrf_header(&headers).as_deref(), Some("tok-1"));
    }
}

// ── Session persistence ──
//
// Login cookies are cached on disk so back-to-back commands don't hit the
// controller's login endpoint every time. A stored session goes stale at
// the end of the calendar day it was created (UTC), regardless of the
// cookie's real TTL.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::Dialect;

/// A persisted login session for one controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Controller the cookies belong to, trailing slash stripped.
    pub controller_url: String,
    /// Cookie name/value pairs captured from the login response.
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    /// CSRF token issued by UniFi OS controllers. Absent on classic ones.
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Which API dialect the controller spoke at login time.
    #[serde(default)]
    pub dialect: Option<Dialect>,
    /// Hard expiry, stamped at 23:59:59 UTC on the day of login.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session that expires at the end of the current UTC day.
    pub fn new(
        controller_url: impl Into<String>,
        cookies: BTreeMap<String, String>,
        csrf_token: Option<String>,
        dialect: Dialect,
    ) -> Self {
        Self {
            controller_url: controller_url.into(),
            cookies,
            csrf_token,
            dialect: Some(dialect),
            expires_at: end_of_day(Utc::now()),
        }
    }
}

fn end_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(23, 59, 59)
        .map_or(now, |eod| eod.and_utc())
}

/// On-disk store for a single [`Session`], serialized as pretty JSON.
///
/// Every failure on the read side (missing file, unreadable file, garbage
/// JSON, wrong controller, expired) degrades to a cache miss; the next
/// successful login rewrites the file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the session file lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session if it is still usable for `controller_url`.
    pub fn load(&self, controller_url: &str) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "ignoring unparsable session file");
                return None;
            }
        };
        if session.controller_url != controller_url {
            debug!(
                stored = %session.controller_url,
                "stored session belongs to a different controller"
            );
            return None;
        }
        if Utc::now() >= session.expires_at {
            debug!(expired_at = %session.expires_at, "stored session has expired");
            return None;
        }
        if session.cookies.is_empty() {
            debug!("stored session has no cookies");
            return None;
        }
        debug!(path = %self.path.display(), "reusing persisted session");
        Some(session)
    }

    /// Persist `session`, creating parent directories as needed.
    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(session).map_err(io::Error::other)?;
        fs::write(&self.path, body)
    }

    /// Remove the session file. A missing file is fine; other failures are
    /// logged and swallowed.
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed session file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to remove session file");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};

    const CONTROLLER: &str = "https://192.168.1.1";

    fn sample_session() -> Session {
        let mut cookies = BTreeMap::new();
        cookies.insert("TOKEN".to_owned(), "abc123".to_owned());
        Session::new(CONTROLLER, cookies, Some("csrf-token".to_owned()), Dialect::Udm)
    }

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn expiry_is_stamped_at_end_of_day() {
        let login = Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 11).unwrap();
        let expiry = end_of_day(login);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 59).unwrap());
    }

    #[test]
    fn expiry_near_midnight_stays_on_the_same_day() {
        let login = Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 58).unwrap();
        let expiry = end_of_day(login);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 59).unwrap());
    }

    #[test]
    fn new_session_expires_today() {
        let before = Utc::now();
        let session = sample_session();
        let after = Utc::now();

        assert_eq!(
            session.expires_at.time(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert!(session.expires_at >= before);
        let day = session.expires_at.date_naive();
        assert!(day == before.date_naive() || day == after.date_naive());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&sample_session()).unwrap();
        let loaded = store.load(CONTROLLER).unwrap();

        assert_eq!(loaded.controller_url, CONTROLLER);
        assert_eq!(loaded.cookies.get("TOKEN").map(String::as_str), Some("abc123"));
        assert_eq!(loaded.csrf_token.as_deref(), Some("csrf-token"));
        assert_eq!(loaded.dialect, Some(Dialect::Udm));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/deeper/session.json"));

        store.save(&sample_session()).unwrap();
        assert!(store.load(CONTROLLER).is_some());
    }

    #[test]
    fn load_missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load(CONTROLLER).is_none());
    }

    #[test]
    fn load_corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{not json at all").unwrap();
        assert!(store.load(CONTROLLER).is_none());
    }

    #[test]
    fn load_rejects_a_different_controller() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&sample_session()).unwrap();
        assert!(store.load("https://10.0.0.1").is_none());
    }

    #[test]
    fn load_rejects_an_expired_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut session = sample_session();
        session.expires_at = Utc.with_ymd_and_hms(2020, 1, 1, 23, 59, 59).unwrap();
        store.save(&session).unwrap();

        assert!(store.load(CONTROLLER).is_none());
    }

    #[test]
    fn load_rejects_a_session_without_cookies() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut session = sample_session();
        session.cookies.clear();
        store.save(&session).unwrap();

        assert!(store.load(CONTROLLER).is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&sample_session()).unwrap();
        store.clear();
        assert!(store.load(CONTROLLER).is_none());
        store.clear();
    }
}

#![allow(clippy::unwrap_used)]
// Integration tests for `LocalClient` using wiremock.
//
// The mock server plays both controller dialects; each test seeds or
// withholds a persisted session to drive the login machinery.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uninet_api::models::VoucherSpec;
use uninet_api::transport::TransportConfig;
use uninet_api::{ControllerConfig, Dialect, Error, LocalClient, MacAddress, Session, SessionStore};

// ── Helpers ─────────────────────────────────────────────────────────

fn controller_config(uri: &str, dir: &Path) -> ControllerConfig {
    ControllerConfig {
        url: Url::parse(uri).unwrap(),
        username: "admin".into(),
        password: "test-password".to_string().into(),
        site: "default".into(),
        transport: TransportConfig::default(),
        session_file: dir.join("session.json"),
    }
}

async fn setup() -> (MockServer, LocalClient, TempDir) {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let client = LocalClient::new(controller_config(&server.uri(), dir.path())).unwrap();
    (server, client, dir)
}

fn udm_path(suffix: &str) -> String {
    format!("/proxy/network/api/s/default/{suffix}")
}

fn legacy_path(suffix: &str) -> String {
    format!("/api/s/default/{suffix}")
}

fn envelope(data: Value) -> Value {
    json!({ "meta": { "rc": "ok" }, "data": data })
}

/// Write a still-valid UniFi OS session to disk so requests skip login.
fn seed_udm_session(dir: &TempDir, uri: &str, cookie_value: &str) {
    let mut cookies = BTreeMap::new();
    cookies.insert("TOKEN".to_owned(), cookie_value.to_owned());
    let session = Session::new(uri, cookies, Some("csrf-xyz".to_owned()), Dialect::Udm);
    SessionStore::new(dir.path().join("session.json"))
        .save(&session)
        .unwrap();
}

/// `/api/users/self` answering 401 marks the controller as UniFi OS.
async fn mount_udm_probe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .respond_with(ResponseTemplate::new(401))
        .mount(server)
        .await;
}

async fn mount_udm_login(server: &MockServer, cookie_value: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header(
                    "set-cookie",
                    format!("TOKEN={cookie_value}; Path=/; HttpOnly; Secure"),
                )
                .insert_header("x-csrf-token", "csrf-xyz")
                .set_body_json(json!({})),
        )
        .mount(server)
        .await;
}

// ── Dialect detection and login ─────────────────────────────────────

#[tokio::test]
async fn test_cold_start_detects_udm_and_logs_in() {
    let (server, client, dir) = setup().await;

    mount_udm_probe(&server).await;
    mount_udm_login(&server, "udm-token").await;

    Mock::given(method("GET"))
        .and(path(udm_path("stat/sta")))
        .and(header("cookie", "TOKEN=udm-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "c1", "mac": "aa:bb:cc:dd:ee:ff", "hostname": "laptop" }
        ]))))
        .mount(&server)
        .await;

    let clients = client.list_clients().await.unwrap();

    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].mac, "aa:bb:cc:dd:ee:ff");
    assert_eq!(client.dialect(), Some(Dialect::Udm));

    // The session landed on disk with the dialect recorded.
    let stored = SessionStore::new(dir.path().join("session.json"))
        .load(&server.uri())
        .unwrap();
    assert_eq!(stored.dialect, Some(Dialect::Udm));
    assert_eq!(stored.cookies.get("TOKEN").map(String::as_str), Some("udm-token"));
    assert_eq!(stored.csrf_token.as_deref(), Some("csrf-xyz"));
}

#[tokio::test]
async fn test_cold_start_falls_back_to_classic_dialect() {
    let (server, client, _dir) = setup().await;

    // Not UniFi OS: the probe endpoint is unknown, but /status answers.
    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" } })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "unifises=legacy-cookie; Path=/")
                .set_body_json(envelope(json!([]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(legacy_path("stat/device")))
        .and(header("cookie", "unifises=legacy-cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "d1", "mac": "11:22:33:44:55:66", "type": "usw", "adopted": true, "state": 1 }
        ]))))
        .mount(&server)
        .await;

    let devices = client.get_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device_type.as_deref(), Some("usw"));
    assert_eq!(client.dialect(), Some(Dialect::Legacy));
}

#[tokio::test]
async fn test_rejected_credentials_are_an_authentication_error() {
    let (server, client, _dir) = setup().await;

    mount_udm_probe(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client.list_clients().await;

    match result {
        Err(Error::Authentication { status, ref message }) => {
            assert_eq!(status, Some(403));
            assert!(
                message.contains("invalid username or password"),
                "unexpected message: {message}"
            );
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_repeated_login_failures_probe_the_dialect_once() {
    let (server, client, _dir) = setup().await;

    // The dialect sticks after the first probe, even when login keeps failing.
    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    for _ in 0..2 {
        let result = client.list_clients().await;
        assert!(
            matches!(result, Err(Error::Authentication { .. })),
            "expected Authentication error, got: {result:?}"
        );
    }
    assert_eq!(client.dialect(), Some(Dialect::Udm));
}

#[tokio::test]
async fn test_classic_login_rejection_reads_the_envelope_message() {
    let (server, client, _dir) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" },
            "data": []
        })))
        .mount(&server)
        .await;

    let result = client.get_devices().await;

    match result {
        Err(Error::Authentication { status, ref message }) => {
            assert_eq!(status, Some(400));
            assert!(
                message.contains("invalid username or password"),
                "unexpected message: {message}"
            );
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

// ── Session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn test_warm_start_reuses_the_persisted_session() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    // Neither the probe nor the login endpoint may be touched.
    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(udm_path("stat/sta")))
        .and(header("cookie", "TOKEN=warm-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    client.list_clients().await.unwrap();
    assert_eq!(client.dialect(), Some(Dialect::Udm));
}

#[tokio::test]
async fn test_mutations_carry_the_csrf_token() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("POST"))
        .and(path(udm_path("cmd/stamgr")))
        .and(header("x-csrf-token", "csrf-xyz"))
        .and(body_partial_json(json!({
            "cmd": "block-sta",
            "mac": "aa:bb:cc:dd:ee:ff"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let mac = MacAddress::new("AA:BB:CC:DD:EE:FF");
    assert!(client.block_client(&mac).await.unwrap());
}

#[tokio::test]
async fn test_mid_session_rejection_triggers_one_relogin() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "stale-token");

    // The stale cookie is rejected; fresh cookies succeed.
    Mock::given(method("GET"))
        .and(path(udm_path("stat/sta")))
        .and(header("cookie", "TOKEN=stale-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(udm_path("stat/sta")))
        .and(header("cookie", "TOKEN=fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "c1", "mac": "aa:bb:cc:dd:ee:ff" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    mount_udm_login(&server, "fresh-token").await;

    // The dialect came from the session file, so no re-probe either.
    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;

    let clients = client.list_clients().await.unwrap();
    assert_eq!(clients.len(), 1);
}

#[tokio::test]
async fn test_second_rejection_means_the_session_is_dead() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "stale-token");

    // Even freshly minted cookies bounce.
    Mock::given(method("GET"))
        .and(path(udm_path("stat/sta")))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_udm_login(&server, "fresh-token").await;

    let result = client.list_clients().await;

    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_logout_discards_the_persisted_session() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    client.logout();

    let store = SessionStore::new(dir.path().join("session.json"));
    assert!(store.load(&server.uri()).is_none());
    assert!(!store.path().exists());
}

// ── Endpoint tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_client_normalizes_the_mac() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("GET"))
        .and(path(udm_path("stat/user/aa:bb:cc:dd:ee:ff")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "c1", "mac": "aa:bb:cc:dd:ee:ff", "name": "printer" }
        ]))))
        .mount(&server)
        .await;

    // Dashes and uppercase collapse to the canonical colon form.
    let mac = MacAddress::new("AA-BB-CC-DD-EE-FF");
    let found = client.get_client(&mac).await.unwrap().unwrap();

    assert_eq!(found.display_name(), "printer");
}

#[tokio::test]
async fn test_get_client_unknown_mac_is_none() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("GET"))
        .and(path(udm_path("stat/user/aa:bb:cc:dd:ee:ff")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    let mac = MacAddress::new("aa:bb:cc:dd:ee:ff");
    assert!(client.get_client(&mac).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_command_reports_false() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("POST"))
        .and(path(udm_path("cmd/stamgr")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.UnknownStation" },
            "data": []
        })))
        .mount(&server)
        .await;

    let mac = MacAddress::new("aa:bb:cc:dd:ee:ff");
    assert!(!client.kick_client(&mac).await.unwrap());
}

#[tokio::test]
async fn test_get_device_filters_the_inventory() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("GET"))
        .and(path(udm_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "d1", "mac": "aa:aa:aa:aa:aa:aa", "name": "AP-Attic" },
            { "_id": "d2", "mac": "bb:bb:bb:bb:bb:bb", "name": "Switch-Rack" }
        ]))))
        .mount(&server)
        .await;

    let mac = MacAddress::new("BBBBBBBBBBBB");
    let device = client.get_device(&mac).await.unwrap().unwrap();
    assert_eq!(device.name.as_deref(), Some("Switch-Rack"));

    let missing = MacAddress::new("cc:cc:cc:cc:cc:cc");
    assert!(client.get_device(&missing).await.unwrap().is_none());
}

#[tokio::test]
async fn test_dhcp_reservations_keep_only_fixed_ip_clients() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("GET"))
        .and(path(udm_path("rest/user")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "c1", "mac": "aa:aa:aa:aa:aa:aa", "use_fixedip": true, "fixed_ip": "192.168.1.50" },
            { "_id": "c2", "mac": "bb:bb:bb:bb:bb:bb", "use_fixedip": false },
            { "_id": "c3", "mac": "cc:cc:cc:cc:cc:cc" }
        ]))))
        .mount(&server)
        .await;

    let reservations = client.get_dhcp_reservations().await.unwrap();

    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].fixed_ip.as_deref(), Some("192.168.1.50"));
}

#[tokio::test]
async fn test_events_request_newest_first() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("POST"))
        .and(path(udm_path("stat/event")))
        .and(body_partial_json(json!({ "_limit": 5, "_sort": "-time" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "e1", "key": "EVT_WU_Connected", "subsystem": "wlan" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let events = client.get_events(5).await.unwrap();
    assert_eq!(events[0].key.as_deref(), Some("EVT_WU_Connected"));
}

#[tokio::test]
async fn test_alarms_hide_archived_unless_asked() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("GET"))
        .and(path(udm_path("stat/alarm")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "a1", "key": "EVT_GW_WANTransition", "archived": false },
            { "_id": "a2", "key": "EVT_SW_Lost_Contact", "archived": true },
            { "_id": "a3", "key": "EVT_AP_Lost_Contact" }
        ]))))
        .mount(&server)
        .await;

    let active = client.get_alarms(false).await.unwrap();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|a| a.archived != Some(true)));

    let all = client.get_alarms(true).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_create_voucher_builds_the_hotspot_command() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("POST"))
        .and(path(udm_path("cmd/hotspot")))
        .and(body_partial_json(json!({
            "cmd": "create-voucher",
            "n": 3,
            "expire": 60,
            "quota": 1,
            "note": "guests"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "_id": "v1", "create_time": 1700000000 }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let spec = VoucherSpec {
        count: 3,
        duration_minutes: 60,
        note: Some("guests".into()),
        ..VoucherSpec::default()
    };
    let created = client.create_voucher(&spec).await.unwrap();
    assert_eq!(created.len(), 1);
}

#[tokio::test]
async fn test_daily_stats_request_the_report_attributes() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("POST"))
        .and(path(udm_path("stat/report/daily.site")))
        .and(body_partial_json(json!({
            "n": 7,
            "attrs": ["time", "rx_bytes", "tx_bytes", "num_sta", "wan-rx_bytes", "wan-tx_bytes"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "time": 1700000000000_i64, "rx_bytes": 12345, "tx_bytes": 67890 }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client.get_daily_stats(7).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_running_config_swallows_unsupported_sections() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    for (endpoint, data) in [
        ("rest/networkconf", json!([{ "_id": "n1", "name": "LAN" }])),
        ("rest/wlanconf", json!([{ "_id": "w1", "name": "HomeWiFi" }])),
        ("rest/firewallrule", json!([])),
        ("rest/firewallgroup", json!([])),
        ("rest/portforward", json!([])),
        ("stat/device", json!([])),
        ("rest/user", json!([])),
    ] {
        Mock::given(method("GET"))
            .and(path(udm_path(endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(data)))
            .mount(&server)
            .await;
    }

    // Older controllers 404 on endpoints they predate.
    Mock::given(method("GET"))
        .and(path(udm_path("rest/trafficrule")))
        .respond_with(ResponseTemplate::new(404).set_body_string("api.err.InvalidObject"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(udm_path("rest/routing")))
        .respond_with(ResponseTemplate::new(400).set_body_string("api.err.InvalidObject"))
        .mount(&server)
        .await;

    let config = client.get_running_config().await.unwrap();

    assert_eq!(config.networks.len(), 1);
    assert_eq!(config.wireless.len(), 1);
    assert!(config.traffic_rules.is_empty());
    assert!(config.routing.is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("GET"))
        .and(path(udm_path("stat/device")))
        .respond_with(ResponseTemplate::new(404).set_body_string("api.err.NoSuchSite"))
        .mount(&server)
        .await;

    let result = client.get_devices().await;

    match result {
        Err(Error::Api { status, ref body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("NoSuchSite"), "unexpected body: {body}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_success_body_is_a_deserialization_error() {
    let (server, client, dir) = setup().await;
    seed_udm_session(&dir, &server.uri(), "warm-token");

    Mock::given(method("GET"))
        .and(path(udm_path("stat/sta")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login page</html>"))
        .mount(&server)
        .await;

    let result = client.list_clients().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert!(body.contains("<html>"), "unexpected preview: {body}");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_controller_is_a_connection_error() {
    // Nothing listens on the reserved discard port.
    let dir = tempfile::tempdir().unwrap();
    let client =
        LocalClient::new(controller_config("http://127.0.0.1:9", dir.path())).unwrap();

    let result = client.get_devices().await;

    assert!(
        matches!(result, Err(Error::Connection { .. })),
        "expected Connection error, got: {result:?}"
    );
}

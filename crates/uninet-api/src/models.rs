// Typed API records
//
// Models for the controller's site-scoped JSON API. Fields use
// `#[serde(default)]` liberally because the API is inconsistent about
// field presence across firmware versions; everything not modeled
// explicitly lands in the `extra` catch-all so round-tripping a record
// back to JSON loses nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Client (station) ─────────────────────────────────────────────────

/// A client record from `stat/sta` (connected) or `rest/user` (all known).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub oui: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub essid: Option<String>,
    #[serde(default)]
    pub is_wired: Option<bool>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub authorized: Option<bool>,
    #[serde(default)]
    pub rssi: Option<i32>,
    #[serde(default)]
    pub signal: Option<i32>,
    #[serde(default)]
    pub satisfaction: Option<i32>,
    #[serde(default)]
    pub tx_rate: Option<i64>,
    #[serde(default)]
    pub rx_rate: Option<i64>,
    #[serde(default)]
    pub tx_bytes: Option<i64>,
    #[serde(default)]
    pub rx_bytes: Option<i64>,
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub first_seen: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    /// Set when the client has a DHCP reservation.
    #[serde(default)]
    pub use_fixedip: Option<bool>,
    #[serde(default)]
    pub fixed_ip: Option<String>,
    #[serde(default)]
    pub ap_mac: Option<String>,
    #[serde(default)]
    pub sw_mac: Option<String>,
    #[serde(default)]
    pub sw_port: Option<i32>,
    #[serde(default)]
    pub channel: Option<i32>,
    #[serde(default)]
    pub radio: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ClientEntry {
    /// Best display name: alias, then hostname, then the MAC itself.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.hostname.as_deref().filter(|h| !h.is_empty()))
            .unwrap_or(&self.mac)
    }
}

// ── Device ───────────────────────────────────────────────────────────

/// Full device object from `stat/device`.
///
/// The API can return 100+ fields per device; the commonly needed ones
/// are modeled explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "_id")]
    pub id: String,
    pub mac: String,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub adopted: bool,
    /// 0=offline, 1=online, 2=pending, 4=upgrading, 5=provisioning
    #[serde(default)]
    pub state: i32,
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(default)]
    pub num_sta: Option<i32>,
    #[serde(default, rename = "user-num_sta")]
    pub user_num_sta: Option<i32>,
    #[serde(default, rename = "guest-num_sta")]
    pub guest_num_sta: Option<i32>,
    #[serde(default)]
    pub upgradable: Option<bool>,
    #[serde(default)]
    pub upgrade_to_firmware: Option<String>,
    #[serde(default)]
    pub sys_stats: Option<SysStats>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// System statistics nested inside [`Device`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysStats {
    #[serde(default, rename = "loadavg_1")]
    pub load_1: Option<String>,
    #[serde(default, rename = "loadavg_5")]
    pub load_5: Option<String>,
    #[serde(default, rename = "loadavg_15")]
    pub load_15: Option<String>,
    #[serde(default)]
    pub mem_total: Option<i64>,
    #[serde(default)]
    pub mem_used: Option<i64>,
}

// ── Network configuration ────────────────────────────────────────────

/// Wired network / VLAN definition from `rest/networkconf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConf {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub vlan: Option<i64>,
    #[serde(default)]
    pub vlan_enabled: Option<bool>,
    #[serde(default)]
    pub ip_subnet: Option<String>,
    #[serde(default)]
    pub networkgroup: Option<String>,
    #[serde(default)]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub dhcpd_enabled: Option<bool>,
    #[serde(default)]
    pub dhcpd_start: Option<String>,
    #[serde(default)]
    pub dhcpd_stop: Option<String>,
    #[serde(default)]
    pub dhcpd_gateway: Option<String>,
    #[serde(default)]
    pub dhcpd_dns_1: Option<String>,
    #[serde(default)]
    pub dhcpd_dns_2: Option<String>,
    #[serde(default)]
    pub network_isolation: Option<bool>,
    #[serde(default)]
    pub internet_access_enabled: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Wireless network (SSID) definition from `rest/wlanconf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WlanConf {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub wpa_mode: Option<String>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    #[serde(default)]
    pub hide_ssid: Option<bool>,
    #[serde(default)]
    pub networkconf_id: Option<String>,
    #[serde(default)]
    pub usergroup_id: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Firewall ─────────────────────────────────────────────────────────

/// Firewall rule from `rest/firewallrule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRule {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Which chain the rule lives in, e.g. `WAN_IN` or `LAN_LOCAL`.
    #[serde(default)]
    pub ruleset: Option<String>,
    #[serde(default)]
    pub rule_index: Option<i64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub src_address: Option<String>,
    #[serde(default)]
    pub dst_address: Option<String>,
    #[serde(default)]
    pub dst_port: Option<String>,
    #[serde(default)]
    pub src_firewallgroup_ids: Vec<String>,
    #[serde(default)]
    pub dst_firewallgroup_ids: Vec<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Address/port group from `rest/firewallgroup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallGroup {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group_type: Option<String>,
    #[serde(default)]
    pub group_members: Vec<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Port forwarding rule from `rest/portforward`.
///
/// Port fields stay strings: the API stores ranges like `8000-8010`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortForward {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub dst_port: Option<String>,
    #[serde(default)]
    pub fwd: Option<String>,
    #[serde(default)]
    pub fwd_port: Option<String>,
    #[serde(default)]
    pub proto: Option<String>,
    #[serde(default)]
    pub pfwd_interface: Option<String>,
    #[serde(default)]
    pub log: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Events & alarms ──────────────────────────────────────────────────

/// Event object from `stat/event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub subsystem: Option<String>,
    /// Client alias, on client-related events.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Alarm object from `stat/alarm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Health ───────────────────────────────────────────────────────────

/// Per-subsystem health from `stat/health` (wan, lan, wlan, www, vpn).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSubsystem {
    pub subsystem: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub num_user: Option<i64>,
    #[serde(default)]
    pub num_guest: Option<i64>,
    #[serde(default)]
    pub num_ap: Option<i64>,
    #[serde(default)]
    pub num_sw: Option<i64>,
    #[serde(default)]
    pub num_adopted: Option<i64>,
    #[serde(default)]
    pub num_disconnected: Option<i64>,
    #[serde(default)]
    pub num_pending: Option<i64>,
    #[serde(default)]
    pub num_disabled: Option<i64>,
    #[serde(default)]
    pub wan_ip: Option<String>,
    #[serde(default)]
    pub gw_name: Option<String>,
    /// Seconds since the WAN link last came up.
    #[serde(default)]
    pub gw_wan_uptime: Option<i64>,
    #[serde(default, rename = "tx_bytes-r")]
    pub tx_bytes_r: Option<i64>,
    #[serde(default, rename = "rx_bytes-r")]
    pub rx_bytes_r: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Vouchers ─────────────────────────────────────────────────────────

/// Hotspot voucher from `stat/voucher`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    /// Epoch seconds.
    #[serde(default)]
    pub create_time: Option<i64>,
    /// Validity in minutes.
    #[serde(default)]
    pub duration: Option<i64>,
    /// How many devices may redeem the voucher.
    #[serde(default)]
    pub quota: Option<i64>,
    #[serde(default)]
    pub used: Option<i64>,
    /// Data quota in MB, when limited.
    #[serde(default)]
    pub qos_usage_quota: Option<i64>,
    #[serde(default)]
    pub qos_rate_max_up: Option<i64>,
    #[serde(default)]
    pub qos_rate_max_down: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Parameters for minting vouchers via `cmd/hotspot`.
///
/// Zero means "unlimited" for the quota and rate fields, mirroring what
/// the controller UI does.
#[derive(Debug, Clone)]
pub struct VoucherSpec {
    /// How many vouchers to mint.
    pub count: u32,
    /// Validity in minutes.
    pub duration_minutes: u32,
    /// Data quota in MB (0 = unlimited).
    pub quota_mb: u32,
    /// Upload cap in kbps (0 = unlimited).
    pub up_kbps: u32,
    /// Download cap in kbps (0 = unlimited).
    pub down_kbps: u32,
    /// Redemptions allowed per voucher.
    pub multi_use: u32,
    pub note: Option<String>,
}

impl Default for VoucherSpec {
    fn default() -> Self {
        Self {
            count: 1,
            duration_minutes: 1440,
            quota_mb: 0,
            up_kbps: 0,
            down_kbps: 0,
            multi_use: 1,
            note: None,
        }
    }
}

// ── DPI & traffic reports ────────────────────────────────────────────

/// One deep packet inspection usage record.
///
/// `app` and `cat` arrive as names on some firmware lines and numeric
/// codes on others, so both stay as raw values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DpiUsage {
    #[serde(default)]
    pub app: Option<Value>,
    #[serde(default)]
    pub cat: Option<Value>,
    #[serde(default)]
    pub rx_bytes: Option<i64>,
    #[serde(default)]
    pub tx_bytes: Option<i64>,
    /// Set on per-client records.
    #[serde(default)]
    pub mac: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl DpiUsage {
    /// Application key as a string, whichever form the controller sent.
    pub fn app_key(&self) -> Option<String> {
        value_key(self.app.as_ref())
    }

    /// Category key as a string, whichever form the controller sent.
    pub fn cat_key(&self) -> Option<String> {
        value_key(self.cat.as_ref())
    }
}

fn value_key(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// One row of a site traffic report.
///
/// Aggregated counters come back as floats on most firmware, so the
/// byte fields are `f64` even though raw counters are integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Epoch milliseconds for the start of the interval.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub rx_bytes: Option<f64>,
    #[serde(default)]
    pub tx_bytes: Option<f64>,
    #[serde(default)]
    pub num_sta: Option<f64>,
    #[serde(default, rename = "wan-rx_bytes")]
    pub wan_rx_bytes: Option<f64>,
    #[serde(default, rename = "wan-tx_bytes")]
    pub wan_tx_bytes: Option<f64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Running configuration ────────────────────────────────────────────

/// Point-in-time snapshot of the site's configuration surface.
///
/// Sections the controller refuses to serve (endpoint missing on old
/// firmware, feature disabled) come back empty rather than failing the
/// whole snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunningConfig {
    pub networks: Vec<NetworkConf>,
    pub wireless: Vec<WlanConf>,
    pub firewall_rules: Vec<FirewallRule>,
    pub firewall_groups: Vec<FirewallGroup>,
    pub port_forwards: Vec<PortForward>,
    pub devices: Vec<Device>,
    pub dhcp_reservations: Vec<ClientEntry>,
    pub traffic_rules: Vec<Value>,
    pub routing: Vec<Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_entry_tolerates_sparse_records() {
        let entry: ClientEntry = serde_json::from_value(json!({
            "_id": "abc",
            "mac": "aa:bb:cc:dd:ee:ff",
        }))
        .unwrap();
        assert!(entry.name.is_none());
        assert!(entry.extra.is_empty());
        assert_eq!(entry.display_name(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn client_entry_keeps_unknown_fields() {
        let entry: ClientEntry = serde_json::from_value(json!({
            "_id": "abc",
            "mac": "aa:bb:cc:dd:ee:ff",
            "dev_cat": 9,
            "fingerprint_source": 1,
        }))
        .unwrap();
        assert_eq!(entry.extra.get("dev_cat"), Some(&json!(9)));

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back.get("fingerprint_source"), Some(&json!(1)));
    }

    #[test]
    fn display_name_prefers_alias_then_hostname() {
        let named: ClientEntry = serde_json::from_value(json!({
            "_id": "a", "mac": "aa:bb:cc:dd:ee:ff",
            "name": "phone", "hostname": "android-1",
        }))
        .unwrap();
        assert_eq!(named.display_name(), "phone");

        let hostname_only: ClientEntry = serde_json::from_value(json!({
            "_id": "a", "mac": "aa:bb:cc:dd:ee:ff",
            "name": "", "hostname": "android-1",
        }))
        .unwrap();
        assert_eq!(hostname_only.display_name(), "android-1");
    }

    #[test]
    fn device_maps_renamed_fields() {
        let device: Device = serde_json::from_value(json!({
            "_id": "d1",
            "mac": "00:11:22:33:44:55",
            "type": "uap",
            "state": 1,
            "user-num_sta": 7,
            "sys_stats": { "loadavg_1": "0.52" },
        }))
        .unwrap();
        assert_eq!(device.device_type.as_deref(), Some("uap"));
        assert_eq!(device.user_num_sta, Some(7));
        assert_eq!(
            device.sys_stats.unwrap().load_1.as_deref(),
            Some("0.52")
        );
    }

    #[test]
    fn health_maps_rate_suffixed_fields() {
        let health: HealthSubsystem = serde_json::from_value(json!({
            "subsystem": "wan",
            "status": "ok",
            "tx_bytes-r": 1024,
            "rx_bytes-r": 2048,
        }))
        .unwrap();
        assert_eq!(health.tx_bytes_r, Some(1024));
        assert_eq!(health.rx_bytes_r, Some(2048));
    }

    #[test]
    fn voucher_spec_defaults_match_controller_ui() {
        let spec = VoucherSpec::default();
        assert_eq!(spec.count, 1);
        assert_eq!(spec.duration_minutes, 1440);
        assert_eq!(spec.multi_use, 1);
        assert_eq!(spec.quota_mb, 0);
    }
}

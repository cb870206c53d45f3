//! Controller running-configuration views.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::RunningConfig;

use crate::cli::{ConfigArgs, ConfigCommand, ConfigSection, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Key fragments that mark a field as sensitive.
const SECRET_MARKERS: [&str; 4] = ["password", "secret", "x_passphrase", "wpa_psk"];

// ── Secret redaction ────────────────────────────────────────────────

/// Replace secret-bearing fields with a placeholder, recursively.
fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, entry) in map.iter_mut() {
                let lower = key.to_lowercase();
                if SECRET_MARKERS.iter().any(|m| lower.contains(m)) {
                    *entry = Value::String("********".into());
                } else {
                    redact(entry);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                redact(item);
            }
        }
        _ => {}
    }
}

// ── Snapshot rendering ──────────────────────────────────────────────

fn section_keys(section: ConfigSection) -> &'static [&'static str] {
    match section {
        ConfigSection::Networks => &["networks"],
        ConfigSection::Wireless => &["wireless"],
        ConfigSection::Firewall => &["firewall_rules", "firewall_groups"],
        ConfigSection::Portfwd => &["port_forwards"],
        ConfigSection::Devices => &["devices"],
        ConfigSection::Dhcp => &["dhcp_reservations"],
        ConfigSection::Routing => &["routing"],
    }
}

/// Fetch only what the requested section needs; the full snapshot walks
/// every endpoint.
async fn fetch_snapshot(
    client: &LocalClient,
    section: Option<ConfigSection>,
) -> Result<RunningConfig, CliError> {
    let config = match section {
        None => client.get_running_config().await?,
        Some(ConfigSection::Networks) => RunningConfig {
            networks: client.get_networks().await?,
            ..RunningConfig::default()
        },
        Some(ConfigSection::Wireless) => RunningConfig {
            wireless: client.get_wlans().await?,
            ..RunningConfig::default()
        },
        Some(ConfigSection::Firewall) => RunningConfig {
            firewall_rules: client.get_firewall_rules().await?,
            firewall_groups: client.get_firewall_groups().await?,
            ..RunningConfig::default()
        },
        Some(ConfigSection::Portfwd) => RunningConfig {
            port_forwards: client.get_port_forwards().await?,
            ..RunningConfig::default()
        },
        Some(ConfigSection::Devices) => RunningConfig {
            devices: client.get_devices().await?,
            ..RunningConfig::default()
        },
        Some(ConfigSection::Dhcp) => RunningConfig {
            dhcp_reservations: client.get_dhcp_reservations().await?,
            ..RunningConfig::default()
        },
        Some(ConfigSection::Routing) => RunningConfig {
            routing: client.get_routing().await?,
            ..RunningConfig::default()
        },
    };
    Ok(config)
}

fn summary(config: &RunningConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Running configuration");
    let _ = writeln!(out);
    let counts = [
        ("Networks", config.networks.len()),
        ("Wireless SSIDs", config.wireless.len()),
        ("Firewall rules", config.firewall_rules.len()),
        ("Firewall groups", config.firewall_groups.len()),
        ("Port forwards", config.port_forwards.len()),
        ("Devices", config.devices.len()),
        ("DHCP reservations", config.dhcp_reservations.len()),
        ("Traffic rules", config.traffic_rules.len()),
        ("Static routes", config.routing.len()),
    ];
    for (label, count) in counts {
        let _ = writeln!(out, "  {label:<18} {count}");
    }
    let _ = writeln!(out);
    let _ = write!(out, "Use -o yaml or -o json for the full dump.");
    out
}

fn render_snapshot(
    config: &RunningConfig,
    section: Option<ConfigSection>,
    show_secrets: bool,
    global: &GlobalOpts,
) {
    let mut value = serde_json::to_value(config).expect("serialization should not fail");
    if !show_secrets {
        redact(&mut value);
    }
    if let Some(section) = section {
        if let Value::Object(map) = &mut value {
            let keys = section_keys(section);
            map.retain(|k, _| keys.contains(&k.as_str()));
        }
    }

    let out = match global.output {
        OutputFormat::Json => output::render_json(&value, false),
        OutputFormat::JsonCompact => output::render_json(&value, true),
        // The snapshot has no tabular shape: the full view gets a
        // per-section summary, everything else renders as YAML.
        OutputFormat::Table if section.is_none() => summary(config),
        _ => output::render_yaml(&value),
    };
    output::print_output(&out, global.quiet);
}

// ── Table rows for routes / traffic rules / settings ────────────────

#[derive(Tabled, Serialize)]
struct RouteRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Next Hop")]
    next_hop: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&Value> for RouteRow {
    fn from(v: &Value) -> Self {
        Self {
            name: str_field(v, "name"),
            destination: str_field(v, "static_route_network"),
            next_hop: if str_field(v, "static_route_nexthop").is_empty() {
                str_field(v, "static_route_interface")
            } else {
                str_field(v, "static_route_nexthop")
            },
            enabled: yes_no(v.get("enabled").and_then(Value::as_bool).unwrap_or(true)),
        }
    }
}

#[derive(Tabled, Serialize)]
struct TrafficRuleRow {
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&Value> for TrafficRuleRow {
    fn from(v: &Value) -> Self {
        Self {
            description: str_field(v, "description"),
            action: str_field(v, "action").to_uppercase(),
            target: str_field(v, "matching_target"),
            enabled: yes_no(v.get("enabled").and_then(Value::as_bool).unwrap_or(true)),
        }
    }
}

#[derive(Tabled, Serialize)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    key: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&Value> for SettingRow {
    fn from(v: &Value) -> Self {
        Self {
            key: str_field(v, "key"),
            enabled: v
                .get("enabled")
                .and_then(Value::as_bool)
                .map_or_else(|| "-".to_string(), yes_no),
        }
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn yes_no(flag: bool) -> String {
    if flag { "yes".into() } else { "no".into() }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &LocalClient,
    args: ConfigArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show {
            section,
            show_secrets,
        } => {
            let config = fetch_snapshot(client, section).await?;
            render_snapshot(&config, section, show_secrets, global);
            Ok(())
        }

        ConfigCommand::Routes => {
            let routes = client.get_routing().await?;
            let out = output::render_list(&global.output, &routes, |v| RouteRow::from(v), |v| {
                str_field(v, "name")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::TrafficRules => {
            let rules = client.get_traffic_rules().await?;
            let out = output::render_list(&global.output, &rules, |v| TrafficRuleRow::from(v), |v| {
                str_field(v, "description")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Settings => {
            let settings = client.get_site_settings().await?;
            let out = output::render_list(&global.output, &settings, |v| SettingRow::from(v), |v| {
                str_field(v, "key")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

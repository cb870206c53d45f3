//! Site health summary.
//!
//! The table view is hand-rendered rather than going through `tabled`:
//! it mixes colored status dots with a trailing notes section, neither
//! of which fits a uniform grid.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::HealthSubsystem;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Row for csv/plain ───────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct HealthRow {
    #[tabled(rename = "Subsystem")]
    subsystem: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Clients")]
    clients: String,
    #[tabled(rename = "Adopted")]
    adopted: String,
    #[tabled(rename = "Disconnected")]
    disconnected: String,
}

impl From<&HealthSubsystem> for HealthRow {
    fn from(h: &HealthSubsystem) -> Self {
        Self {
            subsystem: subsystem_name(&h.subsystem),
            status: h.status.clone().unwrap_or_default(),
            clients: h.num_user.map(|n| n.to_string()).unwrap_or_default(),
            adopted: h.num_adopted.map(|n| n.to_string()).unwrap_or_default(),
            disconnected: h
                .num_disconnected
                .map(|n| n.to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Formatting helpers ──────────────────────────────────────────────

/// Display names for the controller's subsystem keys.
fn subsystem_name(key: &str) -> String {
    match key.to_lowercase().as_str() {
        "www" => "Internet".into(),
        "wan" => "WAN".into(),
        "lan" => "LAN".into(),
        "wlan" => "WLAN".into(),
        "vpn" => "VPN".into(),
        "speedtest" => "Speed Test".into(),
        "dhcp" => "DHCP".into(),
        "dns" => "DNS".into(),
        other => other.to_uppercase(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Severity {
    Ok,
    Unknown,
    Warning,
    Error,
}

fn severity(status: Option<&str>) -> Severity {
    match status.map(str::to_lowercase).as_deref() {
        Some("ok") => Severity::Ok,
        Some("warning" | "warn") => Severity::Warning,
        Some("error" | "critical" | "unhealthy") => Severity::Error,
        _ => Severity::Unknown,
    }
}

fn status_dot(sev: Severity, colored: bool) -> String {
    if !colored {
        return match sev {
            Severity::Unknown => "○".to_string(),
            _ => "●".to_string(),
        };
    }
    match sev {
        Severity::Ok => format!("{}", "●".green()),
        Severity::Warning => format!("{}", "●".yellow()),
        Severity::Error => format!("{}", "●".red()),
        Severity::Unknown => "○".to_string(),
    }
}

fn details(h: &HealthSubsystem) -> String {
    let mut parts = Vec::new();
    if let Some(n) = h.num_user {
        parts.push(format!("{n} clients"));
    }
    if let Some(n) = h.num_ap {
        parts.push(format!("{n} APs"));
    }
    if let Some(n) = h.num_sw {
        parts.push(format!("{n} switches"));
    }
    if let Some(ip) = &h.wan_ip {
        parts.push(format!("WAN {ip}"));
    }
    if let (Some(tx), Some(rx)) = (h.tx_bytes_r, h.rx_bytes_r) {
        let tx_mb = tx as f64 / 1_048_576.0;
        let rx_mb = rx as f64 / 1_048_576.0;
        parts.push(format!("↑{tx_mb:.1} ↓{rx_mb:.1} MB/s"));
    }
    parts.join(", ")
}

/// Anything out of the ordinary in the health payload, one line each.
fn extract_issues(health: &[HealthSubsystem]) -> Vec<String> {
    let mut issues = Vec::new();

    for sub in health {
        let name = subsystem_name(&sub.subsystem);
        let key = sub.subsystem.to_lowercase();

        if let Some(n) = sub.num_disconnected.filter(|n| *n > 0) {
            let what = match key.as_str() {
                "lan" => "switch(es)",
                "wlan" => "AP(s)",
                "wan" => "gateway(s)",
                _ => "device(s)",
            };
            issues.push(format!("{name}: {n} {what} disconnected"));
        }

        if let Some(n) = sub.num_pending.filter(|n| *n > 0) {
            issues.push(format!("{name}: {n} device(s) pending adoption"));
        }

        if key == "wlan" {
            if let Some(n) = sub.num_disabled.filter(|n| *n > 0) {
                issues.push(format!("WLAN: {n} AP(s) disabled"));
            }
        }

        if key == "wan" {
            if let Some(up) = sub.gw_wan_uptime.filter(|up| *up < 3600) {
                issues.push(format!("WAN: link restored {} min ago", up / 60));
            }
        }

        if key == "lan" {
            let num_sw = sub.num_sw.unwrap_or(0);
            let adopted = sub.num_adopted.unwrap_or(0);
            if num_sw > 0 && adopted < num_sw {
                issues.push(format!("LAN: {} switch(es) not adopted", num_sw - adopted));
            }
        }
    }

    issues
}

fn render_health(health: &[HealthSubsystem], colored: bool) -> String {
    let mut out = String::new();
    let mut worst = Severity::Ok;

    let _ = writeln!(out, "Site Health");
    let _ = writeln!(out);

    for sub in health {
        let sev = severity(sub.status.as_deref());
        worst = worst.max(sev);

        let dot = status_dot(sev, colored);
        let name = subsystem_name(&sub.subsystem);
        let status = sub
            .status
            .as_deref()
            .unwrap_or("unknown")
            .to_uppercase();
        let detail = details(sub);

        if detail.is_empty() {
            let _ = writeln!(out, "  {dot} {name:<12} {status}");
        } else {
            let _ = writeln!(out, "  {dot} {name:<12} {status:<10} {detail}");
        }
    }

    let _ = writeln!(out);
    let overall = match worst {
        Severity::Error => "issues detected",
        Severity::Warning => "warnings",
        _ => "healthy",
    };
    let _ = writeln!(out, "  Overall: {overall}");

    let issues = extract_issues(health);
    if !issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Notes:");
        for issue in &issues {
            let _ = writeln!(out, "  - {issue}");
        }
    }

    out.trim_end().to_string()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &LocalClient, global: &GlobalOpts) -> Result<(), CliError> {
    let health = client.get_health().await?;

    if matches!(global.output, OutputFormat::Table) {
        let colored = output::should_color(&global.color);
        output::print_output(&render_health(&health, colored), global.quiet);
    } else {
        let out = output::render_list(&global.output, &health, |h| HealthRow::from(h), |h| {
            subsystem_name(&h.subsystem)
        });
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn subsystem(value: serde_json::Value) -> HealthSubsystem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn subsystem_names_follow_the_controller_ui() {
        assert_eq!(subsystem_name("www"), "Internet");
        assert_eq!(subsystem_name("wlan"), "WLAN");
        assert_eq!(subsystem_name("speedtest"), "Speed Test");
        assert_eq!(subsystem_name("sdwan"), "SDWAN");
    }

    #[test]
    fn severity_buckets_by_status_string() {
        assert_eq!(severity(Some("ok")), Severity::Ok);
        assert_eq!(severity(Some("WARNING")), Severity::Warning);
        assert_eq!(severity(Some("critical")), Severity::Error);
        assert_eq!(severity(None), Severity::Unknown);
    }

    #[test]
    fn issues_cover_disconnects_and_pending_adoption() {
        let health = vec![
            subsystem(json!({
                "subsystem": "wlan",
                "status": "warning",
                "num_disconnected": 2,
                "num_disabled": 1,
            })),
            subsystem(json!({
                "subsystem": "lan",
                "status": "ok",
                "num_sw": 3,
                "num_adopted": 2,
                "num_pending": 1,
            })),
        ];
        let issues = extract_issues(&health);
        assert!(issues.contains(&"WLAN: 2 AP(s) disconnected".to_string()));
        assert!(issues.contains(&"WLAN: 1 AP(s) disabled".to_string()));
        assert!(issues.contains(&"LAN: 1 device(s) pending adoption".to_string()));
        assert!(issues.contains(&"LAN: 1 switch(es) not adopted".to_string()));
    }

    #[test]
    fn render_rolls_up_the_worst_status() {
        let health = vec![
            subsystem(json!({"subsystem": "www", "status": "ok"})),
            subsystem(json!({"subsystem": "wan", "status": "error"})),
        ];
        let out = render_health(&health, false);
        assert!(out.contains("Overall: issues detected"));
        assert!(out.contains("Internet"));
    }

    #[test]
    fn render_layout_without_color() {
        let health = vec![
            subsystem(json!({"subsystem": "www", "status": "ok"})),
            subsystem(json!({"subsystem": "wan", "status": "error"})),
        ];
        let expected = "\
Site Health

  ● Internet     OK
  ● WAN          ERROR

  Overall: issues detected";
        assert_eq!(render_health(&health, false), expected);
    }
}

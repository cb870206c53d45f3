//! Deep packet inspection breakdowns.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::DpiUsage;

use crate::cli::{DpiArgs, DpiCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

/// Category names for the controller's numeric DPI category codes.
const CATEGORIES: &[(i64, &str)] = &[
    (0, "Instant Messaging"),
    (1, "P2P"),
    (2, "File Transfer"),
    (3, "Streaming Media"),
    (4, "Mail & Collaboration"),
    (5, "VoIP"),
    (6, "Database"),
    (7, "Games"),
    (8, "Network Management"),
    (9, "Remote Access"),
    (10, "Bypass Proxies"),
    (11, "Stock Market"),
    (12, "Web"),
    (13, "Security Update"),
    (14, "E-Commerce"),
    (15, "Social Network"),
    (16, "News"),
    (18, "Business"),
    (19, "Network Protocol"),
    (20, "VPN & Tunneling"),
    (21, "IoT"),
];

/// Friendly names for application keys the controller reports as strings.
const APP_NAMES: &[(&str, &str)] = &[
    ("youtube", "YouTube"),
    ("netflix", "Netflix"),
    ("amazonvideo", "Amazon Video"),
    ("hulu", "Hulu"),
    ("twitch", "Twitch"),
    ("spotify", "Spotify"),
    ("appletv", "Apple TV+"),
    ("disneyplus", "Disney+"),
    ("facebook", "Facebook"),
    ("instagram", "Instagram"),
    ("twitter", "Twitter/X"),
    ("tiktok", "TikTok"),
    ("snapchat", "Snapchat"),
    ("whatsapp", "WhatsApp"),
    ("discord", "Discord"),
    ("telegram", "Telegram"),
    ("microsoft", "Microsoft"),
    ("office365", "Office 365"),
    ("teams", "MS Teams"),
    ("zoom", "Zoom"),
    ("slack", "Slack"),
    ("dropbox", "Dropbox"),
    ("gdrive", "Google Drive"),
    ("aws", "AWS"),
    ("azure", "Azure"),
    ("googlecloud", "Google Cloud"),
    ("icloud", "iCloud"),
    ("apple", "Apple"),
    ("google", "Google"),
    ("amazon", "Amazon"),
];

// ── Aggregation ─────────────────────────────────────────────────────

/// DPI usage summed per application (or category when no app is set).
#[derive(Debug, Serialize)]
struct UsageSummary {
    name: String,
    rx_bytes: i64,
    tx_bytes: i64,
    total_bytes: i64,
    client_count: usize,
}

fn app_display(key: &str) -> String {
    let lower = key.to_lowercase();
    if let Some((_, name)) = APP_NAMES.iter().find(|(k, _)| lower == *k) {
        return (*name).to_string();
    }
    if let Some((_, name)) = APP_NAMES.iter().find(|(k, _)| lower.contains(k)) {
        return (*name).to_string();
    }
    title_case(key)
}

fn category_display(key: &str) -> String {
    if let Ok(code) = key.parse::<i64>() {
        return CATEGORIES
            .iter()
            .find(|(c, _)| *c == code)
            .map_or_else(|| format!("Category {code}"), |(_, name)| (*name).to_string());
    }
    title_case(key)
}

fn title_case(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sum usage records per application, falling back to category for
/// records without one, sorted by total traffic descending.
fn aggregate(records: &[DpiUsage], limit: usize) -> Vec<UsageSummary> {
    struct Bucket {
        name: String,
        rx_bytes: i64,
        tx_bytes: i64,
        clients: BTreeSet<String>,
    }

    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

    for record in records {
        let (key, name) = if let Some(app) = record.app_key() {
            (format!("app_{app}"), app_display(&app))
        } else if let Some(cat) = record.cat_key() {
            (format!("cat_{cat}"), category_display(&cat))
        } else {
            continue;
        };

        let bucket = buckets.entry(key).or_insert_with(|| Bucket {
            name,
            rx_bytes: 0,
            tx_bytes: 0,
            clients: BTreeSet::new(),
        });
        bucket.rx_bytes += record.rx_bytes.unwrap_or(0);
        bucket.tx_bytes += record.tx_bytes.unwrap_or(0);
        if let Some(mac) = &record.mac {
            bucket.clients.insert(mac.clone());
        }
    }

    let mut summaries: Vec<UsageSummary> = buckets
        .into_values()
        .map(|b| UsageSummary {
            name: b.name,
            rx_bytes: b.rx_bytes,
            tx_bytes: b.tx_bytes,
            total_bytes: b.rx_bytes + b.tx_bytes,
            client_count: b.clients.len(),
        })
        .collect();
    summaries.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));
    summaries.truncate(limit);
    summaries
}

// ── Rendering ───────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct DpiRow {
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Download")]
    download: String,
    #[tabled(rename = "Upload")]
    upload: String,
    #[tabled(rename = "Clients")]
    clients: String,
}

impl From<&UsageSummary> for DpiRow {
    fn from(u: &UsageSummary) -> Self {
        Self {
            application: u.name.clone(),
            download: util::format_bytes(u.rx_bytes as f64),
            upload: util::format_bytes(u.tx_bytes as f64),
            clients: if u.client_count > 0 {
                u.client_count.to_string()
            } else {
                "-".to_string()
            },
        }
    }
}

fn render(usage: &[UsageSummary], global: &GlobalOpts) {
    let mut out = output::render_list(&global.output, usage, |u| DpiRow::from(u), |u| u.name.clone());
    if matches!(global.output, OutputFormat::Table) {
        let total_rx: i64 = usage.iter().map(|u| u.rx_bytes).sum();
        let total_tx: i64 = usage.iter().map(|u| u.tx_bytes).sum();
        out.push_str(&format!(
            "\nTotal: {} down, {} up",
            util::format_bytes(total_rx as f64),
            util::format_bytes(total_tx as f64)
        ));
    }
    output::print_output(&out, global.quiet);
}

/// Whether the "Traffic Identification" toggle is on, best effort.
async fn dpi_enabled(client: &LocalClient) -> bool {
    let Ok(settings) = client.get_site_settings().await else {
        return true;
    };
    settings
        .iter()
        .find(|s| s.get("key").and_then(Value::as_str) == Some("dpi"))
        .and_then(|s| s.get("dpi_enabled").and_then(Value::as_bool))
        .unwrap_or(false)
}

async fn report_empty(client: &LocalClient, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    if dpi_enabled(client).await {
        eprintln!("No DPI data collected yet");
    } else {
        eprintln!("DPI is not enabled on this controller");
        eprintln!("Enable Traffic Identification in the network settings to collect DPI data.");
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &LocalClient,
    args: DpiArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DpiCommand::Site { limit } => {
            let records = client.get_site_dpi().await?;
            let usage = aggregate(&records, limit);
            if usage.is_empty() {
                report_empty(client, global).await;
                return Ok(());
            }
            render(&usage, global);
            Ok(())
        }

        DpiCommand::Client {
            client: identifier,
            limit,
        } => {
            let mac = util::resolve_client_mac(client, &identifier).await?;
            let records = client.get_client_dpi(&mac).await?;
            let usage = aggregate(&records, limit);
            if usage.is_empty() {
                report_empty(client, global).await;
                return Ok(());
            }
            render(&usage, global);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> DpiUsage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn aggregate_groups_by_app_and_sorts_by_total() {
        let records = vec![
            record(json!({"app": "youtube", "rx_bytes": 100, "tx_bytes": 10, "mac": "aa:bb:cc:dd:ee:01"})),
            record(json!({"app": "youtube", "rx_bytes": 200, "tx_bytes": 20, "mac": "aa:bb:cc:dd:ee:02"})),
            record(json!({"app": "zoom", "rx_bytes": 5000, "tx_bytes": 500})),
        ];
        let usage = aggregate(&records, 10);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].name, "Zoom");
        assert_eq!(usage[1].name, "YouTube");
        assert_eq!(usage[1].rx_bytes, 300);
        assert_eq!(usage[1].client_count, 2);
    }

    #[test]
    fn aggregate_falls_back_to_category_codes() {
        let records = vec![
            record(json!({"cat": 3, "rx_bytes": 42})),
            record(json!({"cat": 99, "rx_bytes": 1})),
        ];
        let usage = aggregate(&records, 10);
        assert_eq!(usage[0].name, "Streaming Media");
        assert_eq!(usage[1].name, "Category 99");
    }

    #[test]
    fn aggregate_honors_the_limit() {
        let records: Vec<DpiUsage> = (0..5)
            .map(|i| record(json!({"app": format!("app{i}"), "rx_bytes": i * 100})))
            .collect();
        assert_eq!(aggregate(&records, 2).len(), 2);
    }

    #[test]
    fn unknown_apps_get_title_cased() {
        assert_eq!(app_display("some_obscure_tool"), "Some Obscure Tool");
        assert_eq!(app_display("NETFLIX"), "Netflix");
    }
}

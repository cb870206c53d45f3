//! Site traffic reports.

use chrono::DateTime;
use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::ReportEntry;

use crate::cli::{GlobalOpts, OutputFormat, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled, Serialize)]
struct StatRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Download")]
    download: String,
    #[tabled(rename = "Upload")]
    upload: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Clients")]
    clients: String,
}

impl StatRow {
    fn new(entry: &ReportEntry, include_time: bool) -> Self {
        let (rx, tx) = traffic_bytes(entry);
        let clients = entry.num_sta.unwrap_or(0.0);
        Self {
            time: entry
                .time
                .map_or_else(|| "-".to_string(), |t| format_report_time(t, include_time)),
            download: util::format_bytes(rx),
            upload: util::format_bytes(tx),
            total: util::format_bytes(rx + tx),
            clients: if clients > 0.0 {
                format!("{clients:.0}")
            } else {
                "-".to_string()
            },
        }
    }
}

/// Download/upload for one interval, preferring the WAN counters when
/// the controller reports them.
fn traffic_bytes(entry: &ReportEntry) -> (f64, f64) {
    let rx = entry
        .wan_rx_bytes
        .filter(|v| *v != 0.0)
        .or(entry.rx_bytes)
        .unwrap_or(0.0);
    let tx = entry
        .wan_tx_bytes
        .filter(|v| *v != 0.0)
        .or(entry.tx_bytes)
        .unwrap_or(0.0);
    (rx, tx)
}

/// Report timestamps arrive as epoch milliseconds on current firmware
/// and epoch seconds on some older lines.
fn format_report_time(ts: i64, include_time: bool) -> String {
    let secs = if ts > 1_000_000_000_000 { ts / 1000 } else { ts };
    let Some(dt) = DateTime::from_timestamp(secs, 0) else {
        return ts.to_string();
    };
    if include_time {
        dt.format("%Y-%m-%d %H:%M").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

fn render_stats(mut entries: Vec<ReportEntry>, include_time: bool, global: &GlobalOpts) {
    // newest first
    entries.sort_by_key(|e| std::cmp::Reverse(e.time.unwrap_or(0)));

    let mut out = output::render_list(
        &global.output,
        &entries,
        |e| StatRow::new(e, include_time),
        |e| e.time.map_or_else(|| "-".to_string(), |t| format_report_time(t, include_time)),
    );

    if matches!(global.output, OutputFormat::Table) {
        let (total_rx, total_tx) = entries.iter().map(traffic_bytes).fold(
            (0.0_f64, 0.0_f64),
            |(rx_acc, tx_acc), (rx, tx)| (rx_acc + rx, tx_acc + tx),
        );
        out.push_str(&format!(
            "\nTotal: {} down, {} up ({} total)",
            util::format_bytes(total_rx),
            util::format_bytes(total_tx),
            util::format_bytes(total_rx + total_tx)
        ));
    }
    output::print_output(&out, global.quiet);
}

pub async fn handle(
    client: &LocalClient,
    args: StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StatsCommand::Daily { days } => {
            let entries = client.get_daily_stats(days).await?;
            if entries.is_empty() {
                if !global.quiet {
                    eprintln!("No daily statistics available");
                }
                return Ok(());
            }
            render_stats(entries, false, global);
            Ok(())
        }

        StatsCommand::Hourly { hours } => {
            let entries = client.get_hourly_stats(hours).await?;
            if entries.is_empty() {
                if !global.quiet {
                    eprintln!("No hourly statistics available");
                }
                return Ok(());
            }
            render_stats(entries, true, global);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> ReportEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn wan_counters_win_over_site_counters() {
        let e = entry(json!({
            "rx_bytes": 100.0,
            "tx_bytes": 200.0,
            "wan-rx_bytes": 1000.0,
            "wan-tx_bytes": 2000.0,
        }));
        assert_eq!(traffic_bytes(&e), (1000.0, 2000.0));
    }

    #[test]
    fn zero_wan_counters_fall_back_to_site_counters() {
        let e = entry(json!({
            "rx_bytes": 100.0,
            "tx_bytes": 200.0,
            "wan-rx_bytes": 0.0,
        }));
        assert_eq!(traffic_bytes(&e), (100.0, 200.0));
    }

    #[test]
    fn report_time_handles_millis_and_seconds() {
        assert_eq!(format_report_time(1_700_000_000_000, false), "2023-11-14");
        assert_eq!(format_report_time(1_700_000_000, false), "2023-11-14");
        assert_eq!(format_report_time(1_700_000_000_000, true), "2023-11-14 22:13");
    }
}

//! Shared helpers for command handlers.

use uninet_api::{LocalClient, MacAddress};

use crate::error::CliError;

/// Resolve a client identifier (MAC in any format, or a name) to a MAC.
///
/// Names are matched against the connected-client list: exact alias or
/// hostname match first (case-insensitive), then substring match. A
/// substring hitting several clients is an error listing the candidates.
pub async fn resolve_client_mac(
    client: &LocalClient,
    identifier: &str,
) -> Result<MacAddress, CliError> {
    if MacAddress::looks_like(identifier) {
        return Ok(MacAddress::new(identifier));
    }

    let needle = identifier.to_lowercase();
    let clients = client.list_clients().await?;

    let exact = clients.iter().find(|c| {
        c.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(identifier))
            || c.hostname.as_deref().is_some_and(|h| h.eq_ignore_ascii_case(identifier))
    });
    if let Some(c) = exact {
        return Ok(MacAddress::new(&c.mac));
    }

    let partial: Vec<_> = clients
        .iter()
        .filter(|c| c.display_name().to_lowercase().contains(&needle))
        .collect();

    match partial.as_slice() {
        [] => Err(CliError::NotFound {
            resource_type: "client".into(),
            identifier: identifier.into(),
            list_command: "clients list".into(),
        }),
        [only] => Ok(MacAddress::new(&only.mac)),
        many => Err(CliError::Ambiguous {
            resource_type: "client".into(),
            identifier: identifier.into(),
            matches: many
                .iter()
                .map(|c| format!("{} ({})", c.display_name(), c.mac))
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Resolve a device identifier (MAC in any format, or a name) to a MAC.
pub async fn resolve_device_mac(
    client: &LocalClient,
    identifier: &str,
) -> Result<MacAddress, CliError> {
    if MacAddress::looks_like(identifier) {
        return Ok(MacAddress::new(identifier));
    }

    let needle = identifier.to_lowercase();
    let devices = client.get_devices().await?;

    let exact = devices
        .iter()
        .find(|d| d.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(identifier)));
    if let Some(d) = exact {
        return Ok(MacAddress::new(&d.mac));
    }

    let partial: Vec<_> = devices
        .iter()
        .filter(|d| {
            d.name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
        })
        .collect();

    match partial.as_slice() {
        [] => Err(CliError::NotFound {
            resource_type: "device".into(),
            identifier: identifier.into(),
            list_command: "devices list".into(),
        }),
        [only] => Ok(MacAddress::new(&only.mac)),
        many => Err(CliError::Ambiguous {
            resource_type: "device".into(),
            identifier: identifier.into(),
            matches: many
                .iter()
                .map(|d| {
                    format!("{} ({})", d.name.as_deref().unwrap_or("unnamed"), d.mac)
                })
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Turn a controller `rc` answer into a result: `false` means the command
/// was delivered but refused.
pub fn require_ok(ok: bool, action: &str) -> Result<(), CliError> {
    if ok {
        Ok(())
    } else {
        Err(CliError::Rejected {
            action: action.into(),
        })
    }
}

/// Human-readable uptime: `3d 4h`, `4h 27m`, `27m`, `45s`.
pub fn format_uptime(seconds: i64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

/// Link rate in Mbps from the controller's kbps figure.
pub fn format_rate(kbps: i64) -> String {
    format!("{:.0} Mbps", kbps as f64 / 1000.0)
}

/// Byte count in the closest unit: `0 B`, `512 B`, `1.5 KB`, `2.3 GB`.
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes <= 0.0 {
        return "0 B".to_string();
    }
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{value:.0} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_picks_the_right_unit() {
        assert_eq!(format_uptime(45), "45s");
        assert_eq!(format_uptime(150), "2m");
        assert_eq!(format_uptime(3 * 3600 + 62 * 60), "4h 2m");
        assert_eq!(format_uptime(2 * 86400 + 5 * 3600), "2d 5h");
    }

    #[test]
    fn rate_rounds_to_whole_mbps() {
        assert_eq!(format_rate(866_700), "867 Mbps");
        assert_eq!(format_rate(1000), "1 Mbps");
    }

    #[test]
    fn bytes_climb_the_unit_ladder() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1536.0), "1.5 KB");
        assert_eq!(format_bytes(2.5 * 1024.0 * 1024.0 * 1024.0), "2.5 GB");
    }
}

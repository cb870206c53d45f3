//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;
use uninet_api::models::Device;
use uninet_api::{LocalClient, MacAddress};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            name: d.name.clone().unwrap_or_default(),
            model: d.model.clone().unwrap_or_default(),
            kind: device_type(d).to_string(),
            ip: d.ip.clone().unwrap_or_default(),
            mac: d.mac.to_uppercase(),
            version: d.version.clone().unwrap_or_default(),
            status: device_status(d.state).to_string(),
            uptime: d.uptime.map(util::format_uptime).unwrap_or_default(),
        }
    }
}

/// Marketing names for the controller's short device type codes.
fn device_type(d: &Device) -> String {
    match d.device_type.as_deref() {
        Some("ugw") => "Gateway".into(),
        Some("usw") => "Switch".into(),
        Some("uap") => "Access Point".into(),
        Some("udm") => "Dream Machine".into(),
        Some("uxg") => "Next-Gen Gateway".into(),
        Some("ubb") => "Building Bridge".into(),
        Some("uck") => "Cloud Key".into(),
        Some("uph") => "Phone".into(),
        Some("ulte") => "LTE Backup".into(),
        Some(other) => other.to_uppercase(),
        None => "Unknown".into(),
    }
}

fn device_status(state: i32) -> String {
    match state {
        0 => "offline".into(),
        1 => "online".into(),
        2 => "pending".into(),
        4 => "upgrading".into(),
        5 => "provisioning".into(),
        6 => "heartbeat missed".into(),
        other => format!("state:{other}"),
    }
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("Name:      {}", d.name.as_deref().unwrap_or("-")),
        format!("Model:     {}", d.model.as_deref().unwrap_or("-")),
        format!("Type:      {}", device_type(d)),
        format!("MAC:       {}", d.mac.to_uppercase()),
        format!("IP:        {}", d.ip.as_deref().unwrap_or("-")),
        format!("Serial:    {}", d.serial.as_deref().unwrap_or("-")),
        format!("Version:   {}", d.version.as_deref().unwrap_or("-")),
        format!("Status:    {}", device_status(d.state)),
        format!("Adopted:   {}", d.adopted),
    ];
    if let Some(uptime) = d.uptime {
        lines.push(format!("Uptime:    {}", util::format_uptime(uptime)));
    }
    if let Some(n) = d.num_sta {
        lines.push(format!("Clients:   {n}"));
    }
    if d.upgradable == Some(true) {
        lines.push(format!(
            "Upgrade:   {} available",
            d.upgrade_to_firmware.as_deref().unwrap_or("new version")
        ));
    }
    if let Some(sys) = &d.sys_stats {
        if let Some(load) = &sys.load_1 {
            lines.push(format!("Load:      {load}"));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &LocalClient,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = client.get_devices().await?;
            let out =
                output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| d.mac.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let mac = util::resolve_device_mac(client, &device).await?;
            let found = client.get_device(&mac).await?.ok_or_else(|| CliError::NotFound {
                resource_type: "device".into(),
                identifier: device,
                list_command: "devices list".into(),
            })?;
            let out = output::render_single(&global.output, &found, |d| DeviceRow::from(d), detail, |d| {
                d.mac.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Restart { device } => {
            let mac = util::resolve_device_mac(client, &device).await?;
            if !util::confirm(&format!("Restart device {mac}?"), global.yes)? {
                return Ok(());
            }
            let ok = client.restart_device(&mac).await?;
            util::require_ok(ok, &format!("restart {mac}"))?;
            if !global.quiet {
                eprintln!("Device {mac} restarting");
            }
            Ok(())
        }

        DevicesCommand::Upgrade { device } => {
            let mac = util::resolve_device_mac(client, &device).await?;
            if !util::confirm(
                &format!("Upgrade firmware on {mac}? The device will reboot."),
                global.yes,
            )? {
                return Ok(());
            }
            let ok = client.upgrade_device(&mac).await?;
            util::require_ok(ok, &format!("upgrade {mac}"))?;
            if !global.quiet {
                eprintln!("Device {mac} upgrading");
            }
            Ok(())
        }

        DevicesCommand::Locate { device, on } => {
            let mac = util::resolve_device_mac(client, &device).await?;
            let ok = client.locate_device(&mac, on).await?;
            util::require_ok(ok, &format!("locate {mac}"))?;
            if !global.quiet {
                let state = if on { "blinking" } else { "stopped" };
                eprintln!("Locate LED on {mac} {state}");
            }
            Ok(())
        }

        DevicesCommand::Adopt { mac } => {
            let mac = MacAddress::new(&mac);
            let ok = client.adopt_device(&mac).await?;
            util::require_ok(ok, &format!("adopt {mac}"))?;
            if !global.quiet {
                eprintln!("Adoption requested for {mac}");
            }
            Ok(())
        }
    }
}

//! Client command handlers.

use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::ClientEntry;

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct ClientRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Type")]
    conn: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Experience")]
    experience: String,
}

impl From<&ClientEntry> for ClientRow {
    fn from(c: &ClientEntry) -> Self {
        Self {
            name: c.display_name().to_string(),
            mac: c.mac.to_uppercase(),
            ip: c.ip.clone().unwrap_or_default(),
            network: c
                .network
                .clone()
                .or_else(|| c.essid.clone())
                .unwrap_or_default(),
            conn: conn_type(c).to_string(),
            signal: c.rssi.map(|r| format!("{r} dBm")).unwrap_or_default(),
            experience: c
                .satisfaction
                .map(|s| format!("{s}%"))
                .unwrap_or_default(),
        }
    }
}

fn conn_type(c: &ClientEntry) -> &'static str {
    if c.is_wired == Some(true) { "Wired" } else { "Wireless" }
}

fn detail(c: &ClientEntry) -> String {
    let mut lines = vec![
        format!("Name:        {}", c.display_name()),
        format!("Hostname:    {}", c.hostname.as_deref().unwrap_or("-")),
        format!("MAC:         {}", c.mac.to_uppercase()),
        format!("IP:          {}", c.ip.as_deref().unwrap_or("-")),
        format!(
            "Network:     {}",
            c.network.as_deref().or(c.essid.as_deref()).unwrap_or("-")
        ),
        format!("Type:        {}", conn_type(c)),
    ];
    if let Some(oui) = &c.oui {
        lines.push(format!("Vendor:      {oui}"));
    }
    if let Some(rssi) = c.rssi {
        lines.push(format!("Signal:      {rssi} dBm"));
    }
    if let Some(sat) = c.satisfaction {
        lines.push(format!("Experience:  {sat}%"));
    }
    if let Some(tx) = c.tx_rate {
        lines.push(format!("TX rate:     {}", util::format_rate(tx)));
    }
    if let Some(rx) = c.rx_rate {
        lines.push(format!("RX rate:     {}", util::format_rate(rx)));
    }
    if let Some(uptime) = c.uptime {
        lines.push(format!("Uptime:      {}", util::format_uptime(uptime)));
    }
    if c.use_fixedip == Some(true) {
        lines.push(format!(
            "Fixed IP:    {}",
            c.fixed_ip.as_deref().unwrap_or("-")
        ));
    }
    if c.blocked == Some(true) {
        lines.push("Blocked:     yes".into());
    }
    if c.is_guest == Some(true) {
        lines.push("Guest:       yes".into());
    }
    lines.join("\n")
}

fn render(clients: &[ClientEntry], global: &GlobalOpts) {
    let out = output::render_list(&global.output, clients, |c| ClientRow::from(c), |c| c.mac.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &LocalClient,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List {
            network,
            wired,
            wireless,
        } => {
            let mut clients = client.list_clients().await?;
            if let Some(ref net) = network {
                clients.retain(|c| {
                    c.network.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(net))
                        || c.essid.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(net))
                });
            }
            if wired {
                clients.retain(|c| c.is_wired == Some(true));
            }
            if wireless {
                clients.retain(|c| c.is_wired != Some(true));
            }
            render(&clients, global);
            Ok(())
        }

        ClientsCommand::All => {
            let clients = client.list_all_clients().await?;
            render(&clients, global);
            Ok(())
        }

        ClientsCommand::Get { client: identifier } => {
            let mac = util::resolve_client_mac(client, &identifier).await?;
            let found = client.get_client(&mac).await?.ok_or_else(|| CliError::NotFound {
                resource_type: "client".into(),
                identifier,
                list_command: "clients list".into(),
            })?;
            let out = output::render_single(&global.output, &found, |c| ClientRow::from(c), detail, |c| {
                c.mac.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Block { client: identifier } => {
            let mac = util::resolve_client_mac(client, &identifier).await?;
            let ok = client.block_client(&mac).await?;
            util::require_ok(ok, &format!("block {mac}"))?;
            if !global.quiet {
                eprintln!("Client {mac} blocked");
            }
            Ok(())
        }

        ClientsCommand::Unblock { client: identifier } => {
            let mac = util::resolve_client_mac(client, &identifier).await?;
            let ok = client.unblock_client(&mac).await?;
            util::require_ok(ok, &format!("unblock {mac}"))?;
            if !global.quiet {
                eprintln!("Client {mac} unblocked");
            }
            Ok(())
        }

        ClientsCommand::Kick { client: identifier } => {
            let mac = util::resolve_client_mac(client, &identifier).await?;
            let ok = client.kick_client(&mac).await?;
            util::require_ok(ok, &format!("kick {mac}"))?;
            if !global.quiet {
                eprintln!("Client {mac} disconnected");
            }
            Ok(())
        }
    }
}

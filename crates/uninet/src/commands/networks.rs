//! Network (wired/VLAN) command handlers.

use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::NetworkConf;

use crate::cli::{GlobalOpts, NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled, Serialize)]
struct NetworkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Purpose")]
    purpose: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "DHCP")]
    dhcp: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&NetworkConf> for NetworkRow {
    fn from(n: &NetworkConf) -> Self {
        Self {
            name: n.name.clone().unwrap_or_default(),
            purpose: n.purpose.clone().unwrap_or_default(),
            vlan: vlan_label(n),
            subnet: n.ip_subnet.clone().unwrap_or_default(),
            dhcp: yes_no(n.dhcpd_enabled),
            enabled: yes_no(n.enabled),
        }
    }
}

fn vlan_label(n: &NetworkConf) -> String {
    match (n.vlan_enabled, n.vlan) {
        (Some(true), Some(vlan)) => vlan.to_string(),
        _ => String::new(),
    }
}

fn yes_no(v: Option<bool>) -> String {
    match v {
        Some(true) => "yes".into(),
        Some(false) => "no".into(),
        None => String::new(),
    }
}

fn detail(n: &NetworkConf) -> String {
    let mut lines = vec![
        format!("Name:      {}", n.name.as_deref().unwrap_or("-")),
        format!("ID:        {}", n.id),
        format!("Purpose:   {}", n.purpose.as_deref().unwrap_or("-")),
        format!("Subnet:    {}", n.ip_subnet.as_deref().unwrap_or("-")),
    ];
    if n.vlan_enabled == Some(true) {
        if let Some(vlan) = n.vlan {
            lines.push(format!("VLAN:      {vlan}"));
        }
    }
    if let Some(domain) = &n.domain_name {
        lines.push(format!("Domain:    {domain}"));
    }
    if n.dhcpd_enabled == Some(true) {
        lines.push(format!(
            "DHCP:      {} - {}",
            n.dhcpd_start.as_deref().unwrap_or("?"),
            n.dhcpd_stop.as_deref().unwrap_or("?")
        ));
        if let Some(gw) = &n.dhcpd_gateway {
            lines.push(format!("Gateway:   {gw}"));
        }
        let dns: Vec<&str> = [n.dhcpd_dns_1.as_deref(), n.dhcpd_dns_2.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !dns.is_empty() {
            lines.push(format!("DNS:       {}", dns.join(", ")));
        }
    }
    if n.network_isolation == Some(true) {
        lines.push("Isolated:  yes".into());
    }
    if n.internet_access_enabled == Some(false) {
        lines.push("Internet:  blocked".into());
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &LocalClient,
    args: NetworksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NetworksCommand::List => {
            let networks = client.get_networks().await?;
            let out = output::render_list(&global.output, &networks, |n| NetworkRow::from(n), |n| {
                n.name.clone().unwrap_or_else(|| n.id.clone())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Get { network } => {
            let networks = client.get_networks().await?;
            let found = networks
                .iter()
                .find(|n| {
                    n.id == network
                        || n.name.as_deref().is_some_and(|na| na.eq_ignore_ascii_case(&network))
                })
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "network".into(),
                    identifier: network,
                    list_command: "networks list".into(),
                })?;
            let out = output::render_single(&global.output, found, |n| NetworkRow::from(n), detail, |n| {
                n.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

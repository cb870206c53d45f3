//! Firewall command handlers.

use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::{FirewallGroup, FirewallRule};

use crate::cli::{FirewallArgs, FirewallCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct RuleRow {
    #[tabled(rename = "Index")]
    index: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Ruleset")]
    ruleset: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&FirewallRule> for RuleRow {
    fn from(r: &FirewallRule) -> Self {
        let destination = match (r.dst_address.as_deref(), r.dst_port.as_deref()) {
            (Some(addr), Some(port)) => format!("{addr}:{port}"),
            (Some(addr), None) => addr.to_string(),
            (None, Some(port)) => format!("*:{port}"),
            (None, None) => String::new(),
        };
        Self {
            index: r.rule_index.map(|i| i.to_string()).unwrap_or_default(),
            name: r.name.clone().unwrap_or_default(),
            ruleset: r.ruleset.clone().unwrap_or_default(),
            action: r.action.clone().unwrap_or_default(),
            protocol: r.protocol.clone().unwrap_or_default(),
            destination,
            enabled: match r.enabled {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => String::new(),
            },
        }
    }
}

#[derive(Tabled, Serialize)]
struct GroupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    group_type: String,
    #[tabled(rename = "Members")]
    members: String,
}

impl From<&FirewallGroup> for GroupRow {
    fn from(g: &FirewallGroup) -> Self {
        Self {
            name: g.name.clone().unwrap_or_default(),
            group_type: g.group_type.clone().unwrap_or_default(),
            members: g.group_members.join(", "),
        }
    }
}

pub async fn handle(
    client: &LocalClient,
    args: FirewallArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FirewallCommand::Rules => {
            let rules = client.get_firewall_rules().await?;
            let out = output::render_list(&global.output, &rules, |r| RuleRow::from(r), |r| r.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FirewallCommand::Groups => {
            let groups = client.get_firewall_groups().await?;
            let out =
                output::render_list(&global.output, &groups, |g| GroupRow::from(g), |g| g.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

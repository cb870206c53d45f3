//! Port forwarding command handlers.

use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::PortForward;

use crate::cli::{GlobalOpts, PortfwdArgs, PortfwdCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct ForwardRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Proto")]
    proto: String,
    #[tabled(rename = "WAN Port")]
    wan_port: String,
    #[tabled(rename = "Forward To")]
    forward_to: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&PortForward> for ForwardRow {
    fn from(p: &PortForward) -> Self {
        let forward_to = match (p.fwd.as_deref(), p.fwd_port.as_deref()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => String::new(),
        };
        Self {
            name: p.name.clone().unwrap_or_default(),
            proto: p.proto.clone().unwrap_or_else(|| "tcp_udp".into()),
            wan_port: p.dst_port.clone().unwrap_or_default(),
            forward_to,
            enabled: match p.enabled {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => String::new(),
            },
        }
    }
}

pub async fn handle(
    client: &LocalClient,
    args: PortfwdArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PortfwdCommand::List => {
            let forwards = client.get_port_forwards().await?;
            let out =
                output::render_list(&global.output, &forwards, |p| ForwardRow::from(p), |p| p.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

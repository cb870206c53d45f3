//! Wireless network (SSID) command handlers.

use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::WlanConf;

use crate::cli::{GlobalOpts, WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct WlanRow {
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "Hidden")]
    hidden: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

impl From<&WlanConf> for WlanRow {
    fn from(w: &WlanConf) -> Self {
        Self {
            ssid: w.name.clone().unwrap_or_default(),
            security: w
                .security
                .clone()
                .or_else(|| w.wpa_mode.clone())
                .unwrap_or_default(),
            guest: flag(w.is_guest),
            hidden: flag(w.hide_ssid),
            enabled: flag(w.enabled),
        }
    }
}

fn flag(v: Option<bool>) -> String {
    match v {
        Some(true) => "yes".into(),
        Some(false) => "no".into(),
        None => String::new(),
    }
}

pub async fn handle(
    client: &LocalClient,
    args: WifiArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WifiCommand::List => {
            let wlans = client.get_wlans().await?;
            let out = output::render_list(&global.output, &wlans, |w| WlanRow::from(w), |w| {
                w.name.clone().unwrap_or_else(|| w.id.clone())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

//! Controller alarms.

use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::Alarm;

use crate::cli::{AlarmsArgs, AlarmsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{events, util};

#[derive(Tabled, Serialize)]
struct AlarmRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Archived")]
    archived: String,
}

impl From<&Alarm> for AlarmRow {
    fn from(a: &Alarm) -> Self {
        Self {
            time: a
                .datetime
                .clone()
                .or_else(|| a.time.map(events::format_epoch_ms))
                .unwrap_or_default(),
            key: a.key.clone().unwrap_or_default(),
            message: a.msg.clone().unwrap_or_default(),
            archived: if a.archived.unwrap_or(false) {
                "yes".into()
            } else {
                "no".into()
            },
        }
    }
}

pub async fn handle(
    client: &LocalClient,
    args: AlarmsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AlarmsCommand::List { include_archived } => {
            let alarms = client.get_alarms(include_archived).await?;
            let out = output::render_list(&global.output, &alarms, |a| AlarmRow::from(a), |a| {
                a.msg.clone().unwrap_or_else(|| a.id.clone())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlarmsCommand::Archive { id } => {
            let ok = client.archive_alarm(&id).await?;
            util::require_ok(ok, &format!("archive alarm {id}"))?;
            if !global.quiet {
                eprintln!("Alarm archived");
            }
            Ok(())
        }
    }
}

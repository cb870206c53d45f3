//! Controller event log.

use chrono::DateTime;
use serde::Serialize;
use tabled::Tabled;
use uninet_api::LocalClient;
use uninet_api::models::Event;

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled, Serialize)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Subsystem")]
    subsystem: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            time: e
                .datetime
                .clone()
                .or_else(|| e.time.map(format_epoch_ms))
                .unwrap_or_default(),
            subsystem: e.subsystem.clone().unwrap_or_default(),
            key: e.key.clone().unwrap_or_default(),
            message: e.msg.clone().unwrap_or_default(),
        }
    }
}

/// Event timestamps come as epoch milliseconds.
pub(super) fn format_epoch_ms(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub async fn handle(
    client: &LocalClient,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List { limit } => {
            let events = client.get_events(limit).await?;
            let out = output::render_list(&global.output, &events, |e| EventRow::from(e), |e| {
                e.msg.clone().unwrap_or_else(|| e.id.clone())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

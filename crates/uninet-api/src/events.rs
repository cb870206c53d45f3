// Event and alarm endpoints

use serde_json::json;
use tracing::debug;

use crate::client::{LocalClient, data_records, rc_ok};
use crate::error::Error;
use crate::models::{Alarm, Event};

impl LocalClient {
    /// Recent controller events, newest first.
    ///
    /// `POST {prefix}/stat/event` with `{"_limit": ..., "_sort": "-time"}`
    pub async fn get_events(&self, limit: u32) -> Result<Vec<Event>, Error> {
        debug!(limit, "fetching events");
        let response = self
            .post("stat/event", &json!({ "_limit": limit, "_sort": "-time" }))
            .await?;
        data_records(&response)
    }

    /// Alarms, excluding archived ones unless `include_archived` is set.
    ///
    /// `GET {prefix}/stat/alarm`
    pub async fn get_alarms(&self, include_archived: bool) -> Result<Vec<Alarm>, Error> {
        debug!(include_archived, "fetching alarms");
        let response = self.get("stat/alarm").await?;
        let mut alarms: Vec<Alarm> = data_records(&response)?;
        if !include_archived {
            alarms.retain(|a| a.archived != Some(true));
        }
        Ok(alarms)
    }

    /// Archive a single alarm by its `_id`.
    ///
    /// `POST {prefix}/cmd/evtmgr` with `{"cmd": "archive-alarm", "_id": "..."}`
    pub async fn archive_alarm(&self, alarm_id: &str) -> Result<bool, Error> {
        debug!(alarm_id, "archiving alarm");
        let response = self
            .post(
                "cmd/evtmgr",
                &json!({ "cmd": "archive-alarm", "_id": alarm_id }),
            )
            .await?;
        Ok(rc_ok(&response))
    }
}

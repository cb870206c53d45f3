// Site health, settings and the aggregated running config

use serde_json::Value;
use tracing::debug;

use crate::client::{LocalClient, data_records};
use crate::error::Error;
use crate::models::{HealthSubsystem, RunningConfig};

impl LocalClient {
    /// Per-subsystem health (wlan, lan, wan, www, vpn).
    ///
    /// `GET {prefix}/stat/health`
    pub async fn get_health(&self) -> Result<Vec<HealthSubsystem>, Error> {
        debug!("fetching site health");
        let response = self.get("stat/health").await?;
        data_records(&response)
    }

    /// Raw site settings sections (mgmt, guest_access, ntp, ...).
    ///
    /// `GET {prefix}/rest/setting`
    pub async fn get_site_settings(&self) -> Result<Vec<Value>, Error> {
        debug!("fetching site settings");
        let response = self.get("rest/setting").await?;
        data_records(&response)
    }

    /// Snapshot of the site's running configuration, assembled from
    /// the individual config endpoints.
    ///
    /// Sections a controller does not support come back as API errors
    /// and are reported empty rather than failing the whole snapshot.
    /// Connection and authentication failures still abort.
    pub async fn get_running_config(&self) -> Result<RunningConfig, Error> {
        debug!("assembling running config");
        Ok(RunningConfig {
            networks: best_effort("networks", self.get_networks().await)?,
            wireless: best_effort("wireless", self.get_wlans().await)?,
            firewall_rules: best_effort("firewall_rules", self.get_firewall_rules().await)?,
            firewall_groups: best_effort("firewall_groups", self.get_firewall_groups().await)?,
            port_forwards: best_effort("port_forwards", self.get_port_forwards().await)?,
            devices: best_effort("devices", self.get_devices().await)?,
            dhcp_reservations: best_effort(
                "dhcp_reservations",
                self.get_dhcp_reservations().await,
            )?,
            traffic_rules: best_effort("traffic_rules", self.get_traffic_rules().await)?,
            routing: best_effort("routing", self.get_routing().await)?,
        })
    }
}

/// Degrade an `Api` error for one section to an empty list. Other
/// errors (connection, auth, expired session) propagate.
fn best_effort<T>(section: &str, result: Result<Vec<T>, Error>) -> Result<Vec<T>, Error> {
    match result {
        Ok(records) => Ok(records),
        Err(Error::Api { status, .. }) => {
            debug!(section, status, "section unavailable, reporting empty");
            Ok(Vec::new())
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn best_effort_passes_records_through() {
        let result: Result<Vec<u8>, Error> = Ok(vec![1, 2, 3]);
        assert_eq!(best_effort("test", result).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn best_effort_swallows_api_errors() {
        let result: Result<Vec<u8>, Error> = Err(Error::Api {
            status: 404,
            body: "api.err.InvalidObject".into(),
        });
        assert!(best_effort("test", result).unwrap().is_empty());
    }

    #[test]
    fn best_effort_propagates_session_expiry() {
        let result: Result<Vec<u8>, Error> = Err(Error::SessionExpired);
        assert!(matches!(
            best_effort("test", result),
            Err(Error::SessionExpired)
        ));
    }
}

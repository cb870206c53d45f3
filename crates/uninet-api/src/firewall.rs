// Firewall endpoints

use tracing::debug;

use crate::client::{LocalClient, data_records};
use crate::error::Error;
use crate::models::{FirewallGroup, FirewallRule};

impl LocalClient {
    /// Firewall rules across all rulesets (WAN_IN, LAN_IN, ...).
    ///
    /// `GET {prefix}/rest/firewallrule`
    pub async fn get_firewall_rules(&self) -> Result<Vec<FirewallRule>, Error> {
        debug!("listing firewall rules");
        let response = self.get("rest/firewallrule").await?;
        data_records(&response)
    }

    /// Firewall groups (address and port groups referenced by rules).
    ///
    /// `GET {prefix}/rest/firewallgroup`
    pub async fn get_firewall_groups(&self) -> Result<Vec<FirewallGroup>, Error> {
        debug!("listing firewall groups");
        let response = self.get("rest/firewallgroup").await?;
        data_records(&response)
    }
}

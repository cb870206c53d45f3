// Network configuration endpoints
//
// Wired networks/VLANs, wireless networks, port forwards, traffic
// rules and static routes all live under rest/.

use serde_json::Value;
use tracing::debug;

use crate::client::{LocalClient, data_records};
use crate::error::Error;
use crate::models::{NetworkConf, PortForward, WlanConf};

impl LocalClient {
    /// Configured networks and VLANs.
    ///
    /// `GET {prefix}/rest/networkconf`
    pub async fn get_networks(&self) -> Result<Vec<NetworkConf>, Error> {
        debug!("listing networks");
        let response = self.get("rest/networkconf").await?;
        data_records(&response)
    }

    /// Configured wireless networks.
    ///
    /// `GET {prefix}/rest/wlanconf`
    pub async fn get_wlans(&self) -> Result<Vec<WlanConf>, Error> {
        debug!("listing wireless networks");
        let response = self.get("rest/wlanconf").await?;
        data_records(&response)
    }

    /// Configured port forwarding rules.
    ///
    /// `GET {prefix}/rest/portforward`
    pub async fn get_port_forwards(&self) -> Result<Vec<PortForward>, Error> {
        debug!("listing port forwards");
        let response = self.get("rest/portforward").await?;
        data_records(&response)
    }

    /// Traffic rules (newer controllers only; older ones return
    /// an empty list or an API error).
    ///
    /// `GET {prefix}/rest/trafficrule`
    pub async fn get_traffic_rules(&self) -> Result<Vec<Value>, Error> {
        debug!("listing traffic rules");
        let response = self.get("rest/trafficrule").await?;
        data_records(&response)
    }

    /// Static routing entries.
    ///
    /// `GET {prefix}/rest/routing`
    pub async fn get_routing(&self) -> Result<Vec<Value>, Error> {
        debug!("listing static routes");
        let response = self.get("rest/routing").await?;
        data_records(&response)
    }
}

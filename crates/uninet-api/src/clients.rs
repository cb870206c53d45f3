// Client (station) endpoints
//
// Reads via stat/sta and rest/user, management commands via cmd/stamgr.

use serde_json::json;
use tracing::debug;

use crate::client::{LocalClient, data_records, rc_ok};
use crate::error::Error;
use crate::mac::MacAddress;
use crate::models::ClientEntry;

impl LocalClient {
    /// List currently connected clients.
    ///
    /// `GET {prefix}/stat/sta`
    pub async fn list_clients(&self) -> Result<Vec<ClientEntry>, Error> {
        debug!("listing connected clients");
        let response = self.get("stat/sta").await?;
        data_records(&response)
    }

    /// List every client the controller knows, online or not.
    ///
    /// `GET {prefix}/rest/user`
    pub async fn list_all_clients(&self) -> Result<Vec<ClientEntry>, Error> {
        debug!("listing all known clients");
        let response = self.get("rest/user").await?;
        data_records(&response)
    }

    /// Look up one client by MAC address.
    ///
    /// `GET {prefix}/stat/user/{mac}` -- `None` when the controller
    /// answers with an empty result.
    pub async fn get_client(&self, mac: &MacAddress) -> Result<Option<ClientEntry>, Error> {
        debug!(%mac, "fetching client");
        let response = self.get(&format!("stat/user/{mac}")).await?;
        Ok(data_records(&response)?.into_iter().next())
    }

    /// Block a client from the network.
    ///
    /// `POST {prefix}/cmd/stamgr` with `{"cmd": "block-sta", "mac": "..."}`
    pub async fn block_client(&self, mac: &MacAddress) -> Result<bool, Error> {
        debug!(%mac, "blocking client");
        let response = self
            .post(
                "cmd/stamgr",
                &json!({ "cmd": "block-sta", "mac": mac.as_str() }),
            )
            .await?;
        Ok(rc_ok(&response))
    }

    /// Lift a block on a client.
    ///
    /// `POST {prefix}/cmd/stamgr` with `{"cmd": "unblock-sta", "mac": "..."}`
    pub async fn unblock_client(&self, mac: &MacAddress) -> Result<bool, Error> {
        debug!(%mac, "unblocking client");
        let response = self
            .post(
                "cmd/stamgr",
                &json!({ "cmd": "unblock-sta", "mac": mac.as_str() }),
            )
            .await?;
        Ok(rc_ok(&response))
    }

    /// Disconnect (kick) a client; it may reconnect immediately.
    ///
    /// `POST {prefix}/cmd/stamgr` with `{"cmd": "kick-sta", "mac": "..."}`
    pub async fn kick_client(&self, mac: &MacAddress) -> Result<bool, Error> {
        debug!(%mac, "kicking client");
        let response = self
            .post(
                "cmd/stamgr",
                &json!({ "cmd": "kick-sta", "mac": mac.as_str() }),
            )
            .await?;
        Ok(rc_ok(&response))
    }

    /// Clients holding a DHCP reservation (fixed IP).
    ///
    /// The controller stores reservations on the client records
    /// themselves: `rest/user` entries with `use_fixedip` set.
    pub async fn get_dhcp_reservations(&self) -> Result<Vec<ClientEntry>, Error> {
        debug!("listing DHCP reservations");
        let mut clients = self.list_all_clients().await?;
        clients.retain(|c| c.use_fixedip == Some(true));
        Ok(clients)
    }
}

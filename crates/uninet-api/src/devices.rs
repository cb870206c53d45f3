// Device endpoints
//
// Inventory via stat/device, management commands via cmd/devmgr.

use serde_json::json;
use tracing::debug;

use crate::client::{LocalClient, data_records, rc_ok};
use crate::error::Error;
use crate::mac::MacAddress;
use crate::models::Device;

impl LocalClient {
    /// All adopted (and pending) devices with full status.
    ///
    /// `GET {prefix}/stat/device`
    pub async fn get_devices(&self) -> Result<Vec<Device>, Error> {
        debug!("listing devices");
        let response = self.get("stat/device").await?;
        data_records(&response)
    }

    /// One device by MAC address.
    ///
    /// The API has no per-device read, so this filters the full
    /// `stat/device` listing client-side.
    pub async fn get_device(&self, mac: &MacAddress) -> Result<Option<Device>, Error> {
        debug!(%mac, "fetching device");
        let devices = self.get_devices().await?;
        Ok(devices
            .into_iter()
            .find(|d| d.mac.eq_ignore_ascii_case(mac.as_str())))
    }

    /// Reboot a device.
    ///
    /// `POST {prefix}/cmd/devmgr` with `{"cmd": "restart", "mac": "..."}`
    pub async fn restart_device(&self, mac: &MacAddress) -> Result<bool, Error> {
        debug!(%mac, "restarting device");
        let response = self
            .post(
                "cmd/devmgr",
                &json!({ "cmd": "restart", "mac": mac.as_str() }),
            )
            .await?;
        Ok(rc_ok(&response))
    }

    /// Start a firmware upgrade on a device.
    ///
    /// `POST {prefix}/cmd/devmgr` with `{"cmd": "upgrade", "mac": "..."}`
    pub async fn upgrade_device(&self, mac: &MacAddress) -> Result<bool, Error> {
        debug!(%mac, "upgrading device");
        let response = self
            .post(
                "cmd/devmgr",
                &json!({ "cmd": "upgrade", "mac": mac.as_str() }),
            )
            .await?;
        Ok(rc_ok(&response))
    }

    /// Turn the locate LED on or off.
    ///
    /// `POST {prefix}/cmd/devmgr` with `{"cmd": "set-locate", "locate_enable": ...}`
    pub async fn locate_device(&self, mac: &MacAddress, enabled: bool) -> Result<bool, Error> {
        debug!(%mac, enabled, "setting locate LED");
        let response = self
            .post(
                "cmd/devmgr",
                &json!({
                    "cmd": "set-locate",
                    "mac": mac.as_str(),
                    "locate_enable": enabled,
                }),
            )
            .await?;
        Ok(rc_ok(&response))
    }

    /// Adopt a device that is advertising itself to the controller.
    ///
    /// `POST {prefix}/cmd/devmgr` with `{"cmd": "adopt", "mac": "..."}`
    pub async fn adopt_device(&self, mac: &MacAddress) -> Result<bool, Error> {
        debug!(%mac, "adopting device");
        let response = self
            .post("cmd/devmgr", &json!({ "cmd": "adopt", "mac": mac.as_str() }))
            .await?;
        Ok(rc_ok(&response))
    }
}

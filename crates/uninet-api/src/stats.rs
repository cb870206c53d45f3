// Traffic statistics and DPI endpoints

use serde_json::json;
use tracing::debug;

use crate::client::{LocalClient, data_records};
use crate::error::Error;
use crate::mac::MacAddress;
use crate::models::{DpiUsage, ReportEntry};

/// Attributes requested from the site report endpoints.
const REPORT_ATTRS: [&str; 6] = [
    "time",
    "rx_bytes",
    "tx_bytes",
    "num_sta",
    "wan-rx_bytes",
    "wan-tx_bytes",
];

impl LocalClient {
    /// Site-wide deep packet inspection totals by application/category.
    ///
    /// `GET {prefix}/stat/sitedpi`
    pub async fn get_site_dpi(&self) -> Result<Vec<DpiUsage>, Error> {
        debug!("fetching site DPI");
        let response = self.get("stat/sitedpi").await?;
        data_records(&response)
    }

    /// Per-client deep packet inspection breakdown.
    ///
    /// `GET {prefix}/stat/stadpi/{mac}`
    pub async fn get_client_dpi(&self, mac: &MacAddress) -> Result<Vec<DpiUsage>, Error> {
        debug!(%mac, "fetching client DPI");
        let response = self.get(&format!("stat/stadpi/{mac}")).await?;
        data_records(&response)
    }

    /// Daily site traffic report covering the last `days` days.
    ///
    /// `POST {prefix}/stat/report/daily.site`
    pub async fn get_daily_stats(&self, days: u32) -> Result<Vec<ReportEntry>, Error> {
        debug!(days, "fetching daily site stats");
        let response = self
            .post(
                "stat/report/daily.site",
                &json!({ "attrs": REPORT_ATTRS, "n": days }),
            )
            .await?;
        data_records(&response)
    }

    /// Hourly site traffic report covering the last `hours` hours.
    ///
    /// `POST {prefix}/stat/report/hourly.site`
    pub async fn get_hourly_stats(&self, hours: u32) -> Result<Vec<ReportEntry>, Error> {
        debug!(hours, "fetching hourly site stats");
        let response = self
            .post(
                "stat/report/hourly.site",
                &json!({ "attrs": REPORT_ATTRS, "n": hours }),
            )
            .await?;
        data_records(&response)
    }
}

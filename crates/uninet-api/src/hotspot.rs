// Hotspot voucher endpoints

use serde_json::json;
use tracing::debug;

use crate::client::{LocalClient, data_records, rc_ok};
use crate::error::Error;
use crate::models::{Voucher, VoucherSpec};

impl LocalClient {
    /// All hotspot vouchers for the site.
    ///
    /// `GET {prefix}/stat/voucher`
    pub async fn get_vouchers(&self) -> Result<Vec<Voucher>, Error> {
        debug!("listing vouchers");
        let response = self.get("stat/voucher").await?;
        data_records(&response)
    }

    /// Create one or more vouchers and return the created batch.
    ///
    /// `POST {prefix}/cmd/hotspot` with `{"cmd": "create-voucher", ...}`
    pub async fn create_voucher(&self, spec: &VoucherSpec) -> Result<Vec<Voucher>, Error> {
        debug!(count = spec.count, "creating vouchers");
        // The API calls the redemption count "quota"; data caps go in
        // separate fields and are omitted when unlimited.
        let mut body = json!({
            "cmd": "create-voucher",
            "n": spec.count,
            "expire": spec.duration_minutes,
            "quota": spec.multi_use,
        });
        let fields = body
            .as_object_mut()
            .expect("json! macro always produces an object");
        if spec.quota_mb > 0 {
            fields.insert("bytes".into(), json!(spec.quota_mb));
        }
        if spec.up_kbps > 0 {
            fields.insert("up".into(), json!(spec.up_kbps));
        }
        if spec.down_kbps > 0 {
            fields.insert("down".into(), json!(spec.down_kbps));
        }
        if let Some(note) = spec.note.as_deref().filter(|n| !n.is_empty()) {
            fields.insert("note".into(), json!(note));
        }

        let response = self.post("cmd/hotspot", &body).await?;
        data_records(&response)
    }

    /// Revoke (delete) a voucher by its `_id`.
    ///
    /// `POST {prefix}/cmd/hotspot` with `{"cmd": "delete-voucher", "_id": "..."}`
    pub async fn revoke_voucher(&self, voucher_id: &str) -> Result<bool, Error> {
        debug!(voucher_id, "revoking voucher");
        let response = self
            .post(
                "cmd/hotspot",
                &json!({ "cmd": "delete-voucher", "_id": voucher_id }),
            )
            .await?;
        Ok(rc_ok(&response))
    }
}

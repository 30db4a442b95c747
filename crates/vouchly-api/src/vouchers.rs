// Voucher endpoints
//
// The legacy API exposes vouchers through two site-scoped paths:
// `stat/voucher` (listing) and `cmd/hotspot` (mutations, discriminated
// by a `cmd` field in the POST body).

use serde_json::json;
use tracing::debug;

use crate::client::HotspotClient;
use crate::error::Error;
use crate::models::{CreateVoucherRequest, CreateVoucherResult, VoucherRecord};

impl HotspotClient {
    /// List all vouchers for the site.
    ///
    /// `GET {site}/stat/voucher`
    pub async fn list_vouchers(&self) -> Result<Vec<VoucherRecord>, Error> {
        self.get(self.site_url("stat/voucher")).await
    }

    /// Create a batch of vouchers.
    ///
    /// `POST {site}/cmd/hotspot` with `cmd=create-voucher`. The response
    /// carries the batch `create_time`; the vouchers themselves appear in
    /// the next listing.
    pub async fn create_vouchers(
        &self,
        req: &CreateVoucherRequest,
    ) -> Result<Vec<CreateVoucherResult>, Error> {
        debug!(count = req.count, "creating vouchers");

        let mut body = serde_json::to_value(req).map_err(|e| Error::Deserialization {
            message: format!("failed to encode create-voucher request: {e}"),
            body: String::new(),
        })?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("cmd".into(), json!("create-voucher"));
        }

        self.post(self.site_url("cmd/hotspot"), &body).await
    }

    /// Delete a voucher by its controller id.
    ///
    /// `POST {site}/cmd/hotspot` with `cmd=delete-voucher`.
    pub async fn delete_voucher(&self, id: &str) -> Result<(), Error> {
        debug!(%id, "deleting voucher");

        let body = json!({
            "cmd": "delete-voucher",
            "_id": id,
        });

        let _: Vec<serde_json::Value> = self.post(self.site_url("cmd/hotspot"), &body).await?;
        Ok(())
    }
}

use anyhow::{Context, Result};

use crate::model::VpnStatus;

use super::ApiClient;
use super::types::ConnectionEntry;

fn rate(v: Option<&serde_json::Value>) -> String {
    match v {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => "0".to_string(),
    }
}

impl ApiClient {
    /// VPN connection status; the endpoint answers an empty array when no
    /// tunnel is up.
    pub async fn vpn_status(&self) -> Result<VpnStatus> {
        let resp = self
            .get("/api/v4/connection/status")
            .send()
            .await
            .context("connection status request")?;
        let resp = self.ensure_ok(resp, "connection status").await?;
        let entries: Vec<ConnectionEntry> =
            resp.json().await.context("parse connection status")?;

        let Some(entry) = entries.into_iter().next() else {
            return Ok(VpnStatus::Offline);
        };

        Ok(VpnStatus::Connected {
            location: entry.location_type_friendly.unwrap_or_default(),
            hostname: entry.server.hostname.unwrap_or_default(),
            ip4: entry.connection.ip4.unwrap_or_default(),
            through_pwnbox: entry.connection.through_pwnbox,
            down: rate(entry.connection.down.as_ref()),
            up: rate(entry.connection.up.as_ref()),
        })
    }
}

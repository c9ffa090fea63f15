//! Fetching the peer connection config from the server.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::pc_config::PcConfig;
use crate::util::endpoint_url;

/// Where the server publishes its ICE configuration, below the base URL.
pub const PC_CONFIG_PATH: &str = "/api/pc-config";

/// GET `<base_url>/api/pc-config` and decode it.
///
/// Any transport error, non-success status or body that does not decode
/// into a [`PcConfig`] is an error; the caller never gets a half-filled
/// config to build a peer connection from.
pub async fn fetch_pc_config(http: &reqwest::Client, base_url: &str) -> Result<PcConfig> {
    let url = endpoint_url(base_url, PC_CONFIG_PATH);
    info!("Fetching peer connection config from {}", url);

    let response = http.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status { url, status });
    }

    let body = response.bytes().await?;
    let config: PcConfig = serde_json::from_slice(&body)?;

    debug!("Peer connection config: {:?}", config);

    Ok(config)
}

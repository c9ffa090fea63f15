//! Command line arguments

use clap::Parser;
use reqwest::Url;

use crate::error::{Error, Result};
use crate::util::endpoint_url;

/// Default WHEP endpoint path below the server base URL.
pub const DEFAULT_WHEP_PATH: &str = "/api/whep";

/// Pull a single WebRTC stream from a WHEP server and discard its media.
#[derive(Debug, Clone, Parser)]
#[command(name = "whep-pull", version)]
pub struct Cli {
    /// Base URL of the server, e.g. http://localhost:4000
    pub url: String,

    /// Path of the WHEP endpoint below the base URL. Pass an empty path
    /// (`--whep-path ""`) to POST the offer to the base URL itself
    #[arg(long, default_value = DEFAULT_WHEP_PATH)]
    pub whep_path: String,

    /// Input to pull, sent as the `inputId` query parameter
    #[arg(long)]
    pub input_id: Option<String>,

    /// Bearer token for the WHEP endpoint
    #[arg(long)]
    pub token: Option<String>,
}

impl Cli {
    /// The URL the SDP offer is POSTed to.
    pub fn whep_endpoint(&self) -> Result<String> {
        let raw = endpoint_url(&self.url, &self.whep_path);
        let mut url = Url::parse(&raw).map_err(|e| Error::Url {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        if let Some(input_id) = &self.input_id {
            url.query_pairs_mut().append_pair("inputId", input_id);
        }

        Ok(url.to_string())
    }
}

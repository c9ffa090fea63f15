//! Peer connection configuration served by the WHEP server
//!
//! The server publishes its ICE servers and transport policy at
//! `/api/pc-config`. These types mirror that JSON document and translate it
//! into the configuration object owned by the WebRTC stack.

use std::fmt;

use serde::{Deserialize, Deserializer};
use tracing::warn;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::policy::ice_transport_policy::RTCIceTransportPolicy;

/// The `/api/pc-config` document.
///
/// Keys are accepted both in the `IceServers` spelling and in the
/// browser-style `iceServers` spelling, since servers usually hand the same
/// object to `new RTCPeerConnection()` in their web player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PcConfig {
    #[serde(
        rename = "IceServers",
        alias = "iceServers",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub ice_servers: Vec<IceServer>,

    #[serde(rename = "IceTransportPolicy", alias = "iceTransportPolicy", default)]
    pub ice_transport_policy: IceTransportPolicy,
}

/// One STUN or TURN server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IceServer {
    pub urls: Urls,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub credential: String,
}

/// `urls` is a single URL or a list of them, as in `RTCIceServer`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Urls {
    One(String),
    Many(Vec<String>),
}

/// Which candidate types the ICE agent may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IceTransportPolicy {
    /// Any candidate type.
    #[default]
    All,
    /// Only candidates relayed through a TURN server.
    Relay,
}

impl PcConfig {
    /// Translate into the configuration the peer connection is built from.
    pub fn to_rtc_configuration(&self) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: self.ice_servers.iter().map(IceServer::to_rtc).collect(),
            ice_transport_policy: self.ice_transport_policy.into(),
            ..Default::default()
        }
    }
}

impl IceServer {
    #[allow(clippy::needless_update)]
    pub fn to_rtc(&self) -> RTCIceServer {
        RTCIceServer {
            urls: self.urls.to_vec(),
            username: self.username.clone(),
            credential: self.credential.clone(),
            ..Default::default()
        }
    }
}

impl Urls {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Urls::One(url) => vec![url.clone()],
            Urls::Many(urls) => urls.clone(),
        }
    }
}

impl IceTransportPolicy {
    /// Parse the policy name, case-insensitively.
    ///
    /// Anything other than `relay` means `all`, the same fallback a browser
    /// applies when the policy is left out.
    pub fn from_name(raw: &str) -> IceTransportPolicy {
        if raw.eq_ignore_ascii_case("relay") {
            IceTransportPolicy::Relay
        } else if raw.eq_ignore_ascii_case("all") || raw.is_empty() {
            IceTransportPolicy::All
        } else {
            warn!("Unknown ICE transport policy '{}', using 'all'", raw);
            IceTransportPolicy::All
        }
    }
}

impl fmt::Display for IceTransportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IceTransportPolicy::All => write!(f, "all"),
            IceTransportPolicy::Relay => write!(f, "relay"),
        }
    }
}

impl From<IceTransportPolicy> for RTCIceTransportPolicy {
    fn from(policy: IceTransportPolicy) -> Self {
        match policy {
            IceTransportPolicy::All => RTCIceTransportPolicy::All,
            IceTransportPolicy::Relay => RTCIceTransportPolicy::Relay,
        }
    }
}

impl<'de> Deserialize<'de> for IceTransportPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|r| IceTransportPolicy::from_name(&r))
            .unwrap_or_default())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<IceServer>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<IceServer>>::deserialize(deserializer)?.unwrap_or_default())
}

//! Errors that can occur while pulling a stream.
//!
//! Every one of them is fatal for the client: they are propagated up to
//! `main`, which prints the chain and exits non-zero.

use std::error::Error as StdError;

use reqwest::StatusCode;

/// Boxed error returned by a [`PacketSource`](crate::peer::PacketSource).
pub type BoxError = Box<dyn StdError + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error communicating with the server over HTTP
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with the status we need
    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: StatusCode },

    /// The peer connection config body is not JSON of the expected shape
    #[error("invalid peer connection config: {0}")]
    PcConfig(#[from] serde_json::Error),

    /// A server URL given on the command line can not be used
    #[error("invalid URL '{url}': {reason}")]
    Url { url: String, reason: String },

    /// Error raised by the WebRTC stack
    #[error("WebRTC error: {0}")]
    Webrtc(#[from] webrtc::Error),

    /// Error related to SDP negotiation
    #[error("SDP negotiation failed: {0}")]
    Sdp(String),

    /// Reading RTP from a remote track failed
    #[error("reading RTP from track {track} failed after {packets} packets: {source}")]
    TrackRead {
        track: String,
        packets: u64,
        #[source]
        source: BoxError,
    },
}

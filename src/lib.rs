//! Minimal WHEP client
//!
//! Pulls a single media stream from a WHEP (WebRTC-HTTP Egress Protocol)
//! server: the ICE configuration is fetched from the server, a receive-only
//! peer connection is negotiated over HTTP, and the incoming RTP packets are
//! read and discarded.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod peer;
pub mod util;
pub mod whep;

pub use error::{Error, Result};

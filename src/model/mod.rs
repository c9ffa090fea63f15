//! Data models for the WHEP session
//!
//! The peer connection config fetched from the server and the description
//! of the tracks it sends us.

pub mod pc_config;
pub mod tracks;

//! Remote media tracks
//!
//! Describes the tracks announced by the server once the session is up.
//! Their payload is never used, so all we keep is what is worth logging.

use std::fmt;

use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_remote::TrackRemote;

/// Metadata of an incoming track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    /// The kind of media (audio or video)
    pub kind: RTPCodecType,
    /// Negotiated codec, e.g. `video/VP8`
    pub mime_type: String,
    /// SSRC of the RTP stream
    pub ssrc: u32,
    /// The media stream the track belongs to
    pub stream_id: String,
}

impl TrackInfo {
    pub fn from_remote(track: &TrackRemote) -> TrackInfo {
        TrackInfo {
            kind: track.kind(),
            mime_type: track.codec().capability.mime_type,
            ssrc: track.ssrc(),
            stream_id: track.stream_id(),
        }
    }
}

impl fmt::Display for TrackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (ssrc {}", self.kind, self.mime_type, self.ssrc)?;
        if !self.stream_id.is_empty() {
            write!(f, ", stream {}", self.stream_id)?;
        }
        write!(f, ")")
    }
}

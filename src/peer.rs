//! Peer connection observers
//!
//! Two callbacks are registered on the peer connection: one logs ICE
//! connection state changes, the other logs each new track and starts a
//! task that reads its RTP packets and throws them away. Reading keeps the
//! receive path of the WebRTC stack flowing; the payload is never used.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_remote::TrackRemote;

use crate::error::{BoxError, Error};
use crate::model::tracks::TrackInfo;

/// Log a running packet count every this many packets, at debug level.
const LOG_EVERY_PACKETS: u64 = 1000;

/// Something RTP packets can be read from, one at a time.
#[async_trait]
pub trait PacketSource: Send + Sync {
    /// Wait for the next packet and return its payload size.
    async fn read_packet(&self) -> Result<usize, BoxError>;
}

#[async_trait]
impl PacketSource for TrackRemote {
    async fn read_packet(&self) -> Result<usize, BoxError> {
        let (packet, _attributes) = self.read_rtp().await?;
        Ok(packet.payload.len())
    }
}

/// Read and discard packets until reading fails.
///
/// There is no end condition other than an error, so this only ever returns
/// the error that stopped it.
pub async fn drain<S>(source: &S, track: &str) -> Error
where
    S: PacketSource + ?Sized,
{
    let mut packets: u64 = 0;
    let mut bytes: u64 = 0;

    loop {
        match source.read_packet().await {
            Ok(size) => {
                packets += 1;
                bytes += size as u64;

                if packets % LOG_EVERY_PACKETS == 0 {
                    debug!("{}: {} packets, {} bytes discarded", track, packets, bytes);
                }
            }
            Err(source) => {
                info!("{}: stopped after {} packets, {} bytes", track, packets, bytes);
                return Error::TrackRead {
                    track: track.to_string(),
                    packets,
                    source,
                };
            }
        }
    }
}

/// Register the ICE state and track observers on `pc`.
///
/// A failing track read is sent on `fatal`; whoever owns the receiving end
/// is expected to end the process.
pub fn register_observers(pc: &RTCPeerConnection, fatal: UnboundedSender<Error>) {
    pc.on_ice_connection_state_change(Box::new(|state: RTCIceConnectionState| {
        info!("Connection State has changed {}", state);
        Box::pin(async {})
    }));

    pc.on_track(Box::new(
        move |track: Arc<TrackRemote>,
              _receiver: Arc<RTCRtpReceiver>,
              _transceiver: Arc<RTCRtpTransceiver>| {
            let info = TrackInfo::from_remote(&track);
            info!("New track: {}", info.mime_type);
            debug!("Track details: {}", info);

            let fatal = fatal.clone();
            Box::pin(async move {
                spawn_drain(track, info.to_string(), fatal);
            })
        },
    ));
}

/// Drain `source` on its own task and send the error that stops it on `fatal`.
pub fn spawn_drain<S>(source: Arc<S>, track: String, fatal: UnboundedSender<Error>)
where
    S: PacketSource + ?Sized + 'static,
{
    tokio::spawn(async move {
        let err = drain(source.as_ref(), &track).await;
        error!("{}", err);
        // The receiver is only gone when we are shutting down anyway.
        let _ = fatal.send(err);
    });
}

//! WHEP signaling
//!
//! This module establishes a receive-only WebRTC session with a WHEP server:
//! it builds the peer connection, sends the SDP offer over HTTP and applies
//! the answer. ICE, DTLS and RTP are handled by the `webrtc` crate; all this
//! module does is the HTTP exchange around it.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::APIBuilder;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;

use crate::error::{Error, Result};

const SDP_CONTENT_TYPE: &str = "application/sdp";

/// A WHEP session with one server endpoint.
pub struct WhepClient {
    endpoint: String,
    token: Option<String>,
    http: reqwest::Client,
    pc: Arc<RTCPeerConnection>,
    /// Session resource from the `Location` header, once connected
    resource_url: Option<String>,
}

impl WhepClient {
    /// Create the peer connection for a session with `endpoint`.
    ///
    /// The connection gets one receive-only video and one receive-only audio
    /// transceiver, so the offer asks the server for exactly one stream.
    /// Nothing is sent until [`connect`](Self::connect) is called, which
    /// leaves room to register observers on [`peer_connection`](Self::peer_connection).
    pub async fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        rtc_config: RTCConfiguration,
        token: Option<String>,
    ) -> Result<WhepClient> {
        let endpoint = endpoint.into();

        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let pc = Arc::new(api.new_peer_connection(rtc_config).await?);

        for kind in [RTPCodecType::Video, RTPCodecType::Audio] {
            pc.add_transceiver_from_kind(
                kind,
                Some(RTCRtpTransceiverInit {
                    direction: RTCRtpTransceiverDirection::Recvonly,
                    send_encodings: vec![],
                }),
            )
            .await?;
        }

        debug!("Created peer connection for WHEP endpoint {}", endpoint);

        Ok(WhepClient {
            endpoint,
            token,
            http,
            pc,
            resource_url: None,
        })
    }

    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.pc
    }

    /// The session resource the server created, if connected.
    pub fn resource_url(&self) -> Option<&str> {
        self.resource_url.as_deref()
    }

    /// Negotiate the session.
    ///
    /// 1. Creates the SDP offer and sets it as local description
    /// 2. Waits for ICE gathering, so the offer carries all candidates
    /// 3. POSTs the offer to the endpoint and expects `201 Created`
    /// 4. Applies the SDP answer from the response body
    ///
    /// ICE and DTLS carry on in the background after this returns.
    pub async fn connect(&mut self) -> Result<()> {
        let offer = self.pc.create_offer(None).await?;

        let mut gathering = self.pc.gathering_complete_promise().await;
        self.pc.set_local_description(offer).await?;
        let _ = gathering.recv().await;

        let offer = self
            .pc
            .local_description()
            .await
            .ok_or_else(|| Error::Sdp("no local description after setting offer".to_string()))?;

        debug!("Offer SDP:\n{}", offer.sdp);
        debug!(
            "Offer carries {} ICE candidates",
            offer.sdp.matches("a=candidate:").count()
        );

        let answer = self.post_offer(offer.sdp).await?;

        debug!("Answer SDP:\n{}", answer);

        self.pc
            .set_remote_description(RTCSessionDescription::answer(answer)?)
            .await?;

        info!("WHEP session negotiated with {}", self.endpoint);

        Ok(())
    }

    async fn post_offer(&mut self, offer: String) -> Result<String> {
        info!("Sending offer to {}", self.endpoint);

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, SDP_CONTENT_TYPE)
            .body(offer);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(Error::Status {
                url: self.endpoint.clone(),
                status,
            });
        }

        // The resource URL may be relative to wherever the POST ended up.
        match response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
        {
            Some(location) => match response.url().join(location) {
                Ok(url) => {
                    info!("WHEP session resource: {}", url);
                    self.resource_url = Some(url.to_string());
                }
                Err(e) => warn!("Ignoring unusable Location '{}': {}", location, e),
            },
            None => warn!("WHEP server sent no Location, the session can't be deleted"),
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            if content_type.as_bytes() != SDP_CONTENT_TYPE.as_bytes() {
                warn!("Answer has content type {:?}", content_type);
            }
        }

        let answer = response.text().await?;
        if answer.trim().is_empty() {
            return Err(Error::Sdp("WHEP server sent an empty answer".to_string()));
        }

        Ok(answer)
    }

    /// Close the peer connection and delete the session resource.
    ///
    /// Failures are logged only: the server expires abandoned sessions on its
    /// own, and there is nothing else to clean up here.
    pub async fn disconnect(&mut self) {
        if let Err(e) = self.pc.close().await {
            warn!("Closing peer connection failed: {}", e);
        }

        let Some(resource_url) = self.resource_url.take() else {
            return;
        };

        let mut request = self.http.delete(&resource_url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                info!("WHEP session deleted: {}", resource_url);
            }
            Ok(response) => warn!(
                "DELETE {} returned {}, the session may still exist",
                resource_url,
                response.status()
            ),
            Err(e) => warn!("DELETE {} failed: {}", resource_url, e),
        }
    }
}

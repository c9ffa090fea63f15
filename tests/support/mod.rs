//! Mock WHEP server
//!
//! A `rouille` web server on an ephemeral port that serves a peer connection
//! config and a WHEP endpoint. In `Answer` mode the endpoint hands the offer
//! to a `str0m` peer and returns its answer, like a real WHEP server would.

#![allow(dead_code)]

use std::io::Read;
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use rouille::{Request, Response, Server};
use str0m::change::SdpOffer;
use str0m::Rtc;

pub const PC_CONFIG_PATH: &str = "/api/pc-config";
pub const WHEP_PATH: &str = "/api/whep";
pub const RESOURCE_PATH: &str = "/api/whep/resource/1";

/// Host candidates only, so ICE gathering never leaves the machine.
pub const HOST_ONLY_CONFIG: &str = r#"{"iceServers": [], "iceTransportPolicy": "all"}"#;

/// How the WHEP endpoint reacts to an offer.
#[derive(Debug, Clone, Copy)]
pub enum WhepMode {
    /// Answer with a `str0m` peer, `201 Created` and a relative `Location`.
    Answer,
    /// Reply with this status and no body.
    Status(u16),
    /// `201 Created` with a `Location` but an empty body.
    EmptyAnswer,
    /// `201 Created` with a `Location` and a body that is not SDP.
    GarbageAnswer,
}

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub pc_config_status: u16,
    pub pc_config_body: String,
    pub whep: WhepMode,
}

impl Default for MockConfig {
    fn default() -> Self {
        MockConfig {
            pc_config_status: 200,
            pc_config_body: HOST_ONLY_CONFIG.to_string(),
            whep: WhepMode::Answer,
        }
    }
}

/// What the server has seen.
#[derive(Debug, Default)]
pub struct Seen {
    pub pc_config_requests: AtomicUsize,
    pub offers: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<String>>,
    pub authorization: Mutex<Vec<Option<String>>>,
    pub deletes: AtomicUsize,
}

pub struct MockServer {
    pub base_url: String,
    pub seen: Arc<Seen>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    pub fn start(config: MockConfig) -> MockServer {
        let seen = Arc::new(Seen::default());
        let seen_handler = Arc::clone(&seen);

        let server = Server::new("127.0.0.1:0", move |request| {
            web_request(request, &config, &seen_handler)
        })
        .expect("starting the mock server");

        let base_url = format!("http://{}", server.server_addr());
        let (handle, stop) = server.stoppable();

        MockServer {
            base_url,
            seen,
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    pub fn offers(&self) -> Vec<String> {
        self.seen.offers.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.seen.queries.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> usize {
        self.seen.deletes.load(Ordering::SeqCst)
    }

    pub fn pc_config_requests(&self) -> usize {
        self.seen.pc_config_requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A base URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("binding a free port");
    let addr = listener.local_addr().expect("a local address");
    drop(listener);
    format!("http://{addr}")
}

fn web_request(request: &Request, config: &MockConfig, seen: &Seen) -> Response {
    match (request.method(), request.url().as_str()) {
        ("GET", PC_CONFIG_PATH) => {
            seen.pc_config_requests.fetch_add(1, Ordering::SeqCst);
            Response::from_data("application/json", config.pc_config_body.clone())
                .with_status_code(config.pc_config_status)
        }
        ("POST", WHEP_PATH) => whep_offer(request, config.whep, seen),
        ("DELETE", RESOURCE_PATH) => {
            seen.deletes.fetch_add(1, Ordering::SeqCst);
            Response::empty_204()
        }
        _ => Response::empty_404(),
    }
}

fn whep_offer(request: &Request, mode: WhepMode, seen: &Seen) -> Response {
    let Some(mut data) = request.data() else {
        return Response::empty_400();
    };

    let mut body = String::new();
    if data.read_to_string(&mut body).is_err() {
        return Response::empty_400();
    }

    if request.header("Content-Type") != Some("application/sdp") {
        return Response::text("expected application/sdp").with_status_code(415);
    }

    seen.offers.lock().unwrap().push(body.clone());
    seen.queries
        .lock()
        .unwrap()
        .push(request.raw_query_string().to_string());
    seen.authorization
        .lock()
        .unwrap()
        .push(request.header("Authorization").map(str::to_string));

    match mode {
        WhepMode::Answer => {
            let Ok(offer) = SdpOffer::from_sdp_string(&body) else {
                return Response::text("unparseable offer").with_status_code(400);
            };

            let mut rtc: Rtc = Rtc::builder().build();
            let answer = match rtc.sdp_api().accept_offer(offer) {
                Ok(answer) => answer,
                Err(e) => return Response::text(format!("{e:?}")).with_status_code(400),
            };

            Response::from_data("application/sdp", answer.to_string())
                .with_status_code(201)
                .with_additional_header("Location", RESOURCE_PATH)
        }
        WhepMode::Status(status) => Response::empty_404().with_status_code(status),
        WhepMode::EmptyAnswer => Response::from_data("application/sdp", Vec::<u8>::new())
            .with_status_code(201)
            .with_additional_header("Location", RESOURCE_PATH),
        WhepMode::GarbageAnswer => Response::from_data("application/sdp", "v=0 garbage")
            .with_status_code(201)
            .with_additional_header("Location", RESOURCE_PATH),
    }
}

//! The client procedure, from config fetch to shutdown.

use std::future::Future;

use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::fetch_pc_config;
use crate::error::{Error, Result};
use crate::peer::register_observers;
use crate::whep::WhepClient;

/// Pull the stream until Ctrl-C or until a track can no longer be read.
pub async fn run(cli: &Cli) -> Result<()> {
    run_until(cli, ctrl_c()).await
}

/// Pull the stream until `shutdown` completes or a track read fails.
///
/// 1. Fetches the peer connection config from the server
/// 2. Builds the WHEP client from it
/// 3. Registers the ICE state and track observers
/// 4. Negotiates the session
/// 5. Waits
///
/// A failing track read ends the wait with that error. Completion of
/// `shutdown` ends it with `Ok`. Either way the session is torn down first.
pub async fn run_until<F>(cli: &Cli, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let http = reqwest::Client::new();

    let pc_config = fetch_pc_config(&http, &cli.url).await?;
    info!(
        "Using {} ICE server(s), transport policy '{}'",
        pc_config.ice_servers.len(),
        pc_config.ice_transport_policy
    );

    let endpoint = cli.whep_endpoint()?;
    let mut client = WhepClient::new(
        http,
        endpoint,
        pc_config.to_rtc_configuration(),
        cli.token.clone(),
    )
    .await?;

    let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();
    register_observers(client.peer_connection(), fatal_tx);

    // The server may already hold a session resource when negotiation fails.
    if let Err(e) = client.connect().await {
        client.disconnect().await;
        return Err(e);
    }

    wait(client, fatal_rx, shutdown).await
}

/// Hold the negotiated session until `shutdown` completes or an error
/// arrives on `fatal`, then tear it down.
pub async fn wait<F>(
    mut client: WhepClient,
    mut fatal: mpsc::UnboundedReceiver<Error>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        Some(err) = fatal.recv() => {
            client.disconnect().await;
            Err(err)
        }
        _ = shutdown => {
            info!("Shutting down");
            client.disconnect().await;
            Ok(())
        }
    }
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C"),
        Err(e) => {
            // Without a signal handler there is nothing left to wait for.
            warn!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

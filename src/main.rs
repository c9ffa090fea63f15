use anyhow::Context;
use clap::Parser;

use whep_pull::{app, cli::Cli, util::init_log};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_log();

    app::run(&cli)
        .await
        .with_context(|| format!("Pulling stream from {} failed", cli.url))?;

    Ok(())
}

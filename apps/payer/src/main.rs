mod config;
mod provider;
mod runner;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tron::{TronProvider, TronWallet};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = config::load_config()?;

    let provider = TronProvider::new(
        &cfg.full_node_url,
        &cfg.solidity_node_url,
        cfg.token_contract,
    )?;

    let wallet = match cfg.wallet_private_key.as_deref() {
        Some(key) => TronWallet::from_hex(key).context("WALLET_PRIVATE_KEY")?,
        None => {
            let wallet = provider.generate_wallet();
            tracing::info!(address = %wallet.address(), "generated fresh wallet");
            wallet
        }
    };

    tracing::info!(
        address = %wallet.address(),
        destination = %cfg.destination,
        token_contract = %cfg.token_contract,
        asset = ?cfg.asset,
        full_node = %cfg.full_node_url,
        solidity_node = %cfg.solidity_node_url,
        "payer starting"
    );
    let orchestrator = runner::Orchestrator::new(
        provider,
        wallet,
        cfg.destination,
        cfg.asset,
        cfg.poll_interval,
    );

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(err) = shutdown_signal().await {
                tracing::warn!(err = %err, "signal handler failed");
            }
            shutdown.cancel();
        });
    }

    match orchestrator.run(shutdown).await? {
        Some(txid) => tracing::info!(%txid, "transfer complete"),
        None => tracing::info!("shutdown before a transfer completed"),
    }
    Ok(())
}

async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).context("install SIGTERM handler")?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.context("ctrl-c")?;
        Ok(())
    }
}

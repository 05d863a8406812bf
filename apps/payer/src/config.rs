use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tron::TronAddress;

/// Which balance the orchestrator watches and sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Native,
    Token,
}

impl AssetKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "native" | "trx" => Ok(Self::Native),
            "token" | "trc20" => Ok(Self::Token),
            other => anyhow::bail!("invalid ASSET value: {other} (expected native|token)"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Env {
    full_node_url: String,
    solidity_node_url: String,
    token_contract_address: String,
    destination_address: String,
    /// 64 hex chars; empty generates a fresh wallet at startup.
    wallet_private_key: String,
    poll_interval_secs: u64,
    asset: String,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            full_node_url: DEFAULT_NODE_URL.to_string(),
            solidity_node_url: DEFAULT_NODE_URL.to_string(),
            token_contract_address: DEFAULT_TOKEN_CONTRACT.to_string(),
            destination_address: String::new(),
            wallet_private_key: String::new(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            asset: "token".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub full_node_url: String,
    pub solidity_node_url: String,
    pub token_contract: TronAddress,
    pub destination: TronAddress,
    pub wallet_private_key: Option<String>,
    pub poll_interval: Duration,
    pub asset: AssetKind,
}

pub fn load_config() -> Result<AppConfig> {
    let env: Env = envy::from_env().context("load env config")?;
    build(env)
}

fn build(env: Env) -> Result<AppConfig> {
    if env.destination_address.trim().is_empty() {
        anyhow::bail!("DESTINATION_ADDRESS must be set");
    }

    let token_contract: TronAddress = env
        .token_contract_address
        .trim()
        .parse()
        .context("TOKEN_CONTRACT_ADDRESS")?;
    let destination: TronAddress = env
        .destination_address
        .trim()
        .parse()
        .context("DESTINATION_ADDRESS")?;

    let wallet_private_key = match env.wallet_private_key.trim() {
        "" => None,
        key => Some(key.to_string()),
    };

    Ok(AppConfig {
        full_node_url: env.full_node_url.trim().to_string(),
        solidity_node_url: env.solidity_node_url.trim().to_string(),
        token_contract,
        destination,
        wallet_private_key,
        poll_interval: Duration::from_secs(env.poll_interval_secs.max(1)),
        asset: AssetKind::parse(&env.asset).context("ASSET")?,
    })
}

const DEFAULT_NODE_URL: &str = "https://api.trongrid.io";
// USDT mainnet contract.
const DEFAULT_TOKEN_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

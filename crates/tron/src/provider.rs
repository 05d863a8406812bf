use crate::address::TronAddress;
use crate::error::Result;
use crate::node::{CreateTransactionRequest, NodeClient, TriggerSmartContractRequest};
use crate::wallet::TronWallet;
use crate::{abi, amount, signer};
use alloy::primitives::U256;
use rust_decimal::Decimal;

/// Upper bound (sun) the node may burn executing a token transfer.
pub const TOKEN_TRANSFER_FEE_LIMIT_SUN: u64 = 10_000_000_000;

/// The concrete Tron backend: the five operations a payment flow needs,
/// combining the address codec, payload builder, signer and node gateway.
pub struct TronProvider {
    node: NodeClient,
    token_contract: TronAddress,
}

impl TronProvider {
    pub fn new(
        full_node_url: &str,
        solidity_node_url: &str,
        token_contract: TronAddress,
    ) -> Result<Self> {
        Ok(Self {
            node: NodeClient::new(full_node_url, solidity_node_url)?,
            token_contract,
        })
    }

    pub fn token_contract(&self) -> TronAddress {
        self.token_contract
    }

    pub fn generate_wallet(&self) -> TronWallet {
        TronWallet::generate()
    }

    /// Native balance in TRX (sun / 10^6).
    pub async fn trx_balance(&self, address: &TronAddress) -> Result<Decimal> {
        let raw = self
            .node
            .eth_get_balance(&format!("0x{}", address.hex41()))
            .await?;
        amount::from_minor_units(amount::parse_hex_quantity(&raw)?)
    }

    /// Token balance via a `balanceOf` eth_call against the configured
    /// contract, normalized at the fixed 10^6 scale.
    pub async fn trc20_balance(&self, address: &TronAddress) -> Result<Decimal> {
        let raw = self
            .node
            .eth_call(
                &format!("0x{}", self.token_contract.evm_hex()),
                &abi::balance_of_call_data(address),
            )
            .await?;
        amount::from_minor_units(amount::parse_hex_quantity(&raw)?)
    }

    /// Builds, signs and broadcasts a native transfer; returns the
    /// broadcast txid.
    pub async fn send_trx(
        &self,
        wallet: &TronWallet,
        to: &TronAddress,
        amount: Decimal,
    ) -> Result<String> {
        let sun = amount::to_minor_units(amount)?;
        let req = CreateTransactionRequest {
            owner_address: wallet.address().to_base58check(),
            to_address: to.to_base58check(),
            amount: u64::try_from(sun)
                .map_err(|_| crate::error::Error::decode("amount", format!("{sun} sun exceeds u64")))?,
            visible: true,
        };
        let unsigned = self.node.create_transaction(&req).await?;
        let signed = signer::sign_raw_transaction(&unsigned, wallet.signing_key())?;
        self.node.broadcast_transaction(&signed).await
    }

    /// Builds, signs and broadcasts a token transfer; returns the
    /// broadcast txid.
    pub async fn send_trc20(
        &self,
        wallet: &TronWallet,
        to: &TronAddress,
        amount: Decimal,
    ) -> Result<String> {
        let units = amount::to_minor_units(amount)?;
        let req = TriggerSmartContractRequest {
            owner_address: wallet.address().hex41(),
            contract_address: self.token_contract.hex41(),
            function_selector: abi::TRANSFER_SELECTOR.to_string(),
            parameter: abi::transfer_call_data(to, U256::from(units)),
            call_value: 0,
            fee_limit: TOKEN_TRANSFER_FEE_LIMIT_SUN,
        };
        let unsigned = self.node.trigger_smart_contract(&req).await?;
        let signed = signer::sign_raw_transaction(&unsigned, wallet.signing_key())?;
        self.node.broadcast_transaction(&signed).await
    }
}

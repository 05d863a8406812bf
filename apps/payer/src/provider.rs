use rust_decimal::Decimal;
use tron::{TronAddress, TronWallet};

/// The narrow ledger surface the orchestrator drives: exactly the five
/// operations a balance-triggered payment needs. Another ledger backend
/// can slot in without touching the orchestrator.
pub trait Provider {
    fn generate_wallet(&self) -> TronWallet;

    async fn native_balance(&self, address: &TronAddress) -> tron::Result<Decimal>;

    async fn native_send(
        &self,
        wallet: &TronWallet,
        to: &TronAddress,
        amount: Decimal,
    ) -> tron::Result<String>;

    async fn token_balance(&self, address: &TronAddress) -> tron::Result<Decimal>;

    async fn token_send(
        &self,
        wallet: &TronWallet,
        to: &TronAddress,
        amount: Decimal,
    ) -> tron::Result<String>;
}

impl Provider for tron::TronProvider {
    fn generate_wallet(&self) -> TronWallet {
        tron::TronProvider::generate_wallet(self)
    }

    async fn native_balance(&self, address: &TronAddress) -> tron::Result<Decimal> {
        self.trx_balance(address).await
    }

    async fn native_send(
        &self,
        wallet: &TronWallet,
        to: &TronAddress,
        amount: Decimal,
    ) -> tron::Result<String> {
        self.send_trx(wallet, to, amount).await
    }

    async fn token_balance(&self, address: &TronAddress) -> tron::Result<Decimal> {
        self.trc20_balance(address).await
    }

    async fn token_send(
        &self,
        wallet: &TronWallet,
        to: &TronAddress,
        amount: Decimal,
    ) -> tron::Result<String> {
        self.send_trc20(wallet, to, amount).await
    }
}

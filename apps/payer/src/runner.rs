use crate::config::AssetKind;
use crate::provider::Provider;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tron::{TronAddress, TronWallet};

/// Drives one balance-triggered transfer to completion: observe balances,
/// wait until the watched balance is funded, then build/sign/broadcast the
/// full balance to the destination. Retryable failures loop back to a full
/// re-observation (an intervening balance change would make the previously
/// built transaction stale); fatal decode/signing failures terminate.
pub struct Orchestrator<P> {
    provider: P,
    wallet: TronWallet,
    destination: TronAddress,
    asset: AssetKind,
    backoff: Duration,
}

impl<P: Provider> Orchestrator<P> {
    pub fn new(
        provider: P,
        wallet: TronWallet,
        destination: TronAddress,
        asset: AssetKind,
        backoff: Duration,
    ) -> Self {
        Self {
            provider,
            wallet,
            destination,
            asset,
            backoff,
        }
    }

    /// Runs until one transfer broadcasts successfully (`Some(txid)`) or
    /// the token is cancelled (`None`). Balance-query failures abort the
    /// whole run; transfer failures only abort when fatal.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<Option<String>> {
        let address = self.wallet.address();
        loop {
            if shutdown.is_cancelled() {
                return Ok(None);
            }

            let native = self
                .provider
                .native_balance(&address)
                .await
                .context("query native balance")?;
            let token = self
                .provider
                .token_balance(&address)
                .await
                .context("query token balance")?;
            tracing::info!(%address, %native, %token, "observed balances");

            let spendable = match self.asset {
                AssetKind::Native => native,
                AssetKind::Token => token,
            };
            if spendable.is_zero() {
                tracing::info!(delay = ?self.backoff, "nothing to send: balance is zero");
                if !self.sleep_backoff(&shutdown).await {
                    return Ok(None);
                }
                continue;
            }

            let sent = match self.asset {
                AssetKind::Native => {
                    self.provider
                        .native_send(&self.wallet, &self.destination, spendable)
                        .await
                }
                AssetKind::Token => {
                    self.provider
                        .token_send(&self.wallet, &self.destination, spendable)
                        .await
                }
            };
            match sent {
                Ok(txid) => {
                    tracing::info!(%txid, destination = %self.destination, "transfer broadcast");
                    return Ok(Some(txid));
                }
                Err(err) if err.is_fatal() => {
                    return Err(err).context("transfer failed");
                }
                Err(err) => {
                    tracing::warn!(err = %err, delay = ?self.backoff, "transfer attempt failed; re-observing");
                    if !self.sleep_backoff(&shutdown).await {
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Returns false when cancelled during the wait.
    async fn sleep_backoff(&self, shutdown: &CancellationToken) -> bool {
        tokio::select! {
            _ = shutdown.cancelled() => false,
            _ = tokio::time::sleep(self.backoff) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use rust_decimal::Decimal;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tron::Error;

    const DESTINATION: &str = "TJ3VtXGnuGJQTBqNzqA7TPtvAC999bfTAX";

    /// Scripted backend: balances and send outcomes are consumed in order;
    /// an exhausted script surfaces as a balance error so a miscounted test
    /// fails loudly instead of spinning.
    struct ScriptedProvider {
        token_balances: Mutex<VecDeque<Decimal>>,
        send_results: Mutex<VecDeque<tron::Result<String>>>,
        sends: Mutex<Vec<(AssetKind, TronAddress, Decimal)>>,
    }

    impl ScriptedProvider {
        fn new(
            token_balances: impl IntoIterator<Item = Decimal>,
            send_results: impl IntoIterator<Item = tron::Result<String>>,
        ) -> Self {
            Self {
                token_balances: Mutex::new(token_balances.into_iter().collect()),
                send_results: Mutex::new(send_results.into_iter().collect()),
                sends: Mutex::new(Vec::new()),
            }
        }

        fn sends(&self) -> Vec<(AssetKind, TronAddress, Decimal)> {
            self.sends.lock().unwrap().clone()
        }

        fn pop_send_result(&self, op: &'static str) -> tron::Result<String> {
            self.send_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ScriptedProvider::exhausted(op)))
        }

        fn exhausted(op: &'static str) -> Error {
            Error::Protocol {
                op,
                status: 0,
                body: "script exhausted".to_string(),
            }
        }
    }

    impl Provider for &ScriptedProvider {
        fn generate_wallet(&self) -> TronWallet {
            TronWallet::generate()
        }

        async fn native_balance(&self, _address: &TronAddress) -> tron::Result<Decimal> {
            Ok(Decimal::ONE)
        }

        async fn native_send(
            &self,
            _wallet: &TronWallet,
            to: &TronAddress,
            amount: Decimal,
        ) -> tron::Result<String> {
            self.sends
                .lock()
                .unwrap()
                .push((AssetKind::Native, *to, amount));
            self.pop_send_result("native_send")
        }

        async fn token_balance(&self, _address: &TronAddress) -> tron::Result<Decimal> {
            self.token_balances
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ScriptedProvider::exhausted("token_balance"))
        }

        async fn token_send(
            &self,
            _wallet: &TronWallet,
            to: &TronAddress,
            amount: Decimal,
        ) -> tron::Result<String> {
            self.sends
                .lock()
                .unwrap()
                .push((AssetKind::Token, *to, amount));
            self.pop_send_result("token_send")
        }
    }

    fn orchestrator(provider: &ScriptedProvider) -> Orchestrator<&ScriptedProvider> {
        orchestrator_for(provider, AssetKind::Token)
    }

    fn orchestrator_for(
        provider: &ScriptedProvider,
        asset: AssetKind,
    ) -> Orchestrator<&ScriptedProvider> {
        Orchestrator::new(
            provider,
            TronWallet::generate(),
            DESTINATION.parse().unwrap(),
            asset,
            Duration::from_secs(5),
        )
    }

    fn protocol_err(status: u16) -> Error {
        Error::Protocol {
            op: "createtransaction",
            status,
            body: "node unhappy".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_balance_loops_without_sending_until_funded() {
        let provider = ScriptedProvider::new(
            [Decimal::ZERO, Decimal::ZERO, Decimal::from(5)],
            [Ok("feed1234".to_string())],
        );
        let txid = orchestrator(&provider)
            .run(CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(txid.as_deref(), Some("feed1234"));

        // No build/sign/broadcast happened while the balance was zero.
        let sends = provider.sends();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].0, AssetKind::Token);
        assert_eq!(sends[0].1.to_base58check(), DESTINATION);
        assert_eq!(sends[0].2, Decimal::from(5));
        assert!(provider.token_balances.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn native_asset_sweeps_the_native_balance() {
        // The scripted native balance is a constant 1 TRX.
        let provider = ScriptedProvider::new([Decimal::ZERO], [Ok("ntv42".to_string())]);
        let txid = orchestrator_for(&provider, AssetKind::Native)
            .run(CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(txid.as_deref(), Some("ntv42"));

        let sends = provider.sends();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].0, AssetKind::Native);
        assert_eq!(sends[0].2, Decimal::ONE);
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_failure_reobserves_then_succeeds() {
        let provider = ScriptedProvider::new(
            [Decimal::from(5), Decimal::from(5)],
            [Err(protocol_err(500)), Ok("abc123".to_string())],
        );
        let txid = orchestrator(&provider)
            .run(CancellationToken::new())
            .await
            .unwrap();
        // The txid surfaced is the gateway's, unchanged.
        assert_eq!(txid.as_deref(), Some("abc123"));
        // Both attempts re-observed the balance first.
        assert_eq!(provider.sends().len(), 2);
        assert!(provider.token_balances.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_signing_error_terminates() {
        let provider = ScriptedProvider::new(
            [Decimal::from(5)],
            [Err(Error::Signing {
                message: "bad key".to_string(),
            })],
        );
        let err = orchestrator(&provider)
            .run(CancellationToken::new())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("signing"));
        assert_eq!(provider.sends().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn balance_query_failure_aborts_the_run() {
        // Empty balance script: the first observation fails.
        let provider = ScriptedProvider::new([], []);
        let err = orchestrator(&provider)
            .run(CancellationToken::new())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("query token balance"));
        assert!(provider.sends().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_before_observing() {
        let provider = ScriptedProvider::new([Decimal::from(5)], [Ok("unused".to_string())]);
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let txid = orchestrator(&provider).run(shutdown).await.unwrap();
        assert!(txid.is_none());
        assert!(provider.sends().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_backoff_is_honored() {
        let provider = ScriptedProvider::new(
            [Decimal::ZERO, Decimal::ZERO],
            [],
        );
        let shutdown = CancellationToken::new();
        let cancel = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            cancel.cancel();
        });
        let txid = orchestrator(&provider).run(shutdown).await.unwrap();
        assert!(txid.is_none());
        assert!(provider.sends().is_empty());
    }
}

//! Tron payment core: address codec, `transfer(address,uint256)` payload
//! building, transaction signing, and the HTTP gateway to a full/solidity
//! node pair.
//!
//! The crate deliberately does not validate node responses against
//! consensus rules and supports exactly one token call shape; anything
//! beyond assembling, signing and broadcasting a transfer lives with the
//! caller.

pub mod abi;
pub mod address;
pub mod amount;
pub mod error;
pub mod node;
pub mod provider;
pub mod signer;
pub mod wallet;

pub use address::TronAddress;
pub use error::{Error, Result};
pub use node::{CreateTransactionRequest, NodeClient, RawTransaction, SignedTransaction,
    TriggerSmartContractRequest};
pub use provider::TronProvider;
pub use wallet::TronWallet;

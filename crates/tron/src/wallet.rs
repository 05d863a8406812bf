use crate::address::TronAddress;
use crate::error::{Error, Result};
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use std::fmt;

/// A keypair-backed account: secp256k1 key material plus the address
/// deterministically derived from it. Held in memory only, never persisted.
#[derive(Clone)]
pub struct TronWallet {
    key: SigningKey,
    address: TronAddress,
}

impl TronWallet {
    pub fn new(secret: [u8; 32]) -> Result<Self> {
        let key = SigningKey::from_slice(&secret).map_err(|e| Error::Signing {
            message: format!("invalid private key: {e}"),
        })?;
        let address = TronAddress::from_verifying_key(key.verifying_key());
        Ok(Self { key, address })
    }

    /// Imports a 64-hex-char private key.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| Error::decode("private key", e))?;
        let secret: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            Error::decode(
                "private key",
                format!("{} bytes, expected 32", bytes.len()),
            )
        })?;
        Self::new(secret)
    }

    /// Generates a fresh random wallet.
    pub fn generate() -> Self {
        let key = SigningKey::random(&mut OsRng);
        let address = TronAddress::from_verifying_key(key.verifying_key());
        Self { key, address }
    }

    pub fn address(&self) -> TronAddress {
        self.address
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.key.to_bytes())
    }
}

// Never print key material.
impl fmt::Debug for TronWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TronWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

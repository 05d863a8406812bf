use crate::error::{Error, Result};
use alloy::primitives::keccak256;
use k256::ecdsa::VerifyingKey;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Network prefix byte for Tron mainnet accounts.
pub const ADDRESS_PREFIX: u8 = 0x41;

const PREFIXED_LEN: usize = 21;
const CHECKSUM_LEN: usize = 4;

/// A Tron account address: the `0x41` network prefix plus a 20-byte account
/// id derived from a secp256k1 public key.
///
/// Two interchangeable representations exist. The user form is base58check
/// (`T...`) with a 4-byte sha256d checksum appended before encoding. The
/// call form is plain hex of the 21 prefixed bytes with no checksum, used
/// as a contract/account parameter; the checksum is a detail of the
/// user-facing encoding and never appears in call-form output.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TronAddress([u8; PREFIXED_LEN]);

impl TronAddress {
    pub fn from_prefixed_bytes(bytes: [u8; PREFIXED_LEN]) -> Result<Self> {
        if bytes[0] != ADDRESS_PREFIX {
            return Err(Error::decode(
                "address",
                format!("unexpected network prefix 0x{:02x}", bytes[0]),
            ));
        }
        Ok(Self(bytes))
    }

    /// Decodes and checksum-verifies a user-form (base58check) address.
    pub fn from_base58check(s: &str) -> Result<Self> {
        let payload = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|e| Error::decode("base58 address", e))?;
        let bytes: [u8; PREFIXED_LEN] = payload.as_slice().try_into().map_err(|_| {
            Error::decode(
                "base58 address",
                format!("payload is {} bytes, expected {PREFIXED_LEN}", payload.len()),
            )
        })?;
        Self::from_prefixed_bytes(bytes)
    }

    /// Derives the address for a secp256k1 public key: keccak256 of the
    /// uncompressed point (without the 0x04 tag), last 20 bytes, prefixed.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let digest = keccak256(&point.as_bytes()[1..]);
        let mut out = [0u8; PREFIXED_LEN];
        out[0] = ADDRESS_PREFIX;
        out[1..].copy_from_slice(&digest[12..]);
        Self(out)
    }

    pub fn prefixed_bytes(&self) -> [u8; PREFIXED_LEN] {
        self.0
    }

    /// Call form including the network prefix: 42 lowercase hex chars.
    pub fn hex41(&self) -> String {
        hex::encode(self.0)
    }

    /// The 20-byte account id as 40 lowercase hex chars (EVM-style slot
    /// contents, no prefix).
    pub fn evm_hex(&self) -> String {
        hex::encode(&self.0[1..])
    }

    /// User form: checksum is the first 4 bytes of sha256(sha256(payload)),
    /// appended before base58 encoding.
    pub fn to_base58check(&self) -> String {
        let check = Sha256::digest(Sha256::digest(self.0));
        let mut payload = self.0.to_vec();
        payload.extend_from_slice(&check[..CHECKSUM_LEN]);
        bs58::encode(payload).into_string()
    }
}

impl FromStr for TronAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base58check(s)
    }
}

impl fmt::Display for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58check())
    }
}

impl fmt::Debug for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TronAddress({})", self.to_base58check())
    }
}

use crate::error::{Error, Result};
use alloy::primitives::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Both TRX (sun) and the supported token use a fixed 10^6 minor-unit scale.
/// The token's actual on-chain decimals are deliberately not queried.
pub const MINOR_UNITS_PER_WHOLE: u64 = 1_000_000;

/// Reported balances are rounded to this many decimal places.
const BALANCE_PRECISION: u32 = 18;

fn denomination() -> Decimal {
    Decimal::from(MINOR_UNITS_PER_WHOLE)
}

/// Converts a decimal amount to integer minor units, truncating any
/// fractional minor unit. `1.9999995` becomes `1999999`, not `2000000`;
/// callers that care about the dropped dust must round before calling.
pub fn to_minor_units(amount: Decimal) -> Result<u128> {
    if amount.is_sign_negative() {
        return Err(Error::decode("amount", format!("negative amount {amount}")));
    }
    (amount * denomination())
        .trunc()
        .to_u128()
        .ok_or_else(|| Error::decode("amount", format!("{amount} out of range")))
}

/// Converts integer minor units back to a decimal amount, dividing by 10^6
/// and rounding to 18 decimal places.
pub fn from_minor_units(minor: U256) -> Result<Decimal> {
    let minor = u128::try_from(minor)
        .map_err(|_| Error::decode("balance", format!("{minor} exceeds u128")))?;
    let minor = Decimal::from_u128(minor)
        .ok_or_else(|| Error::decode("balance", format!("{minor} exceeds decimal range")))?;
    Ok((minor / denomination()).round_dp(BALANCE_PRECISION))
}

/// Parses a `0x`-prefixed hex quantity as returned by the node's JSON-RPC
/// surface. Anything shorter than `0x` plus one digit is rejected rather
/// than treated as zero.
pub fn parse_hex_quantity(s: &str) -> Result<U256> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::decode("hex quantity", format!("not a 0x hex number: {trimmed:?}")))?;
    U256::from_str_radix(digits, 16)
        .map_err(|e| Error::decode("hex quantity", format!("{trimmed:?}: {e}")))
}

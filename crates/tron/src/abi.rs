use crate::address::TronAddress;
use alloy::primitives::U256;

/// Selector string passed to the node in the `function_selector` field; the
/// node derives the 4-byte selector itself, so the parameter hex below never
/// embeds it.
pub const TRANSFER_SELECTOR: &str = "transfer(address,uint256)";

/// 4-byte selector for `balanceOf(address)`.
pub const BALANCE_OF_SELECTOR: &str = "70a08231";

/// 24 zero hex chars: the padding that lifts a 20-byte address to a 32-byte
/// ABI slot.
const ADDRESS_SLOT_PAD: &str = "000000000000000000000000";

const SLOT_HEX_LEN: usize = 64;

/// Encodes the two parameters of `transfer(address,uint256)` as a single
/// hex string: the recipient's account id padded to 32 bytes, then the
/// amount as a left-zero-padded 256-bit big-endian integer.
pub fn transfer_call_data(to: &TronAddress, amount_minor: U256) -> String {
    let amount_hex = format!("{amount_minor:x}");
    // `{:0>64}` leaves a full-width value untouched, so the pad count can
    // never go negative even when the amount already fills the slot.
    format!("{ADDRESS_SLOT_PAD}{}{amount_hex:0>SLOT_HEX_LEN$}", to.evm_hex())
}

/// Call data for a `balanceOf(address)` query via `eth_call`: the fixed
/// selector followed by the padded account id.
pub fn balance_of_call_data(owner: &TronAddress) -> String {
    format!("0x{BALANCE_OF_SELECTOR}{ADDRESS_SLOT_PAD}{}", owner.evm_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest() -> TronAddress {
        TronAddress::from_base58check("TJ3VtXGnuGJQTBqNzqA7TPtvAC999bfTAX").unwrap()
    }

    #[test]
    fn both_slots_are_exactly_64_hex_chars() {
        for amount in [U256::ZERO, U256::from(1u64), U256::MAX] {
            let data = transfer_call_data(&dest(), amount);
            assert_eq!(data.len(), 128);
            assert_eq!(&data[..24], ADDRESS_SLOT_PAD);
            assert_eq!(&data[24..64], dest().evm_hex());
            assert_eq!(data[64..].len(), 64);
        }
    }

    #[test]
    fn amount_slot_is_big_endian_left_padded() {
        let data = transfer_call_data(&dest(), U256::from(5_000_000u64));
        let amount_slot = &data[64..];
        assert!(amount_slot.starts_with("00"));
        assert!(amount_slot.ends_with("4c4b40"));
        assert_eq!(
            U256::from_str_radix(amount_slot, 16).unwrap(),
            U256::from(5_000_000u64)
        );
    }

    #[test]
    fn full_width_amount_needs_no_padding() {
        let data = transfer_call_data(&dest(), U256::MAX);
        assert_eq!(&data[64..], "f".repeat(64));
    }

    #[test]
    fn no_selector_is_embedded_in_the_parameter() {
        let data = transfer_call_data(&dest(), U256::from(1u64));
        assert!(!data.starts_with("a9059cbb"));
        assert!(data.starts_with(ADDRESS_SLOT_PAD));
    }

    #[test]
    fn balance_of_call_data_has_selector_then_padded_address() {
        let data = balance_of_call_data(&dest());
        assert_eq!(data.len(), 2 + 8 + 24 + 40);
        assert!(data.starts_with("0x70a08231"));
        assert!(data.ends_with(&dest().evm_hex()));
    }
}

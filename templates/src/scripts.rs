//! Script template generators.

use coin_toss_common::Address;

use crate::{assets, bind, AddressBindings};

/// Script drawing one value from a throwaway generator built from
/// (seed, salt) arguments.
pub fn next_uint64_new_prg(prg_address: Address) -> Vec<u8> {
    bind_prg(assets::SCRIPT_NEXT_UINT64_NEW_PRG, prg_address)
}

/// Script peeking the next value of the generator stored under an account.
pub fn next_uint64_from_address(prg_address: Address) -> Vec<u8> {
    bind_prg(assets::SCRIPT_NEXT_UINT64_FROM_ADDRESS, prg_address)
}

/// Script reading the half-open range [from, upTo) of an account's result
/// log.
pub fn get_results_in_range(prg_address: Address) -> Vec<u8> {
    bind_prg(assets::SCRIPT_GET_RESULTS_IN_RANGE, prg_address)
}

/// Script reading the length of an account's result log.
pub fn get_result_count(prg_address: Address) -> Vec<u8> {
    bind_prg(assets::SCRIPT_GET_RESULT_COUNT, prg_address)
}

/// Script reading the coin toss prize pool balance.
pub fn get_prize_pool(coin_toss_address: Address) -> Vec<u8> {
    let bindings = AddressBindings::new().with_coin_toss(coin_toss_address);
    bind(assets::SCRIPT_GET_PRIZE_POOL, &bindings).into_bytes()
}

/// Script reading the randomness source sealed for a block height.
pub fn get_source_of_randomness(random_beacon_history_address: Address) -> Vec<u8> {
    let bindings =
        AddressBindings::new().with_random_beacon_history(random_beacon_history_address);
    bind(assets::SCRIPT_GET_SOURCE_OF_RANDOMNESS, &bindings).into_bytes()
}

fn bind_prg(source: &str, prg_address: Address) -> Vec<u8> {
    let bindings = AddressBindings::new().with_pseudo_random_generator(prg_address);
    bind(source, &bindings).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_next_uint64_new_prg() {
        let prg = Address::from_u64(1);
        let script = String::from_utf8(next_uint64_new_prg(prg)).unwrap();
        assert!(script.contains(&prg.to_string()));
        assert!(!script.contains("\"PseudoRandomGenerator\""));
    }

    #[test]
    fn test_generate_get_results_in_range() {
        let prg = Address::from_u64(2);
        let script = String::from_utf8(get_results_in_range(prg)).unwrap();
        assert!(script.contains(&prg.to_string()));
    }

    #[test]
    fn test_generate_get_prize_pool() {
        let coin_toss = Address::from_u64(3);
        let script = String::from_utf8(get_prize_pool(coin_toss)).unwrap();
        assert!(script.contains(&coin_toss.to_string()));
    }
}

//! Transaction template generators.

use coin_toss_common::Address;

use crate::{assets, bind, AddressBindings};

/// Transaction initializing a generator under the signer's account from
/// (seed, salt) arguments.
pub fn setup_prg(prg_address: Address) -> Vec<u8> {
    bind_prg(assets::TRANSACTION_SETUP_PRG, prg_address)
}

/// Transaction advancing the signer's stored generator `generationLength`
/// times, appending each drawn value to the result log.
pub fn next_uint64(prg_address: Address) -> Vec<u8> {
    bind_prg(assets::TRANSACTION_NEXT_UINT64, prg_address)
}

/// Transaction committing a bet against the coin toss contract.
pub fn flip_coin(coin_toss_address: Address) -> Vec<u8> {
    bind_coin_toss(assets::TRANSACTION_FLIP_COIN, coin_toss_address)
}

/// Transaction settling a previously committed bet.
pub fn reveal_coin(coin_toss_address: Address) -> Vec<u8> {
    bind_coin_toss(assets::TRANSACTION_REVEAL_COIN, coin_toss_address)
}

/// Transaction depositing into the coin toss prize pool.
pub fn fund_prize_pool(coin_toss_address: Address) -> Vec<u8> {
    bind_coin_toss(assets::TRANSACTION_FUND_PRIZE_POOL, coin_toss_address)
}

fn bind_prg(source: &str, prg_address: Address) -> Vec<u8> {
    let bindings = AddressBindings::new().with_pseudo_random_generator(prg_address);
    bind(source, &bindings).into_bytes()
}

fn bind_coin_toss(source: &str, coin_toss_address: Address) -> Vec<u8> {
    let bindings = AddressBindings::new().with_coin_toss(coin_toss_address);
    bind(source, &bindings).into_bytes()
}

//! Embedded source assets.
//!
//! Every contract, script and transaction source in the repository is
//! compiled into the binary and registered under its repository-relative
//! logical name. The backing store is immutable; lookups are read-only and
//! safe to share across threads.

use indexmap::IndexMap;
use lazy_static::lazy_static;

use crate::TemplateError;

pub const CONTRACT_FUNGIBLE_TOKEN: &str =
    include_str!("../../contracts/utility/FungibleToken.cdc");
pub const CONTRACT_NON_FUNGIBLE_TOKEN: &str =
    include_str!("../../contracts/utility/NonFungibleToken.cdc");
pub const CONTRACT_VIEW_RESOLVER: &str = include_str!("../../contracts/utility/ViewResolver.cdc");
pub const CONTRACT_METADATA_VIEWS: &str = include_str!("../../contracts/utility/MetadataViews.cdc");
pub const CONTRACT_RANDOM_BEACON_HISTORY: &str =
    include_str!("../../contracts/RandomBeaconHistory.cdc");
pub const CONTRACT_PSEUDO_RANDOM_GENERATOR: &str =
    include_str!("../../contracts/PseudoRandomGenerator.cdc");
pub const CONTRACT_COIN_TOSS: &str = include_str!("../../contracts/CoinToss.cdc");

pub const SCRIPT_NEXT_UINT64_NEW_PRG: &str =
    include_str!("../../scripts/pseudo-random-generator/next_uint64_new_prg.cdc");
pub const SCRIPT_NEXT_UINT64_FROM_ADDRESS: &str =
    include_str!("../../scripts/pseudo-random-generator/next_uint64_from_address.cdc");
pub const SCRIPT_GET_RESULTS_IN_RANGE: &str =
    include_str!("../../scripts/pseudo-random-generator/get_results_in_range.cdc");
pub const SCRIPT_GET_RESULT_COUNT: &str =
    include_str!("../../scripts/pseudo-random-generator/get_result_count.cdc");
pub const SCRIPT_GET_PRIZE_POOL: &str = include_str!("../../scripts/coin-toss/get_prize_pool.cdc");
pub const SCRIPT_GET_SOURCE_OF_RANDOMNESS: &str =
    include_str!("../../scripts/random-beacon-history/get_source_of_randomness.cdc");

pub const TRANSACTION_SETUP_PRG: &str =
    include_str!("../../transactions/pseudo-random-generator/setup_prg.cdc");
pub const TRANSACTION_NEXT_UINT64: &str =
    include_str!("../../transactions/pseudo-random-generator/next_uint64.cdc");
pub const TRANSACTION_FLIP_COIN: &str = include_str!("../../transactions/coin-toss/flip_coin.cdc");
pub const TRANSACTION_REVEAL_COIN: &str =
    include_str!("../../transactions/coin-toss/reveal_coin.cdc");
pub const TRANSACTION_FUND_PRIZE_POOL: &str =
    include_str!("../../transactions/coin-toss/fund_prize_pool.cdc");

lazy_static! {
    static ref ASSETS: IndexMap<&'static str, &'static str> = IndexMap::from([
        ("contracts/utility/FungibleToken.cdc", CONTRACT_FUNGIBLE_TOKEN),
        (
            "contracts/utility/NonFungibleToken.cdc",
            CONTRACT_NON_FUNGIBLE_TOKEN
        ),
        ("contracts/utility/ViewResolver.cdc", CONTRACT_VIEW_RESOLVER),
        ("contracts/utility/MetadataViews.cdc", CONTRACT_METADATA_VIEWS),
        (
            "contracts/RandomBeaconHistory.cdc",
            CONTRACT_RANDOM_BEACON_HISTORY
        ),
        (
            "contracts/PseudoRandomGenerator.cdc",
            CONTRACT_PSEUDO_RANDOM_GENERATOR
        ),
        ("contracts/CoinToss.cdc", CONTRACT_COIN_TOSS),
        (
            "scripts/pseudo-random-generator/next_uint64_new_prg.cdc",
            SCRIPT_NEXT_UINT64_NEW_PRG
        ),
        (
            "scripts/pseudo-random-generator/next_uint64_from_address.cdc",
            SCRIPT_NEXT_UINT64_FROM_ADDRESS
        ),
        (
            "scripts/pseudo-random-generator/get_results_in_range.cdc",
            SCRIPT_GET_RESULTS_IN_RANGE
        ),
        (
            "scripts/pseudo-random-generator/get_result_count.cdc",
            SCRIPT_GET_RESULT_COUNT
        ),
        ("scripts/coin-toss/get_prize_pool.cdc", SCRIPT_GET_PRIZE_POOL),
        (
            "scripts/random-beacon-history/get_source_of_randomness.cdc",
            SCRIPT_GET_SOURCE_OF_RANDOMNESS
        ),
        (
            "transactions/pseudo-random-generator/setup_prg.cdc",
            TRANSACTION_SETUP_PRG
        ),
        (
            "transactions/pseudo-random-generator/next_uint64.cdc",
            TRANSACTION_NEXT_UINT64
        ),
        ("transactions/coin-toss/flip_coin.cdc", TRANSACTION_FLIP_COIN),
        (
            "transactions/coin-toss/reveal_coin.cdc",
            TRANSACTION_REVEAL_COIN
        ),
        (
            "transactions/coin-toss/fund_prize_pool.cdc",
            TRANSACTION_FUND_PRIZE_POOL
        ),
    ]);
}

/// Returns the embedded source registered under the given logical name.
///
/// # Errors
///
/// Returns [`TemplateError::NotFound`] if no asset carries that name.
pub fn get(name: &str) -> Result<&'static str, TemplateError> {
    ASSETS
        .get(name)
        .copied()
        .ok_or_else(|| TemplateError::NotFound(name.to_string()))
}

/// Logical names of all registered assets, in registration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    ASSETS.keys().copied()
}

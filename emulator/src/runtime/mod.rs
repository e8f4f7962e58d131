//! Native contract runtimes.
//!
//! Deployed sources stay opaque payloads; the behavior observable through
//! scripts and transactions comes from the runtime model matched to the
//! declared contract name at deployment. Contracts without a native model
//! (the utility interfaces) deploy as opaque: addressable and importable,
//! with no callable entry points.

mod beacon;
mod coin_toss;
mod prg;

pub use beacon::{BeaconRuntime, SOURCE_LENGTH};
pub use coin_toss::{CoinTossRuntime, Receipt, TossOutcome};
pub use prg::{Prg, PrgRuntime};

/// Behavior attached to a deployed contract.
#[derive(Debug, Clone)]
pub enum ContractRuntime {
    PseudoRandomGenerator(PrgRuntime),
    /// Reads the chain's randomness history; the history itself is chain
    /// state, not contract state.
    RandomBeaconHistory,
    CoinToss(CoinTossRuntime),
    /// Deployable source with no native behavior.
    Opaque,
}

impl ContractRuntime {
    /// Runtime model for a declared contract name.
    pub fn for_contract(name: &str) -> Self {
        match name {
            "PseudoRandomGenerator" => {
                ContractRuntime::PseudoRandomGenerator(PrgRuntime::default())
            }
            "RandomBeaconHistory" => ContractRuntime::RandomBeaconHistory,
            "CoinToss" => ContractRuntime::CoinToss(CoinTossRuntime::default()),
            _ => ContractRuntime::Opaque,
        }
    }
}

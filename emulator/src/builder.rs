//! Fluent construction of [`Emulator`] instances.

use std::sync::Arc;

use coin_toss_common::{config::EmulatorConfig, Address};

use crate::clock::{Clock, SystemClock};
use crate::emulator::{ChainState, Emulator};
use crate::runtime::{BeaconRuntime, SOURCE_LENGTH};

/// Builder for [`Emulator`] instances.
///
/// # Example
///
/// ```rust,ignore
/// let emulator = EmulatorBuilder::new()
///     .with_funded_account(Address::from_u64(1), 1_000_000)
///     .with_computation_limit(6_000)
///     .build();
/// ```
pub struct EmulatorBuilder {
    config: EmulatorConfig,
    clock: Option<Arc<dyn Clock>>,
    funded_accounts: Vec<(Address, u64)>,
    genesis_source: [u8; SOURCE_LENGTH],
}

impl EmulatorBuilder {
    /// Defaults: `EmulatorConfig::default()`, wall-clock time, no funded
    /// accounts, all-zero genesis randomness source.
    pub fn new() -> Self {
        Self {
            config: EmulatorConfig::default(),
            clock: None,
            funded_accounts: Vec::new(),
            genesis_source: [0; SOURCE_LENGTH],
        }
    }

    pub fn with_config(mut self, config: EmulatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the minimum accepted seed length.
    pub fn with_min_seed_length(mut self, length: usize) -> Self {
        self.config.min_seed_length = length;
        self
    }

    /// Overrides the per-call computation budget.
    pub fn with_computation_limit(mut self, limit: u64) -> Self {
        self.config.computation_limit = limit;
        self
    }

    /// Injects the block timestamp source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Adds a pre-funded account.
    pub fn with_funded_account(mut self, address: Address, balance: u64) -> Self {
        self.funded_accounts.push((address, balance));
        self
    }

    /// Seeds the randomness history, making every drawn outcome
    /// reproducible.
    pub fn with_genesis_source(mut self, source: [u8; SOURCE_LENGTH]) -> Self {
        self.genesis_source = source;
        self
    }

    pub fn build(self) -> Emulator {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let beacon = BeaconRuntime::new(self.genesis_source);
        Emulator::new(ChainState::new(
            self.config,
            clock,
            self.funded_accounts,
            beacon,
        ))
    }
}

impl Default for EmulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

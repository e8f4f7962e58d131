//! Per-call computation metering.
//!
//! Every script and transaction runs against a fresh budget. The flat entry
//! cost plus one unit per generated or returned element is what forces bulk
//! operations to be chunked into batches on the caller side.

use coin_toss_common::config::COST_PER_ELEMENT;

use crate::error::EmulatorError;

/// Tracks computation spent by a single call against its limit.
#[derive(Debug)]
pub struct ComputationMeter {
    used: u64,
    limit: u64,
}

impl ComputationMeter {
    pub fn new(limit: u64) -> Self {
        Self { used: 0, limit }
    }

    /// Charges `units`, failing once the total passes the limit.
    pub fn charge(&mut self, units: u64) -> Result<(), EmulatorError> {
        self.used = self.used.saturating_add(units);
        if self.used > self.limit {
            return Err(EmulatorError::ComputationLimitExceeded {
                used: self.used,
                limit: self.limit,
            });
        }
        Ok(())
    }

    /// Charges the per-element cost for `count` elements.
    pub fn charge_elements(&mut self, count: u64) -> Result<(), EmulatorError> {
        self.charge(count.saturating_mul(COST_PER_ELEMENT))
    }

    pub fn used(&self) -> u64 {
        self.used
    }
}

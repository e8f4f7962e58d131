use serde::{Deserialize, Serialize};

// Generator rules
// The seed must carry at least as much entropy as the generator's internal
// state, which puts a floor on its length. The floor tracks the platform
// version, so it is configuration rather than a fixed property.
pub const DEFAULT_MIN_SEED_LENGTH: usize = 16;

// Each script or transaction runs against a per-call computation budget.
// Entering a call costs a flat amount, and every generated or returned
// element costs one more unit.
pub const COST_PER_CALL: u64 = 10;
pub const COST_PER_ELEMENT: u64 = 1;
pub const DEFAULT_COMPUTATION_LIMIT: u64 = 6_000;

// Bulk generation and retrieval are chunked so that each network call stays
// inside the computation budget. The batch size is tied to the limit above
// and moves with it.
pub const DEFAULT_GENERATION_BATCH_SIZE: u64 = 5_000;

/// Tunables of the emulated network.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Minimum accepted seed length in bytes.
    pub min_seed_length: usize,

    /// Computation budget for a single script or transaction call.
    pub computation_limit: u64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            min_seed_length: DEFAULT_MIN_SEED_LENGTH,
            computation_limit: DEFAULT_COMPUTATION_LIMIT,
        }
    }
}

/// Tunables of the test harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Number of elements generated or retrieved per network call when an
    /// operation is chunked into batches.
    pub generation_batch_size: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            generation_batch_size: DEFAULT_GENERATION_BATCH_SIZE,
        }
    }
}

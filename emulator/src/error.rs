use coin_toss_common::ValueError;
use thiserror::Error;

/// Failures surfaced by the emulated network.
///
/// Everything a deployed contract or the platform itself can object to is
/// reported through one of these kinds; callers decide whether a failure is
/// expected or fatal. Nothing is retried.
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// Seed shorter than the generator's minimum.
    #[error("invalid seed: {length} bytes is below the {minimum} byte minimum")]
    InvalidSeed { length: usize, minimum: usize },

    /// Range read past the end of a result log.
    #[error("index out of range: upTo {up_to} exceeds result count {length}")]
    IndexOutOfRange { up_to: u64, length: u64 },

    /// Call exceeded its computation budget.
    #[error("computation limit exceeded: {used} units used, limit is {limit}")]
    ComputationLimitExceeded { used: u64, limit: u64 },

    /// Deployment or execution failure reported by the platform, wrapping
    /// the underlying reason.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Malformed argument or return value encoding.
    #[error(transparent)]
    Value(#[from] ValueError),
}

impl EmulatorError {
    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        EmulatorError::Rejected(reason.into())
    }
}

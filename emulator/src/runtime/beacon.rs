//! Native model of the RandomBeaconHistory contract.
//!
//! One 32-byte randomness source per sealed block, hash-chained from a
//! seedable genesis value. Sources exist only for blocks that have closed;
//! asking for the current or a future height is rejected, which is what the
//! commit-and-reveal flow relies on.

use sha3::{Digest, Sha3_256};

use crate::error::EmulatorError;

/// Length of a randomness source in bytes.
pub const SOURCE_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct BeaconRuntime {
    /// Index = block height.
    sources: Vec<[u8; SOURCE_LENGTH]>,
}

impl BeaconRuntime {
    /// Starts the history with the genesis source at height 0.
    pub fn new(genesis_source: [u8; SOURCE_LENGTH]) -> Self {
        Self {
            sources: vec![genesis_source],
        }
    }

    /// Seals the next block's source, chained from the previous entry.
    pub fn seal_next(&mut self) {
        let previous = self.sources[self.sources.len() - 1];
        let height = self.sources.len() as u64;

        let mut hasher = Sha3_256::new();
        hasher.update(previous);
        hasher.update(height.to_le_bytes());
        self.sources.push(hasher.finalize().into());
    }

    /// Source sealed for the given height.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Rejected`] when the height has not been sealed yet.
    pub fn source_at(&self, height: u64) -> Result<[u8; SOURCE_LENGTH], EmulatorError> {
        self.sources.get(height as usize).copied().ok_or_else(|| {
            EmulatorError::rejected(format!(
                "randomness source not yet committed for height {height}"
            ))
        })
    }

    /// Highest sealed height.
    pub fn sealed_height(&self) -> u64 {
        (self.sources.len() - 1) as u64
    }
}

impl Default for BeaconRuntime {
    fn default() -> Self {
        Self::new([0; SOURCE_LENGTH])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_are_chained_and_stable() {
        let mut a = BeaconRuntime::new([7; SOURCE_LENGTH]);
        let mut b = BeaconRuntime::new([7; SOURCE_LENGTH]);
        a.seal_next();
        a.seal_next();
        b.seal_next();
        b.seal_next();

        assert_eq!(a.sealed_height(), 2);
        assert_eq!(a.source_at(1).unwrap(), b.source_at(1).unwrap());
        assert_ne!(a.source_at(1).unwrap(), a.source_at(2).unwrap());
    }

    #[test]
    fn test_unsealed_height_rejected() {
        let beacon = BeaconRuntime::default();
        assert!(beacon.source_at(0).is_ok());
        let err = beacon.source_at(1).unwrap_err();
        assert!(matches!(err, EmulatorError::Rejected(reason) if reason.contains("height 1")));
    }
}

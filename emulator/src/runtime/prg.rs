//! Native model of the PseudoRandomGenerator contract.

use indexmap::IndexMap;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha3::{Digest, Sha3_256};

use coin_toss_common::Address;

use crate::error::EmulatorError;

/// ChaCha20-backed generator state.
///
/// The key is derived from the seed by hashing, the salt selects the
/// stream, so the same (seed, salt) pair always reproduces the same value
/// sequence while distinct seeds or salts give independent streams.
#[derive(Debug, Clone)]
pub struct Prg {
    rng: ChaCha20Rng,
}

impl Prg {
    /// Builds a generator from seed entropy and a salt.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::InvalidSeed`] when the seed is shorter than
    /// `min_seed_length` bytes.
    pub fn new(seed: &[u8], salt: u64, min_seed_length: usize) -> Result<Self, EmulatorError> {
        if seed.len() < min_seed_length {
            return Err(EmulatorError::InvalidSeed {
                length: seed.len(),
                minimum: min_seed_length,
            });
        }

        let mut hasher = Sha3_256::new();
        hasher.update(seed);
        let key: [u8; 32] = hasher.finalize().into();

        let mut rng = ChaCha20Rng::from_seed(key);
        rng.set_stream(salt);
        Ok(Self { rng })
    }

    /// Advances the stream and returns the drawn value.
    pub fn next_uint64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// An account-resident generator with its ordered result log.
#[derive(Debug, Clone)]
struct StoredPrg {
    prg: Prg,
    results: Vec<u64>,
}

/// Contract state: one stored generator per account.
#[derive(Debug, Default, Clone)]
pub struct PrgRuntime {
    instances: IndexMap<Address, StoredPrg>,
}

impl PrgRuntime {
    /// Stores a fresh generator under `signer`, replacing any previous one.
    pub fn setup(
        &mut self,
        signer: Address,
        seed: &[u8],
        salt: u64,
        min_seed_length: usize,
    ) -> Result<(), EmulatorError> {
        let prg = Prg::new(seed, salt, min_seed_length)?;
        if self
            .instances
            .insert(
                signer,
                StoredPrg {
                    prg,
                    results: Vec::new(),
                },
            )
            .is_some()
        {
            log::debug!("replaced stored generator under {signer}");
        }
        Ok(())
    }

    /// Advances the generator stored under `signer` `count` times, appending
    /// each drawn value to its result log. Returns the new log length.
    pub fn generate(&mut self, signer: Address, count: u64) -> Result<u64, EmulatorError> {
        let stored = self
            .instances
            .get_mut(&signer)
            .ok_or_else(|| no_generator(signer))?;

        stored.results.reserve(count as usize);
        for _ in 0..count {
            let value = stored.prg.next_uint64();
            stored.results.push(value);
        }
        Ok(stored.results.len() as u64)
    }

    /// Reads the half-open range `[from, up_to)` of the log under `address`.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::IndexOutOfRange`] when `up_to` exceeds the log
    /// length; [`EmulatorError::Rejected`] for an inverted range or an
    /// account with no stored generator.
    pub fn results_in_range(
        &self,
        address: Address,
        from: u64,
        up_to: u64,
    ) -> Result<&[u64], EmulatorError> {
        let stored = self
            .instances
            .get(&address)
            .ok_or_else(|| no_generator(address))?;

        let length = stored.results.len() as u64;
        if up_to > length {
            return Err(EmulatorError::IndexOutOfRange { up_to, length });
        }
        if from > up_to {
            return Err(EmulatorError::rejected(format!(
                "invalid range: from {from} exceeds upTo {up_to}"
            )));
        }
        Ok(&stored.results[from as usize..up_to as usize])
    }

    /// Length of the result log under `address`.
    pub fn result_count(&self, address: Address) -> Result<u64, EmulatorError> {
        self.instances
            .get(&address)
            .map(|stored| stored.results.len() as u64)
            .ok_or_else(|| no_generator(address))
    }

    /// Next value of the generator under `address`, without advancing the
    /// stored state.
    pub fn peek_next(&self, address: Address) -> Result<u64, EmulatorError> {
        let stored = self
            .instances
            .get(&address)
            .ok_or_else(|| no_generator(address))?;
        Ok(stored.prg.clone().next_uint64())
    }
}

fn no_generator(address: Address) -> EmulatorError {
    EmulatorError::rejected(format!("no generator stored under {address}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: usize = 16;

    #[test]
    fn test_short_seed_rejected() {
        for length in [0, 1, 8, 15] {
            let err = Prg::new(&vec![7u8; length], 0, MIN).unwrap_err();
            assert!(matches!(
                err,
                EmulatorError::InvalidSeed { length: l, minimum: MIN } if l == length
            ));
        }
    }

    #[test]
    fn test_same_inputs_same_stream() {
        let seed = [42u8; 32];
        let mut a = Prg::new(&seed, 7, MIN).unwrap();
        let mut b = Prg::new(&seed, 7, MIN).unwrap();
        for _ in 0..16 {
            assert_eq!(a.next_uint64(), b.next_uint64());
        }
    }

    #[test]
    fn test_distinct_salts_distinct_streams() {
        let seed = [42u8; 32];
        let mut a = Prg::new(&seed, 1, MIN).unwrap();
        let mut b = Prg::new(&seed, 2, MIN).unwrap();
        assert_ne!(a.next_uint64(), b.next_uint64());
    }

    #[test]
    fn test_setup_generate_read_round_trip() {
        let signer = Address::from_u64(1);
        let mut runtime = PrgRuntime::default();
        runtime.setup(signer, &[9u8; 32], 3, MIN).unwrap();

        assert_eq!(runtime.generate(signer, 10).unwrap(), 10);
        assert_eq!(runtime.result_count(signer).unwrap(), 10);

        let all = runtime.results_in_range(signer, 0, 10).unwrap().to_vec();
        let head = runtime.results_in_range(signer, 0, 5).unwrap();
        assert_eq!(head, &all[..5]);

        let err = runtime.results_in_range(signer, 10, 11).unwrap_err();
        assert!(matches!(
            err,
            EmulatorError::IndexOutOfRange {
                up_to: 11,
                length: 10
            }
        ));
    }

    #[test]
    fn test_peek_matches_next_generated() {
        let signer = Address::from_u64(2);
        let mut runtime = PrgRuntime::default();
        runtime.setup(signer, &[1u8; 16], 0, MIN).unwrap();

        let peeked = runtime.peek_next(signer).unwrap();
        runtime.generate(signer, 1).unwrap();
        assert_eq!(runtime.results_in_range(signer, 0, 1).unwrap(), &[peeked]);
    }

    #[test]
    fn test_missing_generator_rejected() {
        let runtime = PrgRuntime::default();
        let err = runtime.result_count(Address::from_u64(5)).unwrap_err();
        assert!(matches!(err, EmulatorError::Rejected(_)));
    }
}

// File: testing-framework/src/utilities.rs
//
// Entropy helpers and logging setup shared across integration tests.

use rand::rngs::OsRng;
use rand::RngCore;

/// A random 32-byte seed from the OS CSPRNG.
pub fn random_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    seed
}

/// A random salt from the OS CSPRNG.
pub fn random_salt() -> u64 {
    OsRng.next_u64()
}

/// Initializes env_logger once per test binary; later calls are no-ops.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

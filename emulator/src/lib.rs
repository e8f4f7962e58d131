//! In-process emulated network for the coin toss contract suite.
//!
//! The emulator stands in for a real network during integration testing:
//! it tracks accounts and balances, deploys contract source, executes
//! read-only scripts, and processes signed transactions, one block per
//! transaction. Contract *sources* stay opaque payloads; behavior comes
//! from native runtime models matched by declared contract name (see
//! [`runtime`]), which keeps the address-binding step load-bearing:
//! source with unresolved imports is rejected at the network boundary,
//! never earlier.
//!
//! ## Example
//!
//! ```rust,ignore
//! use coin_toss_emulator::EmulatorBuilder;
//!
//! #[tokio::test]
//! async fn test_deploy() {
//!     let emulator = EmulatorBuilder::new().build();
//!     let address = emulator
//!         .deploy_contract(&coin_toss_templates::contracts::pseudo_random_generator())
//!         .await
//!         .unwrap();
//!
//!     // Execute scripts / submit transactions against it...
//! }
//! ```

mod account;
mod builder;
mod clock;
mod emulator;
mod error;
mod meter;
pub mod runtime;
pub mod source;

pub use account::Account;
pub use builder::EmulatorBuilder;
pub use clock::{Clock, FixedClock, SystemClock};
pub use emulator::{
    DeployedContract, Emulator, EmulatorCounters, ScriptResult, TransactionResult,
};
pub use error::EmulatorError;
pub use meter::ComputationMeter;

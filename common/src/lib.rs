//! Shared vocabulary of the coin toss contract harness: account addresses,
//! the typed value encoding used across the emulator boundary, and the
//! tunable constants the rest of the workspace builds on.

pub mod address;
pub mod config;
pub mod value;

pub use address::{Address, ADDRESS_SIZE};
pub use value::{Value, ValueError};

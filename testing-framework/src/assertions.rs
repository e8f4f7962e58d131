//! Assertion helpers over the emulator's state.
//!
//! These make integration tests read as intent and produce mismatch
//! messages with both sides of the comparison.

use anyhow::{Context, Result};

use coin_toss_common::Address;
use coin_toss_emulator::Emulator;

use crate::harness::CoinTossHarness;

/// Asserts an account holds exactly `expected_balance`.
pub async fn assert_balance(
    emulator: &Emulator,
    address: Address,
    expected_balance: u64,
) -> Result<()> {
    let actual = emulator
        .get_balance(address)
        .await
        .with_context(|| format!("failed to get balance for {address}"))?;

    if actual != expected_balance {
        anyhow::bail!("balance mismatch for {address}: expected {expected_balance}, got {actual}");
    }
    Ok(())
}

/// Asserts the chain is at exactly `expected_height`.
pub async fn assert_block_height(emulator: &Emulator, expected_height: u64) -> Result<()> {
    let actual = emulator.block_height().await;
    if actual != expected_height {
        anyhow::bail!("block height mismatch: expected {expected_height}, got {actual}");
    }
    Ok(())
}

/// Asserts the result log under `address` holds exactly `expected_count`
/// values.
pub async fn assert_result_count(
    harness: &CoinTossHarness,
    address: Address,
    expected_count: u64,
) -> Result<()> {
    let actual = harness
        .result_count(address)
        .await
        .with_context(|| format!("failed to get result count for {address}"))?;

    if actual != expected_count {
        anyhow::bail!(
            "result count mismatch for {address}: expected {expected_count}, got {actual}"
        );
    }
    Ok(())
}

/// Asserts the prize pool holds exactly `expected_balance`.
pub async fn assert_prize_pool(harness: &CoinTossHarness, expected_balance: u64) -> Result<()> {
    let actual = harness.prize_pool().await?;
    if actual != expected_balance {
        anyhow::bail!("prize pool mismatch: expected {expected_balance}, got {actual}");
    }
    Ok(())
}

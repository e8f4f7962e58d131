//! Native model of the CoinToss wagering contract.
//!
//! Flipping escrows the bet into the prize pool and issues a single-use
//! receipt bound to the committing block. Revealing consumes the receipt,
//! draws the outcome from the randomness source sealed in the following
//! block (salted with the receipt id), and pays double the bet on a win.

use indexmap::IndexMap;

use coin_toss_common::Address;

use crate::error::EmulatorError;
use crate::runtime::beacon::BeaconRuntime;
use crate::runtime::prg::Prg;

#[derive(Debug, Clone)]
pub struct Receipt {
    pub id: u64,
    pub bettor: Address,
    pub amount: u64,
    /// Block height the bet was committed in.
    pub committed_at: u64,
}

/// Outcome of a settled bet.
#[derive(Debug, Clone, Copy)]
pub struct TossOutcome {
    pub win: bool,
    /// Amount credited back to the bettor (2x the bet on a win, 0 on a
    /// loss).
    pub payout: u64,
}

#[derive(Debug, Default, Clone)]
pub struct CoinTossRuntime {
    /// Escrowed funds available for payouts.
    reserve: u64,
    next_receipt_id: u64,
    receipts: IndexMap<u64, Receipt>,
}

impl CoinTossRuntime {
    /// Escrows an already-debited bet and issues a receipt at the given
    /// block height.
    pub fn flip(&mut self, bettor: Address, amount: u64, committed_at: u64) -> u64 {
        let id = self.next_receipt_id;
        self.next_receipt_id += 1;
        self.reserve += amount;
        self.receipts.insert(
            id,
            Receipt {
                id,
                bettor,
                amount,
                committed_at,
            },
        );
        log::debug!("bet {id} of {amount} committed by {bettor} at height {committed_at}");
        id
    }

    /// Settles the bet behind `receipt_id`, consuming the receipt.
    ///
    /// The caller credits `TossOutcome::payout` back to the bettor.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Rejected`] for an unknown or spent receipt, a
    /// bettor other than the receipt holder, a reveal before the next
    /// block's randomness is sealed, or a pool too small to cover the
    /// payout.
    pub fn reveal(
        &mut self,
        bettor: Address,
        receipt_id: u64,
        beacon: &BeaconRuntime,
        min_seed_length: usize,
    ) -> Result<TossOutcome, EmulatorError> {
        let receipt = self
            .receipts
            .get(&receipt_id)
            .cloned()
            .ok_or_else(|| EmulatorError::rejected(format!("unknown receipt {receipt_id}")))?;

        if receipt.bettor != bettor {
            return Err(EmulatorError::rejected(format!(
                "receipt {receipt_id} is held by {}",
                receipt.bettor
            )));
        }

        // The source of the block after the commit; rejected by the beacon
        // while that block is still open.
        let source = beacon.source_at(receipt.committed_at + 1)?;

        let mut prg = Prg::new(&source, receipt_id, min_seed_length)?;
        let win = prg.next_uint64() % 2 == 0;
        let payout = if win { receipt.amount * 2 } else { 0 };

        if payout > self.reserve {
            return Err(EmulatorError::rejected(format!(
                "prize pool {} cannot cover payout {payout}",
                self.reserve
            )));
        }

        self.receipts.shift_remove(&receipt_id);
        self.reserve -= payout;
        log::debug!(
            "bet {} of {} settled: win={win}, payout={payout}",
            receipt.id,
            receipt.amount
        );
        Ok(TossOutcome { win, payout })
    }

    /// Deposits already-debited funds into the prize pool.
    pub fn fund(&mut self, amount: u64) {
        self.reserve += amount;
    }

    /// Current prize pool balance.
    pub fn prize_pool(&self) -> u64 {
        self.reserve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: usize = 16;

    fn sealed_beacon(blocks: u64) -> BeaconRuntime {
        let mut beacon = BeaconRuntime::new([3; 32]);
        for _ in 0..blocks {
            beacon.seal_next();
        }
        beacon
    }

    #[test]
    fn test_reveal_before_next_block_rejected() {
        let bettor = Address::from_u64(1);
        let mut runtime = CoinTossRuntime::default();
        let beacon = sealed_beacon(4);

        // Committed in the newest sealed block; the following block's
        // source does not exist yet.
        let id = runtime.flip(bettor, 100, beacon.sealed_height());
        let err = runtime.reveal(bettor, id, &beacon, MIN).unwrap_err();
        assert!(matches!(err, EmulatorError::Rejected(reason) if reason.contains("randomness")));

        // Receipt must survive the failed reveal.
        assert!(runtime.receipts.contains_key(&id));
    }

    #[test]
    fn test_reveal_settles_and_consumes_receipt() {
        let bettor = Address::from_u64(1);
        let mut runtime = CoinTossRuntime::default();
        runtime.fund(1_000);

        let mut beacon = sealed_beacon(2);
        let id = runtime.flip(bettor, 100, beacon.sealed_height());
        beacon.seal_next();

        let pool_before = runtime.prize_pool();
        let outcome = runtime.reveal(bettor, id, &beacon, MIN).unwrap();
        if outcome.win {
            assert_eq!(outcome.payout, 200);
            assert_eq!(runtime.prize_pool(), pool_before - 200);
        } else {
            assert_eq!(outcome.payout, 0);
            assert_eq!(runtime.prize_pool(), pool_before);
        }

        let err = runtime.reveal(bettor, id, &beacon, MIN).unwrap_err();
        assert!(matches!(err, EmulatorError::Rejected(reason) if reason.contains("unknown")));
    }

    #[test]
    fn test_reveal_by_other_account_rejected() {
        let bettor = Address::from_u64(1);
        let thief = Address::from_u64(2);
        let mut runtime = CoinTossRuntime::default();
        let mut beacon = sealed_beacon(2);

        let id = runtime.flip(bettor, 100, beacon.sealed_height());
        beacon.seal_next();

        let err = runtime.reveal(thief, id, &beacon, MIN).unwrap_err();
        assert!(matches!(err, EmulatorError::Rejected(reason) if reason.contains("held by")));
    }

    #[test]
    fn test_outcome_is_deterministic_per_receipt() {
        let bettor = Address::from_u64(1);
        let mut beacon = sealed_beacon(2);

        let mut a = CoinTossRuntime::default();
        let mut b = CoinTossRuntime::default();
        a.fund(10_000);
        b.fund(10_000);
        let id_a = a.flip(bettor, 50, beacon.sealed_height());
        let id_b = b.flip(bettor, 50, beacon.sealed_height());
        beacon.seal_next();

        let out_a = a.reveal(bettor, id_a, &beacon, MIN).unwrap();
        let out_b = b.reveal(bettor, id_b, &beacon, MIN).unwrap();
        assert_eq!(out_a.win, out_b.win);
    }
}

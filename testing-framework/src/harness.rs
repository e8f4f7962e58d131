// File: testing-framework/src/harness.rs
//
// End-to-end driver for the coin toss contract suite: dependency-ordered
// deployment, PRG flows (stateless and account-resident), batched bulk
// generation/retrieval, and the wagering flow.

use anyhow::{Context, Result};

use coin_toss_common::{config::HarnessConfig, value, Address, Value};
use coin_toss_emulator::Emulator;
use coin_toss_templates::{contracts, scripts, transactions};

/// Addresses of the deployed contract suite.
#[derive(Debug, Clone, Copy)]
pub struct CoreContracts {
    pub fungible_token: Address,
    pub non_fungible_token: Address,
    pub view_resolver: Address,
    pub metadata_views: Address,
    pub random_beacon_history: Address,
    pub pseudo_random_generator: Address,
    pub coin_toss: Address,
}

/// Test harness over an emulated network with the suite deployed.
///
/// # Example
///
/// ```rust,ignore
/// let harness = CoinTossHarness::deploy(EmulatorBuilder::new().build()).await?;
/// let signer = harness.emulator().create_account(0).await;
///
/// harness.setup_prg(signer, &random_seed(), random_salt()).await?;
/// harness.generate_uint64s(signer, 12_500).await?;
/// let values = harness.read_results(signer, 0, 12_500).await?;
/// ```
pub struct CoinTossHarness {
    emulator: Emulator,
    contracts: CoreContracts,
    config: HarnessConfig,
}

impl CoinTossHarness {
    /// Deploys the whole suite in dependency order and wraps the emulator.
    ///
    /// # Errors
    ///
    /// Fails if any deployment is rejected; the remaining deployments are
    /// not attempted.
    pub async fn deploy(emulator: Emulator) -> Result<Self> {
        let fungible_token = emulator
            .deploy_contract(&contracts::fungible_token())
            .await
            .context("deploying FungibleToken")?;
        let non_fungible_token = emulator
            .deploy_contract(&contracts::non_fungible_token())
            .await
            .context("deploying NonFungibleToken")?;
        let view_resolver = emulator
            .deploy_contract(&contracts::view_resolver())
            .await
            .context("deploying ViewResolver")?;
        let metadata_views = emulator
            .deploy_contract(&contracts::metadata_views(
                fungible_token,
                non_fungible_token,
                view_resolver,
            ))
            .await
            .context("deploying MetadataViews")?;
        let random_beacon_history = emulator
            .deploy_contract(&contracts::random_beacon_history())
            .await
            .context("deploying RandomBeaconHistory")?;
        let pseudo_random_generator = emulator
            .deploy_contract(&contracts::pseudo_random_generator())
            .await
            .context("deploying PseudoRandomGenerator")?;
        let coin_toss = emulator
            .deploy_contract(&contracts::coin_toss(
                fungible_token,
                non_fungible_token,
                random_beacon_history,
                pseudo_random_generator,
            ))
            .await
            .context("deploying CoinToss")?;

        log::info!("contract suite deployed, PseudoRandomGenerator at {pseudo_random_generator}, CoinToss at {coin_toss}");

        Ok(Self {
            emulator,
            contracts: CoreContracts {
                fungible_token,
                non_fungible_token,
                view_resolver,
                metadata_views,
                random_beacon_history,
                pseudo_random_generator,
                coin_toss,
            },
            config: HarnessConfig::default(),
        })
    }

    /// Overrides the batch size used by bulk generation and retrieval.
    pub fn with_batch_size(mut self, generation_batch_size: u64) -> Self {
        self.config.generation_batch_size = generation_batch_size;
        self
    }

    pub fn emulator(&self) -> &Emulator {
        &self.emulator
    }

    pub fn contracts(&self) -> &CoreContracts {
        &self.contracts
    }

    // ========================================================================
    // Stateless-per-call PRG
    // ========================================================================

    /// Draws one value from a throwaway generator built from (seed, salt).
    pub async fn next_uint64_new_prg(&self, seed: &[u8], salt: u64) -> Result<u64> {
        let script = scripts::next_uint64_new_prg(self.contracts.pseudo_random_generator);
        let args = [
            value::bytes_to_array(seed).encode()?,
            Value::UInt64(salt).encode()?,
        ];
        let result = self.emulator.execute_script(&script, &args).await?;
        Ok(result.value.as_uint64()?)
    }

    // ========================================================================
    // Account-resident PRG
    // ========================================================================

    /// Initializes a generator under the signer's account.
    pub async fn setup_prg(&self, signer: Address, seed: &[u8], salt: u64) -> Result<()> {
        let tx = transactions::setup_prg(self.contracts.pseudo_random_generator);
        let args = [
            value::bytes_to_array(seed).encode()?,
            Value::UInt64(salt).encode()?,
        ];
        self.emulator
            .submit_transaction(&tx, &args, signer)
            .await
            .context("setting up stored generator")?;
        Ok(())
    }

    /// Appends `total` values to the signer's result log, chunked into
    /// sequential batch transactions.
    ///
    /// A failed batch aborts the remaining ones.
    pub async fn generate_uint64s(&self, signer: Address, total: u64) -> Result<()> {
        let tx = transactions::next_uint64(self.contracts.pseudo_random_generator);
        let batch = self.config.generation_batch_size.max(1);

        let mut generated = 0u64;
        while generated < total {
            let count = batch.min(total - generated);
            let args = [Value::UInt64(count).encode()?];
            self.emulator
                .submit_transaction(&tx, &args, signer)
                .await
                .with_context(|| {
                    format!("generating batch [{generated}, {})", generated + count)
                })?;
            generated += count;
            log::debug!("generated {generated}/{total} values for {signer}");
        }
        Ok(())
    }

    /// Reads the half-open range `[from, up_to)` of the log under
    /// `address`, chunked into sequential batch scripts. Each batch lands
    /// at its offset in a pre-sized buffer, preserving generation order.
    pub async fn read_results(&self, address: Address, from: u64, up_to: u64) -> Result<Vec<u64>> {
        anyhow::ensure!(from <= up_to, "invalid range [{from}, {up_to})");
        let script = scripts::get_results_in_range(self.contracts.pseudo_random_generator);
        let batch = self.config.generation_batch_size.max(1);

        let mut results = vec![0u64; (up_to - from) as usize];
        let mut start = from;
        while start < up_to {
            let end = (start + batch).min(up_to);
            let args = [
                Value::Address(address).encode()?,
                Value::UInt64(start).encode()?,
                Value::UInt64(end).encode()?,
            ];
            let result = self
                .emulator
                .execute_script(&script, &args)
                .await
                .with_context(|| format!("reading results [{start}, {end})"))?;
            let values = result.value.as_uint64_array()?;
            anyhow::ensure!(
                values.len() as u64 == end - start,
                "batch [{start}, {end}) returned {} values",
                values.len()
            );

            let offset = (start - from) as usize;
            results[offset..offset + values.len()].copy_from_slice(&values);
            start = end;
        }
        Ok(results)
    }

    /// Length of the result log under `address`.
    pub async fn result_count(&self, address: Address) -> Result<u64> {
        let script = scripts::get_result_count(self.contracts.pseudo_random_generator);
        let args = [Value::Address(address).encode()?];
        let result = self.emulator.execute_script(&script, &args).await?;
        Ok(result.value.as_uint64()?)
    }

    /// Peeks the next value of the generator stored under `address` without
    /// advancing it.
    pub async fn next_uint64_from_address(&self, address: Address) -> Result<u64> {
        let script = scripts::next_uint64_from_address(self.contracts.pseudo_random_generator);
        let args = [Value::Address(address).encode()?];
        let result = self.emulator.execute_script(&script, &args).await?;
        Ok(result.value.as_uint64()?)
    }

    // ========================================================================
    // Coin toss
    // ========================================================================

    /// Commits a bet, returning the issued receipt id.
    pub async fn flip_coin(&self, signer: Address, amount: u64) -> Result<u64> {
        let tx = transactions::flip_coin(self.contracts.coin_toss);
        let args = [Value::UInt64(amount).encode()?];
        let result = self
            .emulator
            .submit_transaction(&tx, &args, signer)
            .await
            .context("committing bet")?;
        let receipt_id = result
            .value
            .ok_or_else(|| anyhow::anyhow!("flipCoin returned no receipt id"))?
            .as_uint64()?;
        Ok(receipt_id)
    }

    /// Settles the bet behind `receipt_id`. Returns whether it won.
    pub async fn reveal_coin(&self, signer: Address, receipt_id: u64) -> Result<bool> {
        let tx = transactions::reveal_coin(self.contracts.coin_toss);
        let args = [Value::UInt64(receipt_id).encode()?];
        let result = self.emulator.submit_transaction(&tx, &args, signer).await?;
        let win = result
            .value
            .ok_or_else(|| anyhow::anyhow!("revealCoin returned no outcome"))?
            .as_bool()?;
        Ok(win)
    }

    /// Deposits `amount` from the signer into the prize pool.
    pub async fn fund_prize_pool(&self, signer: Address, amount: u64) -> Result<()> {
        let tx = transactions::fund_prize_pool(self.contracts.coin_toss);
        let args = [Value::UInt64(amount).encode()?];
        self.emulator
            .submit_transaction(&tx, &args, signer)
            .await
            .context("funding prize pool")?;
        Ok(())
    }

    /// Current prize pool balance.
    pub async fn prize_pool(&self) -> Result<u64> {
        let script = scripts::get_prize_pool(self.contracts.coin_toss);
        let result = self.emulator.execute_script(&script, &[]).await?;
        Ok(result.value.as_uint64()?)
    }
}

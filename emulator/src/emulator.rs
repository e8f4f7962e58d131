use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use coin_toss_common::{
    config::{EmulatorConfig, COST_PER_CALL},
    value, Address, Value,
};

use crate::account::Account;
use crate::clock::Clock;
use crate::error::EmulatorError;
use crate::meter::ComputationMeter;
use crate::runtime::{BeaconRuntime, ContractRuntime};
use crate::source::{self, Dispatch, ImportTarget, ParsedSource, SourceKind};

/// A contract installed on the chain.
#[derive(Debug, Clone)]
pub struct DeployedContract {
    pub name: String,
    pub address: Address,
    pub source: String,
}

/// Monotonic counters over the chain's lifetime.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmulatorCounters {
    pub blocks_sealed: u64,
    pub transactions_executed: u64,
    pub scripts_executed: u64,
}

/// Outcome of a read-only script execution.
#[derive(Debug, Clone)]
pub struct ScriptResult {
    pub value: Value,
    pub compute_units_used: u64,
}

/// Outcome of a processed transaction.
#[derive(Debug, Clone)]
pub struct TransactionResult {
    /// Value returned by the entry call, if any.
    pub value: Option<Value>,
    pub compute_units_used: u64,
    /// Height of the block the transaction was sealed in.
    pub block_height: u64,
}

/// The in-process emulated network.
///
/// Cheap to clone; clones share the same chain state. All calls are
/// synchronous request/response against that state: one transaction per
/// block, scripts against the latest sealed state.
#[derive(Clone)]
pub struct Emulator {
    state: Arc<RwLock<ChainState>>,
}

impl Emulator {
    pub(crate) fn new(state: ChainState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Creates a fresh account with the given starting balance.
    pub async fn create_account(&self, initial_balance: u64) -> Address {
        let mut state = self.state.write().await;
        let address = state.allocate_address();
        state
            .accounts
            .insert(address, Account::new(address, initial_balance));
        address
    }

    /// Deploys bound contract source to a fresh account and returns the
    /// contract's address.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::Rejected`] when the payload does not declare a
    /// contract, an import is still in placeholder form, an import points
    /// at an address with no deployed contract, or the declared name is
    /// already taken.
    pub async fn deploy_contract(&self, source: &[u8]) -> Result<Address, EmulatorError> {
        self.state.write().await.deploy_contract(source)
    }

    /// Executes a read-only script against the latest sealed state.
    ///
    /// Arguments are individually encoded [`Value`] blobs, matched
    /// positionally against the entry call.
    pub async fn execute_script(
        &self,
        source: &[u8],
        args: &[Vec<u8>],
    ) -> Result<ScriptResult, EmulatorError> {
        self.state.write().await.execute_script(source, args)
    }

    /// Processes a signed transaction, sealing one block.
    pub async fn submit_transaction(
        &self,
        source: &[u8],
        args: &[Vec<u8>],
        signer: Address,
    ) -> Result<TransactionResult, EmulatorError> {
        self.state.write().await.submit_transaction(source, args, signer)
    }

    /// Seals an empty block, advancing the chain and its randomness
    /// history without executing anything.
    pub async fn advance_block(&self) -> u64 {
        self.state.write().await.seal_block()
    }

    pub async fn get_balance(&self, address: Address) -> Result<u64, EmulatorError> {
        let state = self.state.read().await;
        state
            .accounts
            .get(&address)
            .map(|account| account.balance)
            .ok_or_else(|| EmulatorError::rejected(format!("unknown account {address}")))
    }

    pub async fn get_account(&self, address: Address) -> Option<Account> {
        self.state.read().await.accounts.get(&address).cloned()
    }

    /// Address a contract name is deployed at, if any.
    pub async fn contract_address(&self, name: &str) -> Option<Address> {
        let state = self.state.read().await;
        state.contracts.get(name).map(|contract| contract.address)
    }

    pub async fn get_contract(&self, name: &str) -> Option<DeployedContract> {
        self.state.read().await.contracts.get(name).cloned()
    }

    /// Height of the latest sealed block.
    pub async fn block_height(&self) -> u64 {
        self.state.read().await.height
    }

    /// Timestamp of the latest sealed block.
    pub async fn latest_block_time(&self) -> u64 {
        self.state.read().await.latest_block_time
    }

    pub async fn counters(&self) -> EmulatorCounters {
        self.state.read().await.counters
    }
}

pub(crate) struct ChainState {
    config: EmulatorConfig,
    clock: Arc<dyn Clock>,
    accounts: IndexMap<Address, Account>,
    contracts: IndexMap<String, DeployedContract>,
    contracts_by_address: IndexMap<Address, String>,
    runtimes: IndexMap<String, ContractRuntime>,
    beacon: BeaconRuntime,
    /// Height of the latest sealed block; the beacon history always covers
    /// exactly [0, height].
    height: u64,
    latest_block_time: u64,
    counters: EmulatorCounters,
    next_address: u64,
}

impl ChainState {
    pub(crate) fn new(
        config: EmulatorConfig,
        clock: Arc<dyn Clock>,
        funded_accounts: Vec<(Address, u64)>,
        beacon: BeaconRuntime,
    ) -> Self {
        let genesis_time = clock.now();
        let mut accounts = IndexMap::new();
        for (address, balance) in funded_accounts {
            accounts.insert(address, Account::new(address, balance));
        }
        Self {
            config,
            clock,
            accounts,
            contracts: IndexMap::new(),
            contracts_by_address: IndexMap::new(),
            runtimes: IndexMap::new(),
            beacon,
            height: 0,
            latest_block_time: genesis_time,
            counters: EmulatorCounters::default(),
            next_address: 0,
        }
    }

    fn allocate_address(&mut self) -> Address {
        loop {
            self.next_address += 1;
            let address = Address::from_u64(self.next_address);
            if !self.accounts.contains_key(&address) {
                return address;
            }
        }
    }

    fn seal_block(&mut self) -> u64 {
        self.height += 1;
        self.beacon.seal_next();
        self.latest_block_time = self.clock.now();
        self.counters.blocks_sealed += 1;
        self.height
    }

    fn deploy_contract(&mut self, source_bytes: &[u8]) -> Result<Address, EmulatorError> {
        let parsed = source::parse(source_bytes)?;
        if parsed.kind != SourceKind::Contract {
            return Err(EmulatorError::rejected("payload does not declare a contract"));
        }
        let name = parsed
            .contract_name
            .clone()
            .ok_or_else(|| EmulatorError::rejected("contract declaration carries no name"))?;
        if self.contracts.contains_key(&name) {
            return Err(EmulatorError::rejected(format!(
                "contract {name} is already deployed"
            )));
        }
        self.check_imports(&parsed)?;

        let address = self.allocate_address();
        self.accounts.insert(address, Account::new(address, 0));
        self.contracts_by_address.insert(address, name.clone());
        self.runtimes
            .insert(name.clone(), ContractRuntime::for_contract(&name));
        self.contracts.insert(
            name.clone(),
            DeployedContract {
                name: name.clone(),
                address,
                // parse() verified the payload is UTF-8
                source: String::from_utf8_lossy(source_bytes).into_owned(),
            },
        );

        let block_height = self.seal_block();
        self.counters.transactions_executed += 1;
        log::info!("deployed contract {name} at {address} in block {block_height}");
        Ok(address)
    }

    fn execute_script(
        &mut self,
        source_bytes: &[u8],
        args: &[Vec<u8>],
    ) -> Result<ScriptResult, EmulatorError> {
        let parsed = source::parse(source_bytes)?;
        if parsed.kind != SourceKind::Script {
            return Err(EmulatorError::rejected("payload is not a script"));
        }
        self.check_imports(&parsed)?;
        let dispatch = parsed
            .dispatch
            .clone()
            .ok_or_else(|| EmulatorError::rejected("script has no entry call"))?;
        let target = self.resolve_dispatch_target(&parsed, &dispatch)?;
        let args = decode_args(args)?;

        let mut meter = ComputationMeter::new(self.config.computation_limit);
        meter.charge(COST_PER_CALL)?;

        let value = self.call_script(&target, &dispatch.method, &args, &mut meter)?;
        self.counters.scripts_executed += 1;
        log::debug!(
            "script {target}.{} used {} computation units",
            dispatch.method,
            meter.used()
        );
        Ok(ScriptResult {
            value,
            compute_units_used: meter.used(),
        })
    }

    fn submit_transaction(
        &mut self,
        source_bytes: &[u8],
        args: &[Vec<u8>],
        signer: Address,
    ) -> Result<TransactionResult, EmulatorError> {
        let parsed = source::parse(source_bytes)?;
        if parsed.kind != SourceKind::Transaction {
            return Err(EmulatorError::rejected("payload is not a transaction"));
        }
        if !self.accounts.contains_key(&signer) {
            return Err(EmulatorError::rejected(format!("unknown signer {signer}")));
        }
        self.check_imports(&parsed)?;
        let dispatch = parsed
            .dispatch
            .clone()
            .ok_or_else(|| EmulatorError::rejected("transaction has no entry call"))?;
        let target = self.resolve_dispatch_target(&parsed, &dispatch)?;
        let args = decode_args(args)?;

        let mut meter = ComputationMeter::new(self.config.computation_limit);
        meter.charge(COST_PER_CALL)?;

        // The block being built; sealed below once the call succeeds.
        let executing_height = self.height + 1;
        let value =
            self.call_transaction(&target, &dispatch.method, &args, signer, executing_height, &mut meter)?;

        if let Some(account) = self.accounts.get_mut(&signer) {
            account.nonce += 1;
        }
        let block_height = self.seal_block();
        self.counters.transactions_executed += 1;
        log::debug!(
            "transaction {target}.{} by {signer} sealed in block {block_height}",
            dispatch.method
        );
        Ok(TransactionResult {
            value,
            compute_units_used: meter.used(),
            block_height,
        })
    }

    /// Every import must either be bound to the address its contract is
    /// actually deployed at, or carry the empty sentinel (legal, inert).
    fn check_imports(&self, parsed: &ParsedSource) -> Result<(), EmulatorError> {
        for import in &parsed.imports {
            match &import.target {
                ImportTarget::Unresolved(token) => {
                    return Err(EmulatorError::rejected(format!(
                        "unresolved import \"{token}\""
                    )));
                }
                ImportTarget::Address(address) => {
                    if address.is_empty() {
                        continue;
                    }
                    match self.contracts_by_address.get(address) {
                        Some(name) if *name == import.name => {}
                        Some(name) => {
                            return Err(EmulatorError::rejected(format!(
                                "import {} resolves to {address}, which hosts {name}",
                                import.name
                            )));
                        }
                        None => {
                            return Err(EmulatorError::rejected(format!(
                                "import {} resolves to {address}, where no contract is deployed",
                                import.name
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_dispatch_target(
        &self,
        parsed: &ParsedSource,
        dispatch: &Dispatch,
    ) -> Result<String, EmulatorError> {
        let import = parsed
            .imports
            .iter()
            .find(|import| import.name == dispatch.contract)
            .ok_or_else(|| {
                EmulatorError::rejected(format!(
                    "call target {} is not imported",
                    dispatch.contract
                ))
            })?;
        match &import.target {
            ImportTarget::Address(address) if address.is_empty() => Err(EmulatorError::rejected(
                format!("call through inert import {}", import.name),
            )),
            ImportTarget::Address(_) => Ok(import.name.clone()),
            ImportTarget::Unresolved(token) => Err(EmulatorError::rejected(format!(
                "unresolved import \"{token}\""
            ))),
        }
    }

    fn call_script(
        &self,
        contract: &str,
        method: &str,
        args: &[Value],
        meter: &mut ComputationMeter,
    ) -> Result<Value, EmulatorError> {
        match (contract, method) {
            ("PseudoRandomGenerator", "nextUInt64NewPRG") => {
                expect_args(args, 2)?;
                let seed = args[0].as_byte_array()?;
                let salt = args[1].as_uint64()?;
                meter.charge_elements(1)?;
                let mut prg =
                    crate::runtime::Prg::new(&seed, salt, self.config.min_seed_length)?;
                Ok(Value::UInt64(prg.next_uint64()))
            }
            ("PseudoRandomGenerator", "nextUInt64FromAddress") => {
                expect_args(args, 1)?;
                let address = args[0].as_address()?;
                let runtime = self.prg_runtime(contract, method)?;
                meter.charge_elements(1)?;
                Ok(Value::UInt64(runtime.peek_next(address)?))
            }
            ("PseudoRandomGenerator", "getResultsInRange") => {
                expect_args(args, 3)?;
                let address = args[0].as_address()?;
                let from = args[1].as_uint64()?;
                let up_to = args[2].as_uint64()?;
                let runtime = self.prg_runtime(contract, method)?;
                let results = runtime.results_in_range(address, from, up_to)?;
                meter.charge_elements(results.len() as u64)?;
                Ok(value::uint64s_to_array(results))
            }
            ("PseudoRandomGenerator", "getResultCount") => {
                expect_args(args, 1)?;
                let address = args[0].as_address()?;
                let runtime = self.prg_runtime(contract, method)?;
                Ok(Value::UInt64(runtime.result_count(address)?))
            }
            ("RandomBeaconHistory", "sourceOfRandomness") => {
                expect_args(args, 1)?;
                let height = args[0].as_uint64()?;
                let source = self.beacon.source_at(height)?;
                meter.charge_elements(source.len() as u64)?;
                Ok(value::bytes_to_array(&source))
            }
            ("CoinToss", "getPrizePool") => {
                expect_args(args, 0)?;
                match self.runtimes.get(contract) {
                    Some(ContractRuntime::CoinToss(runtime)) => {
                        Ok(Value::UInt64(runtime.prize_pool()))
                    }
                    _ => Err(no_entry_point(contract, method)),
                }
            }
            _ => Err(no_entry_point(contract, method)),
        }
    }

    fn call_transaction(
        &mut self,
        contract: &str,
        method: &str,
        args: &[Value],
        signer: Address,
        executing_height: u64,
        meter: &mut ComputationMeter,
    ) -> Result<Option<Value>, EmulatorError> {
        let min_seed_length = self.config.min_seed_length;
        match (contract, method) {
            ("PseudoRandomGenerator", "setupPRG") => {
                expect_args(args, 2)?;
                let seed = args[0].as_byte_array()?;
                let salt = args[1].as_uint64()?;
                let Some(ContractRuntime::PseudoRandomGenerator(runtime)) =
                    self.runtimes.get_mut(contract)
                else {
                    return Err(no_entry_point(contract, method));
                };
                runtime.setup(signer, &seed, salt, min_seed_length)?;
                Ok(None)
            }
            ("PseudoRandomGenerator", "nextUInt64") => {
                expect_args(args, 1)?;
                let count = args[0].as_uint64()?;
                meter.charge_elements(count)?;
                let Some(ContractRuntime::PseudoRandomGenerator(runtime)) =
                    self.runtimes.get_mut(contract)
                else {
                    return Err(no_entry_point(contract, method));
                };
                let total = runtime.generate(signer, count)?;
                Ok(Some(Value::UInt64(total)))
            }
            ("CoinToss", "flipCoin") => {
                expect_args(args, 1)?;
                let amount = args[0].as_uint64()?;
                let account = self
                    .accounts
                    .get_mut(&signer)
                    .ok_or_else(|| EmulatorError::rejected(format!("unknown signer {signer}")))?;
                if account.balance < amount {
                    return Err(EmulatorError::rejected(format!(
                        "insufficient balance: need {amount}, have {}",
                        account.balance
                    )));
                }
                let Some(ContractRuntime::CoinToss(runtime)) = self.runtimes.get_mut(contract)
                else {
                    return Err(no_entry_point(contract, method));
                };
                account.balance -= amount;
                let id = runtime.flip(signer, amount, executing_height);
                Ok(Some(Value::UInt64(id)))
            }
            ("CoinToss", "revealCoin") => {
                expect_args(args, 1)?;
                let receipt_id = args[0].as_uint64()?;
                let Some(ContractRuntime::CoinToss(runtime)) = self.runtimes.get_mut(contract)
                else {
                    return Err(no_entry_point(contract, method));
                };
                let outcome = runtime.reveal(signer, receipt_id, &self.beacon, min_seed_length)?;
                if outcome.payout > 0 {
                    let account = self.accounts.get_mut(&signer).ok_or_else(|| {
                        EmulatorError::rejected(format!("unknown signer {signer}"))
                    })?;
                    account.balance += outcome.payout;
                }
                Ok(Some(Value::Bool(outcome.win)))
            }
            ("CoinToss", "fundPrizePool") => {
                expect_args(args, 1)?;
                let amount = args[0].as_uint64()?;
                let account = self
                    .accounts
                    .get_mut(&signer)
                    .ok_or_else(|| EmulatorError::rejected(format!("unknown signer {signer}")))?;
                if account.balance < amount {
                    return Err(EmulatorError::rejected(format!(
                        "insufficient balance: need {amount}, have {}",
                        account.balance
                    )));
                }
                let Some(ContractRuntime::CoinToss(runtime)) = self.runtimes.get_mut(contract)
                else {
                    return Err(no_entry_point(contract, method));
                };
                account.balance -= amount;
                runtime.fund(amount);
                Ok(None)
            }
            _ => Err(no_entry_point(contract, method)),
        }
    }

    fn prg_runtime(
        &self,
        contract: &str,
        method: &str,
    ) -> Result<&crate::runtime::PrgRuntime, EmulatorError> {
        match self.runtimes.get(contract) {
            Some(ContractRuntime::PseudoRandomGenerator(runtime)) => Ok(runtime),
            _ => Err(no_entry_point(contract, method)),
        }
    }
}

fn decode_args(args: &[Vec<u8>]) -> Result<Vec<Value>, EmulatorError> {
    args.iter()
        .map(|bytes| Value::decode(bytes).map_err(EmulatorError::from))
        .collect()
}

fn expect_args(args: &[Value], count: usize) -> Result<(), EmulatorError> {
    if args.len() != count {
        return Err(EmulatorError::rejected(format!(
            "expected {count} arguments, got {}",
            args.len()
        )));
    }
    Ok(())
}

fn no_entry_point(contract: &str, method: &str) -> EmulatorError {
    EmulatorError::rejected(format!("contract {contract} has no entry point {method}"))
}

use coin_toss_common::Address;

/// State tracked for a single emulated account.
#[derive(Debug, Clone)]
pub struct Account {
    pub address: Address,
    pub balance: u64,
    /// Number of transactions this account has signed.
    pub nonce: u64,
}

impl Account {
    pub fn new(address: Address, balance: u64) -> Self {
        Self {
            address,
            balance,
            nonce: 0,
        }
    }
}

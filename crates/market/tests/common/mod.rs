//! In-memory collaborators and fixtures shared by the integration tests.
#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use sluice_api::{
    ChunkView, CreditDeclined, PaymentDeclined, PaymentLedger, Timestamp, UploadCredit,
    VestingPolicy,
};
use sluice_market::{MarketParams, RoleSet, StorageMarket};
use std::collections::HashMap;

pub const FLOW: Address = Address::with_last_byte(1);
pub const MINE: Address = Address::with_last_byte(2);
pub const STAKE: Address = Address::with_last_byte(3);
pub const TREASURY: Address = Address::with_last_byte(4);
pub const BUYER: Address = Address::with_last_byte(9);
pub const MINER: Address = Address::with_last_byte(10);

pub fn roles() -> RoleSet {
    RoleSet { flow: FLOW, mine: MINE, stake: STAKE, treasury: TREASURY }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").with_test_writer().try_init();
}

/// Balance-conserving payment ledger.
///
/// `transfer` draws from the treasury account, matching how the market
/// forwards pool money to stake and miners.
#[derive(Debug, Default)]
pub struct MemoryBank {
    balances: HashMap<Address, U256>,
}

impl MemoryBank {
    pub fn funded(account: Address, amount: U256) -> Self {
        let mut bank = Self::default();
        bank.fund(account, amount);
        bank
    }

    pub fn fund(&mut self, account: Address, amount: U256) {
        *self.balances.entry(account).or_default() += amount;
    }

    pub fn balance(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }
}

impl PaymentLedger for MemoryBank {
    fn transfer_from(
        &mut self,
        payer: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<(), PaymentDeclined> {
        let balance = self.balances.entry(payer).or_default();
        if *balance < amount {
            return Err(PaymentDeclined::new("insufficient funds"));
        }
        *balance -= amount;
        *self.balances.entry(recipient).or_default() += amount;
        Ok(())
    }

    fn transfer(&mut self, recipient: Address, amount: U256) -> Result<(), PaymentDeclined> {
        self.transfer_from(TREASURY, recipient, amount)
    }
}

/// Upload credit backed by per-holder balances.
#[derive(Debug, Default)]
pub struct MemoryCredit {
    balances: HashMap<Address, U256>,
}

impl MemoryCredit {
    pub fn funded(holder: Address, amount: U256) -> Self {
        let mut credit = Self::default();
        *credit.balances.entry(holder).or_default() += amount;
        credit
    }

    pub fn balance(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }
}

impl UploadCredit for MemoryCredit {
    fn consume(&mut self, holder: Address, amount: U256) -> Result<(), CreditDeclined> {
        match self.balances.get_mut(&holder) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                Ok(())
            }
            _ => Err(CreditDeclined::new("insufficient upload credit")),
        }
    }
}

/// Releases a chunk's full locked reward once `delay` seconds have passed
/// since finalization.
#[derive(Debug, Clone, Copy)]
pub struct CliffVesting {
    pub delay: u64,
}

impl VestingPolicy for CliffVesting {
    fn releasable(&self, chunk: &ChunkView, now: Timestamp) -> U256 {
        match chunk.start_time {
            Some(start) if now >= start.saturating_add(self.delay) => chunk.locked_reward,
            _ => U256::ZERO,
        }
    }
}

pub type TestMarket<V> = StorageMarket<MemoryBank, MemoryCredit, V>;

/// Market over in-memory collaborators with the given funding.
pub fn market_with<V: VestingPolicy>(
    bank: MemoryBank,
    credit: MemoryCredit,
    vesting: V,
) -> TestMarket<V> {
    let params = MarketParams::builder().with_roles(roles()).build().unwrap();
    StorageMarket::new(params, bank, credit, vesting, 0)
}

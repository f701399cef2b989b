use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::prelude::*;

use crate::{errors::VaultError, math::U256};

/// Fungible reserve asset the vault settles in
///
/// `transfer_in` moves reserve from a holder into the vault's custody
/// account; `transfer_out` pays it back out. Any error aborts the
/// enclosing vault operation.
pub trait ReserveAsset {
    /// Account holding the vault's reserve
    fn custody(&self) -> Pubkey;

    fn transfer_in(&mut self, from: &Pubkey, amount: U256) -> Result<()>;

    fn transfer_out(&mut self, to: &Pubkey, amount: U256) -> Result<()>;

    fn balance_of(&self, holder: &Pubkey) -> U256;
}

/// Reserve asset kept in memory, for simulations and off-chain hosts
#[derive(Clone, Debug)]
pub struct InMemoryReserve {
    custody: Pubkey,
    balances: BTreeMap<Pubkey, U256>,
    frozen: BTreeSet<Pubkey>,
}

impl InMemoryReserve {
    pub fn new(custody: Pubkey) -> Self {
        Self {
            custody,
            balances: BTreeMap::new(),
            frozen: BTreeSet::new(),
        }
    }

    /// Credit `holder` with newly issued reserve
    pub fn mint(&mut self, holder: &Pubkey, amount: U256) -> Result<()> {
        let balance = self
            .balance_of(holder)
            .checked_add(amount)
            .ok_or(error!(VaultError::MathOverflow))?;
        self.balances.insert(*holder, balance);
        Ok(())
    }

    /// Plain transfer between two holders; sending to the custody account
    /// is how reserve reaches the vault without a deposit
    pub fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: U256) -> Result<()> {
        require!(
            !self.frozen.contains(from) && !self.frozen.contains(to),
            VaultError::AssetTransferFailed
        );
        let remaining = self
            .balance_of(from)
            .checked_sub(amount)
            .ok_or(error!(VaultError::InsufficientBalance))?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(error!(VaultError::MathOverflow))?;

        self.balances.insert(*from, remaining);
        self.balances.insert(*to, credited);
        Ok(())
    }

    /// Refuse every transfer touching `holder`
    pub fn freeze(&mut self, holder: &Pubkey) {
        self.frozen.insert(*holder);
    }

    pub fn thaw(&mut self, holder: &Pubkey) {
        self.frozen.remove(holder);
    }
}

impl ReserveAsset for InMemoryReserve {
    fn custody(&self) -> Pubkey {
        self.custody
    }

    fn transfer_in(&mut self, from: &Pubkey, amount: U256) -> Result<()> {
        let custody = self.custody;
        self.transfer(from, &custody, amount)
    }

    fn transfer_out(&mut self, to: &Pubkey, amount: U256) -> Result<()> {
        let custody = self.custody;
        self.transfer(&custody, to, amount)
    }

    fn balance_of(&self, holder: &Pubkey) -> U256 {
        self.balances.get(holder).copied().unwrap_or_default()
    }
}

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::{errors::VaultError, math::U256};

/// Share supply, reserve total and per-holder balances
///
/// Only the vault mutates a ledger. `total_shares` always equals the sum
/// of `balances`; holders are dropped when their balance reaches zero.
#[derive(Clone, Debug, Default)]
pub struct VaultLedger {
    total_shares: U256,
    total_assets: U256,
    balances: BTreeMap<Pubkey, U256>,
}

impl VaultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_shares(&self) -> U256 {
        self.total_shares
    }

    pub fn total_assets(&self) -> U256 {
        self.total_assets
    }

    pub fn balance_of(&self, holder: &Pubkey) -> U256 {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    /// Holders with a non-zero balance
    pub fn holders(&self) -> impl Iterator<Item = (&Pubkey, &U256)> {
        self.balances.iter()
    }

    pub(crate) fn mint(&mut self, holder: &Pubkey, shares: U256) -> Result<()> {
        if shares.is_zero() {
            return Ok(());
        }
        let total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(error!(VaultError::MathOverflow))?;
        let balance = self
            .balance_of(holder)
            .checked_add(shares)
            .ok_or(error!(VaultError::MathOverflow))?;

        self.total_shares = total_shares;
        self.balances.insert(*holder, balance);
        Ok(())
    }

    pub(crate) fn burn(&mut self, holder: &Pubkey, shares: U256) -> Result<()> {
        let balance = self
            .balance_of(holder)
            .checked_sub(shares)
            .ok_or(error!(VaultError::InsufficientBalance))?;

        self.total_shares = self.total_shares - shares;
        if balance.is_zero() {
            self.balances.remove(holder);
        } else {
            self.balances.insert(*holder, balance);
        }
        Ok(())
    }

    pub(crate) fn record_assets_in(&mut self, amount: U256) -> Result<()> {
        self.total_assets = self
            .total_assets
            .checked_add(amount)
            .ok_or(error!(VaultError::MathOverflow))?;
        Ok(())
    }

    pub(crate) fn record_assets_out(&mut self, amount: U256) -> Result<()> {
        self.total_assets = self
            .total_assets
            .checked_sub(amount)
            .ok_or(error!(VaultError::InsufficientBalance))?;
        Ok(())
    }

    /// Mint `shares` and book `assets` in; nothing changes unless both fit
    pub(crate) fn settle_deposit(
        &mut self,
        receiver: &Pubkey,
        assets: U256,
        shares: U256,
    ) -> Result<()> {
        require!(
            self.total_assets.checked_add(assets).is_some(),
            VaultError::MathOverflow
        );
        self.mint(receiver, shares)?;
        self.record_assets_in(assets)
    }

    /// Burn `shares` and book `paid_out` out; nothing changes unless both fit
    pub(crate) fn settle_redeem(
        &mut self,
        owner: &Pubkey,
        shares: U256,
        paid_out: U256,
    ) -> Result<()> {
        require!(paid_out <= self.total_assets, VaultError::InsufficientBalance);
        self.burn(owner, shares)?;
        self.record_assets_out(paid_out)
    }

    /// Align `total_assets` with what custody actually holds, folding in
    /// reserve that arrived outside of `deposit`
    pub(crate) fn reconcile_assets(&mut self, custody_balance: U256) -> Result<()> {
        if custody_balance > self.total_assets {
            self.record_assets_in(custody_balance - self.total_assets)
        } else {
            self.record_assets_out(self.total_assets - custody_balance)
        }
    }
}

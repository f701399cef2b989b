use anchor_lang::prelude::*;

use crate::{
    curve::{CurveKind, PoolState},
    fees::FeeSchedule,
    math::{to_u256, to_u64},
    vault::{quote_deposit, quote_redeem, VaultConfig},
};

/// On-chain vault state tracking assets, shares and pricing configuration
///
/// Security considerations:
/// - Authority stored in state (not instruction args)
/// - Curve fixed at initialization, only fees are mutable
/// - Bumps stored for efficient PDA signing
/// - 128 bytes padding for future upgrades
#[account]
pub struct VaultState {
    /// Authority that can change fees
    pub authority: Pubkey,          // 32 bytes

    /// Mint of the underlying reserve token
    pub asset_mint: Pubkey,         // 32 bytes

    /// Mint of the vault share token
    pub share_mint: Pubkey,         // 32 bytes

    /// Pricing curve
    pub curve: CurveKind,           // 1 byte

    /// Entry and exit fees in basis points
    pub fees: FeeSchedule,          // 4 bytes

    /// Reserve held by the vault, synced from the custody account
    pub total_assets: u64,          // 8 bytes

    /// Total shares issued to depositors
    pub total_shares: u64,          // 8 bytes

    /// Bump seed for vault state PDA
    pub bump: u8,                   // 1 byte

    /// Bump seed for share mint PDA
    pub share_bump: u8,             // 1 byte

    /// Bump seed for vault authority PDA
    pub authority_bump: u8,         // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 128],       // 128 bytes
}

/// Deposit priced in SPL token units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenDeposit {
    pub amount: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub shares: u64,
}

/// Redeem priced in SPL token units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRedeem {
    pub shares: u64,
    pub gross_amount: u64,
    pub fee: u64,
    pub net_amount: u64,
}

impl VaultState {
    pub fn config(&self) -> VaultConfig {
        VaultConfig {
            curve: self.curve,
            fees: self.fees,
        }
    }

    pub fn pool_state(&self) -> PoolState {
        PoolState::new(to_u256(self.total_shares), to_u256(self.total_assets))
    }

    /// Price a deposit of `amount` reserve tokens
    ///
    /// Uses the engine's 256-bit math; the result must fit back into the
    /// u64 range of SPL token accounts.
    pub fn quote_deposit(&self, amount: u64) -> Result<TokenDeposit> {
        let quote = quote_deposit(self.curve, &self.fees, self.pool_state(), to_u256(amount))?;
        let shares = to_u64(quote.shares)?;
        self.total_shares
            .checked_add(shares)
            .ok_or(error!(crate::errors::VaultError::AmountTooLarge))?;
        self.total_assets
            .checked_add(amount)
            .ok_or(error!(crate::errors::VaultError::AmountTooLarge))?;

        Ok(TokenDeposit {
            amount,
            fee: to_u64(quote.fee)?,
            net_amount: to_u64(quote.net_assets)?,
            shares,
        })
    }

    /// Price a redeem of `shares` share tokens
    pub fn quote_redeem(&self, shares: u64) -> Result<TokenRedeem> {
        let quote = quote_redeem(self.curve, &self.fees, self.pool_state(), to_u256(shares))?;

        Ok(TokenRedeem {
            shares,
            gross_amount: to_u64(quote.gross_assets)?,
            fee: to_u64(quote.fee)?,
            net_amount: to_u64(quote.net_assets)?,
        })
    }

    /// Book a priced deposit
    pub fn apply_deposit(&mut self, deposit: &TokenDeposit) -> Result<()> {
        self.total_assets = self
            .total_assets
            .checked_add(deposit.amount)
            .ok_or(error!(crate::errors::VaultError::AmountTooLarge))?;
        self.total_shares = self
            .total_shares
            .checked_add(deposit.shares)
            .ok_or(error!(crate::errors::VaultError::AmountTooLarge))?;
        Ok(())
    }

    /// Book a priced redeem; the exit fee stays in custody
    pub fn apply_redeem(&mut self, redeem: &TokenRedeem) -> Result<()> {
        self.total_assets = self
            .total_assets
            .checked_sub(redeem.net_amount)
            .ok_or(error!(crate::errors::VaultError::InsufficientBalance))?;
        self.total_shares = self
            .total_shares
            .checked_sub(redeem.shares)
            .ok_or(error!(crate::errors::VaultError::InsufficientShares))?;
        Ok(())
    }
}

use anchor_lang::prelude::*;

use crate::{curve::CurveKind, fees::FeeSchedule};

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub share_mint: Pubkey,
    pub curve: CurveKind,
    pub fees: FeeSchedule,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub receiver: Pubkey,
    /// Net of the entry fee
    pub assets: u64,
    pub shares: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when shares are redeemed
#[event]
pub struct Redeemed {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub receiver: Pubkey,
    /// Net of the exit fee
    pub assets: u64,
    pub shares: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when the authority changes a fee
#[event]
pub struct FeesUpdated {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub fees: FeeSchedule,
    pub timestamp: i64,
}

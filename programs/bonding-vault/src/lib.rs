// Bonding Vault - reserve-backed share vault priced by a bonding curve
// Security: Follows Solana security best practices with comprehensive validation
// Architecture: host-independent conversion engine + thin Anchor host

use anchor_lang::prelude::*;

pub mod constants;
pub mod curve;
pub mod errors;
pub mod events;
pub mod fees;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod reserve;
pub mod state;
pub mod vault;

use curve::CurveKind;
use instructions::*;

declare_id!("GSF1oyMS89FpJB8M3p4LZY1soaebrri2rPZb1txgyNkv");

#[program]
pub mod bonding_vault {
    use super::*;

    /// Initialize a new vault for a given asset token
    ///
    /// Security considerations:
    /// - Validates authority is signer
    /// - Rejects fees above 50 percent
    /// - Initializes vault state with proper PDAs
    /// - Creates share mint with vault as mint authority
    pub fn initialize(
        ctx: Context<Initialize>,
        curve: CurveKind,
        entry_fee_bps: u16,
        exit_fee_bps: u16,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, curve, entry_fee_bps, exit_fee_bps)
    }

    /// Deposit reserve into the vault and receive curve-priced shares
    ///
    /// Security considerations:
    /// - Validates caller token accounts (mint, owner)
    /// - Prices against the custody balance, in wide checked math
    /// - Follows checks-effects-interactions pattern
    /// - Emits event for tracking
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount)
    }

    /// Burn shares and receive reserve, less the exit fee
    ///
    /// Security considerations:
    /// - Owner must sign for their share account
    /// - Burns before paying out
    /// - Exit fee stays in custody for remaining holders
    /// - Emits event for tracking
    pub fn redeem(ctx: Context<Redeem>, shares: u64) -> Result<()> {
        instructions::redeem::handler(ctx, shares)
    }

    /// Set the entry fee in basis points
    ///
    /// Security considerations:
    /// - Authority-only function (has_one constraint)
    /// - Fee capped at 50 percent
    pub fn set_entry_fee(ctx: Context<UpdateFees>, fee_bps: u16) -> Result<()> {
        instructions::update_fees::entry_fee_handler(ctx, fee_bps)
    }

    /// Set the exit fee in basis points
    ///
    /// Security considerations:
    /// - Authority-only function (has_one constraint)
    /// - Fee capped at 50 percent
    pub fn set_exit_fee(ctx: Context<UpdateFees>, fee_bps: u16) -> Result<()> {
        instructions::update_fees::exit_fee_handler(ctx, fee_bps)
    }
}

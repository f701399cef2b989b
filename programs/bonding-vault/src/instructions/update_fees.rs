use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Change the vault's entry or exit fee
#[derive(Accounts)]
pub struct UpdateFees<'info> {
    /// Vault authority - only they can change fees
    /// Security: Must be signer and match vault_state.authority
    pub authority: Signer<'info>,

    /// Vault state PDA
    /// Security: has_one constraint validates authority from state
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,
}

pub fn entry_fee_handler(ctx: Context<UpdateFees>, fee_bps: u16) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.fees.set_entry_fee(fee_bps)?;
    msg!("Entry fee set to {} bps", fee_bps);
    emit_fees_updated(vault_state)
}

pub fn exit_fee_handler(ctx: Context<UpdateFees>, fee_bps: u16) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.fees.set_exit_fee(fee_bps)?;
    msg!("Exit fee set to {} bps", fee_bps);
    emit_fees_updated(vault_state)
}

fn emit_fees_updated(vault_state: &Account<'_, VaultState>) -> Result<()> {
    emit!(FeesUpdated {
        vault: vault_state.key(),
        authority: vault_state.authority,
        fees: vault_state.fees,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

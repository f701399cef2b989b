use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::{constants::*, errors::*, events::*, state::*};

/// Burn shares and pay the curve-priced reserve, less the exit fee
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: Share owner must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Vault state PDA validated with seeds
/// ✅ 6. MATH SAFETY: Curve math in 256-bit and wider, narrowed with checks
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 8. BUSINESS LOGIC: Checks-effects-interactions pattern
/// ✅ 10. EVENTS: Emits Redeemed event
#[derive(Accounts)]
pub struct Redeem<'info> {
    /// Share owner
    /// Security: Must be signer
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Vault state PDA
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Share mint
    /// Security: Must match vault_state.share_mint
    #[account(
        mut,
        address = vault_state.share_mint,
    )]
    pub share_mint: Account<'info, Mint>,

    /// Vault authority PDA
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Owner's share token account (burned from)
    /// Security: Must be owned by owner and correct mint
    #[account(
        mut,
        constraint = owner_share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
        constraint = owner_share_account.owner == owner.key() @ VaultError::InvalidOwner,
    )]
    pub owner_share_account: Account<'info, TokenAccount>,

    /// Receiver's asset token account (paid to)
    /// Security: Correct mint; the receiver is whoever owns it
    #[account(
        mut,
        constraint = receiver_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub receiver_asset_account: Account<'info, TokenAccount>,

    /// Vault's token account
    /// Security: Must be correct mint and owned by vault_authority
    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Redeem>, shares: u64) -> Result<()> {
    // CHECKS: Amount and share balance
    require!(shares > 0, VaultError::ZeroAmount);
    require!(
        ctx.accounts.owner_share_account.amount >= shares,
        VaultError::InsufficientShares
    );

    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.total_assets = ctx.accounts.vault_token_account.amount;
    let redeem = vault_state.quote_redeem(shares)?;

    // EFFECTS: The exit fee never leaves custody
    vault_state.apply_redeem(&redeem)?;

    // INTERACTIONS: Burn first, then pay out
    let burn_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.share_mint.to_account_info(),
            from: ctx.accounts.owner_share_account.to_account_info(),
            authority: ctx.accounts.owner.to_account_info(),
        },
    );
    token::burn(burn_ctx, shares)?;

    let asset_mint_key = vault_state.asset_mint;
    let authority_bump = vault_state.authority_bump;
    let authority_seeds: &[&[u8]] = &[
        VAULT_AUTHORITY_SEED,
        asset_mint_key.as_ref(),
        &[authority_bump],
    ];
    let signer_seeds = &[&authority_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault_token_account.to_account_info(),
            to: ctx.accounts.receiver_asset_account.to_account_info(),
            authority: ctx.accounts.vault_authority.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, redeem.net_amount).map_err(|err| {
        msg!("Redeem transfer failed: {}", err);
        error!(VaultError::AssetTransferFailed)
    })?;

    msg!(
        "Redeemed {} shares for {} ({} fee)",
        shares,
        redeem.net_amount,
        redeem.fee
    );

    emit!(Redeemed {
        vault: vault_state.key(),
        owner: ctx.accounts.owner.key(),
        receiver: ctx.accounts.receiver_asset_account.owner,
        assets: redeem.net_amount,
        shares,
        total_assets: vault_state.total_assets,
        total_shares: vault_state.total_shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

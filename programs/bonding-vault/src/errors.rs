use anchor_lang::prelude::*;

/// Custom error codes for the Bonding Vault program
///
/// Every failure path maps to its own code so callers can tell
/// "too large" from "insufficient balance" from "transfer failed".
#[error_code]
pub enum VaultError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Owner does not hold enough shares to redeem")]
    InsufficientShares,

    #[msg("Balance too low for this operation")]
    InsufficientBalance,

    #[msg("Deposit exceeds the vault's current capacity")]
    ExceedsMaxDeposit,

    #[msg("Amount exceeds the curve's single-operation ceiling")]
    AmountTooLarge,

    #[msg("Curve arithmetic exceeded its magnitude ceiling")]
    CurveOverflow,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Fee exceeds 50 percent")]
    FeeExceedsMaximum,

    #[msg("Reserve asset transfer failed")]
    AssetTransferFailed,

    #[msg("Invalid token mint - does not match vault asset")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Unauthorized - only vault authority can perform this action")]
    Unauthorized,
}

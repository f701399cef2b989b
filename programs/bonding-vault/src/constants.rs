// Constants for the Bonding Vault program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for share mint PDA
pub const SHARE_MINT_SEED: &[u8] = b"shares";

/// Seed for vault authority PDA (share mint authority, reserve owner)
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Fee denominator: one basis point is 1 / 10_000 of an amount
pub const FEE_DENOMINATOR: u64 = 10_000;

/// Highest accepted fee (50%)
pub const MAX_FEE_BPS: u16 = (FEE_DENOMINATOR / 2) as u16;

/// Largest single deposit on the linear curve, as a power of ten.
/// 10^77 is the largest power of ten below 2^256.
pub const LINEAR_MAX_AMOUNT_EXP: usize = 77;

/// Largest single deposit on the quadratic curve, as a power of ten.
/// Keeps a bootstrap supply's cube near 2^379, leaving room under the
/// 2^510 weight ceiling for subsequent deposits.
pub const QUADRATIC_MAX_AMOUNT_EXP: usize = 38;

/// Largest single deposit on the logarithmic curve, as a power of ten.
pub const LOGARITHMIC_MAX_AMOUNT_EXP: usize = 40;

/// Quadratic supply ceiling as a power of two; the supply cube must stay
/// inside 512 bits.
pub const QUADRATIC_MAX_SUPPLY_BITS: usize = 170;

/// Space for VaultState account (8 discriminator + 32 authority + 32 asset_mint +
/// 32 share_mint + 1 curve + 2 entry_fee_bps + 2 exit_fee_bps + 8 total_assets +
/// 8 total_shares + 1 bump + 1 share_bump + 1 authority_bump + 128 padding)
pub const VAULT_STATE_SIZE: usize = 8 + 32 + 32 + 32 + 1 + 2 + 2 + 8 + 8 + 1 + 1 + 1 + 128;

use anchor_lang::prelude::*;

use crate::{
    constants::{FEE_DENOMINATOR, MAX_FEE_BPS},
    errors::VaultError,
    math::{mul_div_floor, U256},
};

/// Entry and exit fees in basis points of `FEE_DENOMINATOR`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSchedule {
    /// Charged on the reserve amount of every deposit
    pub entry_fee_bps: u16,
    /// Charged on the gross payout of every redeem
    pub exit_fee_bps: u16,
}

/// Result of splitting an amount into the part that moves and the fee
/// that stays in the vault
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    pub net: U256,
    pub fee: U256,
}

/// Reject fees above half of the denominator
pub fn validate_fee(fee_bps: u16) -> Result<()> {
    require!(fee_bps <= MAX_FEE_BPS, VaultError::FeeExceedsMaximum);
    Ok(())
}

/// Split `amount` into `(net, fee)` with `fee = floor(amount * bps / 10_000)`
pub fn apply_fee(amount: U256, fee_bps: u16) -> Result<FeeSplit> {
    let fee = mul_div_floor(amount, U256::from(fee_bps), U256::from(FEE_DENOMINATOR))
        .ok_or(error!(VaultError::MathOverflow))?;
    Ok(FeeSplit {
        net: amount - fee,
        fee,
    })
}

impl FeeSchedule {
    pub fn new(entry_fee_bps: u16, exit_fee_bps: u16) -> Result<Self> {
        validate_fee(entry_fee_bps)?;
        validate_fee(exit_fee_bps)?;
        Ok(Self {
            entry_fee_bps,
            exit_fee_bps,
        })
    }

    pub fn set_entry_fee(&mut self, fee_bps: u16) -> Result<()> {
        validate_fee(fee_bps)?;
        self.entry_fee_bps = fee_bps;
        Ok(())
    }

    pub fn set_exit_fee(&mut self, fee_bps: u16) -> Result<()> {
        validate_fee(fee_bps)?;
        self.exit_fee_bps = fee_bps;
        Ok(())
    }

    pub fn entry(&self, assets: U256) -> Result<FeeSplit> {
        apply_fee(assets, self.entry_fee_bps)
    }

    pub fn exit(&self, assets: U256) -> Result<FeeSplit> {
        apply_fee(assets, self.exit_fee_bps)
    }
}

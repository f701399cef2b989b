use core::cmp::min;

use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::VaultError,
    math::{log2_fixed, mul_div_floor, narrow_u1024, narrow_u512, U1024, U256, U512},
};

/// Pricing curve selected when the vault is created
///
/// Every variant keeps the reserve proportional to a weight of the share
/// supply, `totalAssets = k * W(totalShares)`:
/// - Linear: `W(S) = S`, constant price per share
/// - Quadratic: `W(S) = S^3`, marginal price grows with `S^2`
/// - Logarithmic: `W(S) = S * log2(S + 1)`, marginal price grows with `log S`
///
/// All conversions floor in the vault's favour.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    Linear,
    Quadratic,
    Logarithmic,
}

/// Supply and reserve the curve prices against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolState {
    pub total_shares: U256,
    pub total_assets: U256,
}

impl PoolState {
    pub fn new(total_shares: U256, total_assets: U256) -> Self {
        Self {
            total_shares,
            total_assets,
        }
    }

    /// Shares price 1:1 when none exist yet or the reserve is empty
    pub fn is_bootstrap(&self) -> bool {
        self.total_shares.is_zero() || self.total_assets.is_zero()
    }
}

impl CurveKind {
    /// Largest amount accepted by a single deposit
    pub fn max_amount(&self) -> U256 {
        match self {
            CurveKind::Linear => U256::exp10(LINEAR_MAX_AMOUNT_EXP),
            CurveKind::Quadratic => U256::exp10(QUADRATIC_MAX_AMOUNT_EXP),
            CurveKind::Logarithmic => U256::exp10(LOGARITHMIC_MAX_AMOUNT_EXP),
        }
    }

    /// Largest share supply the curve can price
    pub fn max_supply(&self) -> U256 {
        match self {
            CurveKind::Quadratic => U256::one() << QUADRATIC_MAX_SUPPLY_BITS,
            CurveKind::Linear | CurveKind::Logarithmic => U256::MAX,
        }
    }

    /// Reserve-shape weight `W(supply)`
    pub fn weight(&self, supply: U256) -> Result<U512> {
        require!(supply <= self.max_supply(), VaultError::CurveOverflow);
        let wide = U512::from(supply);
        Ok(match self {
            CurveKind::Linear => wide,
            CurveKind::Quadratic => wide * wide * wide,
            CurveKind::Logarithmic => {
                wide * U512::from(log2_fixed(supply.saturating_add(U256::one())))
            }
        })
    }

    /// Shares minted for `assets` against `state`
    pub fn shares_for_deposit(&self, state: PoolState, assets: U256) -> Result<U256> {
        require!(assets <= self.max_amount(), VaultError::AmountTooLarge);

        if state.is_bootstrap() {
            let supply = state
                .total_shares
                .checked_add(assets)
                .ok_or(error!(VaultError::CurveOverflow))?;
            require!(supply <= self.max_supply(), VaultError::CurveOverflow);
            return Ok(assets);
        }

        let PoolState {
            total_shares,
            total_assets,
        } = state;
        let grown = total_assets
            .checked_add(assets)
            .ok_or(error!(VaultError::CurveOverflow))?;

        let target = U1024::from(self.weight(total_shares)?) * U1024::from(grown);
        let ceiling = U1024::from(self.weight(self.max_supply())?) * U1024::from(total_assets);
        require!(target < ceiling, VaultError::CurveOverflow);

        let new_supply = match self {
            CurveKind::Linear => {
                let minted = mul_div_floor(assets, total_shares, total_assets)
                    .ok_or(error!(VaultError::CurveOverflow))?;
                total_shares + minted
            }
            CurveKind::Quadratic | CurveKind::Logarithmic => {
                self.solve_supply(total_shares, total_assets, grown, target)?
            }
        };
        Ok(new_supply - total_shares)
    }

    /// Largest supply `x` with `W(x) * reserve <= target`
    ///
    /// `W(x) / x` never decreases, so the answer lies between the current
    /// supply and the linear bound `supply * grown / reserve`.
    fn solve_supply(
        &self,
        supply: U256,
        reserve: U256,
        grown: U256,
        target: U1024,
    ) -> Result<U256> {
        let reserve_wide = U1024::from(reserve);
        let linear_bound = narrow_u512(U512::from(supply) * U512::from(grown) / U512::from(reserve))
            .unwrap_or(U256::MAX);

        let mut lo = supply;
        let mut hi = min(linear_bound, self.max_supply());
        while lo < hi {
            let mid = lo + ((hi - lo + U256::one()) >> 1usize);
            if U1024::from(self.weight(mid)?) * reserve_wide <= target {
                lo = mid;
            } else {
                hi = mid - U256::one();
            }
        }
        Ok(lo)
    }

    /// Reserve released by burning `shares` against `state`
    pub fn assets_for_redeem(&self, state: PoolState, shares: U256) -> Result<U256> {
        let PoolState {
            total_shares,
            total_assets,
        } = state;
        require!(shares <= total_shares, VaultError::InsufficientShares);

        if shares.is_zero() || total_shares.is_zero() {
            return Ok(U256::zero());
        }
        if shares == total_shares {
            return Ok(total_assets);
        }

        match self {
            CurveKind::Linear => mul_div_floor(shares, total_assets, total_shares)
                .ok_or(error!(VaultError::CurveOverflow)),
            CurveKind::Quadratic | CurveKind::Logarithmic => {
                let full = self.weight(total_shares)?;
                let rest = self.weight(total_shares - shares)?;
                let released = U1024::from(total_assets) * U1024::from(full - rest);
                narrow_u1024(released / U1024::from(full)).ok_or(error!(VaultError::CurveOverflow))
            }
        }
    }

    /// Largest deposit `state` can absorb: the reserve must stay within
    /// 256 bits and the resulting supply below `max_supply`
    pub fn deposit_capacity(&self, state: PoolState) -> U256 {
        let headroom = U256::MAX - state.total_assets;
        if state.is_bootstrap() {
            let supply_room = self
                .max_supply()
                .saturating_sub(state.total_shares);
            return min(headroom, supply_room);
        }

        let (full, ceiling) = match (self.weight(state.total_shares), self.weight(self.max_supply())) {
            (Ok(full), Ok(ceiling)) => (full, ceiling),
            _ => return U256::zero(),
        };
        // R + a <= floor((W(max) * R - 1) / W(S))
        let limit = (U1024::from(ceiling) * U1024::from(state.total_assets) - U1024::one())
            / U1024::from(full);
        let reserve_room = narrow_u1024(limit)
            .unwrap_or(U256::MAX)
            .saturating_sub(state.total_assets);
        min(headroom, reserve_room)
    }
}

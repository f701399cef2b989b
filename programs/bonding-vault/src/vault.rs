use anchor_lang::prelude::*;

use crate::{
    curve::{CurveKind, PoolState},
    errors::VaultError,
    fees::{FeeSchedule, FeeSplit},
    ledger::VaultLedger,
    math::U256,
    reserve::ReserveAsset,
};

/// Creation-time configuration; only the fees change afterwards
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultConfig {
    pub curve: CurveKind,
    pub fees: FeeSchedule,
}

impl VaultConfig {
    pub fn new(curve: CurveKind, entry_fee_bps: u16, exit_fee_bps: u16) -> Result<Self> {
        Ok(Self {
            curve,
            fees: FeeSchedule::new(entry_fee_bps, exit_fee_bps)?,
        })
    }
}

/// Priced deposit, before any state changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositQuote {
    /// Reserve pulled from the caller
    pub assets: U256,
    /// Entry fee kept by the vault
    pub fee: U256,
    /// Reserve that buys shares
    pub net_assets: U256,
    pub shares: U256,
}

/// Priced redeem, before any state changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedeemQuote {
    pub shares: U256,
    /// Reserve the curve releases for `shares`
    pub gross_assets: U256,
    /// Exit fee kept by the vault
    pub fee: U256,
    /// Reserve paid to the receiver
    pub net_assets: U256,
}

/// Validate and price a deposit of `assets` against `state`
///
/// The entry fee comes off first and the curve prices the remainder, so on
/// an empty vault a deposit mints exactly its net amount.
pub fn quote_deposit(
    curve: CurveKind,
    fees: &FeeSchedule,
    state: PoolState,
    assets: U256,
) -> Result<DepositQuote> {
    require!(!assets.is_zero(), VaultError::ZeroAmount);
    require!(assets <= curve.max_amount(), VaultError::AmountTooLarge);
    require!(
        assets <= curve.deposit_capacity(state),
        VaultError::ExceedsMaxDeposit
    );

    let FeeSplit { net, fee } = fees.entry(assets)?;
    let shares = curve.shares_for_deposit(state, net)?;

    Ok(DepositQuote {
        assets,
        fee,
        net_assets: net,
        shares,
    })
}

/// Validate and price a redeem of `shares` against `state`
pub fn quote_redeem(
    curve: CurveKind,
    fees: &FeeSchedule,
    state: PoolState,
    shares: U256,
) -> Result<RedeemQuote> {
    require!(!shares.is_zero(), VaultError::ZeroAmount);
    require!(
        shares <= state.total_shares,
        VaultError::InsufficientShares
    );

    let gross_assets = curve.assets_for_redeem(state, shares)?;
    let FeeSplit { net, fee } = fees.exit(gross_assets)?;

    Ok(RedeemQuote {
        shares,
        gross_assets,
        fee,
        net_assets: net,
    })
}

/// Record emitted once per successful deposit or redeem
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettlementRecord {
    Deposit {
        caller: Pubkey,
        receiver: Pubkey,
        /// Net of the entry fee
        assets: U256,
        shares: U256,
    },
    Withdraw {
        owner: Pubkey,
        receiver: Pubkey,
        /// Net of the exit fee
        assets: U256,
        shares: U256,
    },
}

/// Bonding vault over a reserve asset
///
/// Every mutating call is all-or-nothing: it either settles the reserve,
/// updates the ledger and appends one `SettlementRecord`, or returns an
/// error and leaves all three untouched.
pub struct Vault<A: ReserveAsset> {
    config: VaultConfig,
    ledger: VaultLedger,
    reserve: A,
    events: Vec<SettlementRecord>,
}

impl<A: ReserveAsset> Vault<A> {
    pub fn new(config: VaultConfig, reserve: A) -> Result<Self> {
        // VaultConfig fields are public, so re-check the cap
        FeeSchedule::new(config.fees.entry_fee_bps, config.fees.exit_fee_bps)?;
        Ok(Self {
            config,
            ledger: VaultLedger::new(),
            reserve,
            events: Vec::new(),
        })
    }

    pub fn curve(&self) -> CurveKind {
        self.config.curve
    }

    pub fn fees(&self) -> FeeSchedule {
        self.config.fees
    }

    pub fn ledger(&self) -> &VaultLedger {
        &self.ledger
    }

    pub fn reserve(&self) -> &A {
        &self.reserve
    }

    /// Direct access to the reserve; transfers into custody made here
    /// bypass `deposit` and are priced in on the next call
    pub fn reserve_mut(&mut self) -> &mut A {
        &mut self.reserve
    }

    pub fn events(&self) -> &[SettlementRecord] {
        &self.events
    }

    /// Reserve held in custody, including anything donated
    pub fn total_assets(&self) -> U256 {
        self.reserve.balance_of(&self.reserve.custody())
    }

    pub fn total_supply(&self) -> U256 {
        self.ledger.total_shares()
    }

    pub fn balance_of(&self, holder: &Pubkey) -> U256 {
        self.ledger.balance_of(holder)
    }

    /// State every conversion prices against
    pub fn pool_state(&self) -> PoolState {
        PoolState::new(self.ledger.total_shares(), self.total_assets())
    }

    pub fn convert_to_shares(&self, assets: U256) -> Result<U256> {
        self.config.curve.shares_for_deposit(self.pool_state(), assets)
    }

    pub fn convert_to_assets(&self, shares: U256) -> Result<U256> {
        self.config.curve.assets_for_redeem(self.pool_state(), shares)
    }

    /// Shares `deposit(assets, _)` would mint right now
    pub fn preview_deposit(&self, assets: U256) -> Result<U256> {
        Ok(quote_deposit(self.config.curve, &self.config.fees, self.pool_state(), assets)?.shares)
    }

    /// Reserve `redeem(shares, _, _)` would pay out right now
    pub fn preview_redeem(&self, shares: U256) -> Result<U256> {
        Ok(quote_redeem(self.config.curve, &self.config.fees, self.pool_state(), shares)?.net_assets)
    }

    /// Largest deposit accepted for any receiver in the current state
    pub fn max_deposit(&self, _receiver: &Pubkey) -> U256 {
        let curve = self.config.curve;
        core::cmp::min(curve.max_amount(), curve.deposit_capacity(self.pool_state()))
    }

    pub fn max_redeem(&self, owner: &Pubkey) -> U256 {
        self.ledger.balance_of(owner)
    }

    pub fn set_entry_fee(&mut self, fee_bps: u16) -> Result<()> {
        self.config.fees.set_entry_fee(fee_bps)?;
        msg!("Entry fee set to {} bps", fee_bps);
        Ok(())
    }

    pub fn set_exit_fee(&mut self, fee_bps: u16) -> Result<()> {
        self.config.fees.set_exit_fee(fee_bps)?;
        msg!("Exit fee set to {} bps", fee_bps);
        Ok(())
    }

    /// Pull `assets` from `caller` and mint shares to `receiver`
    pub fn deposit(
        &mut self,
        caller: &Pubkey,
        assets: U256,
        receiver: &Pubkey,
    ) -> Result<SettlementRecord> {
        // CHECKS: price against the pre-mutation state
        let state = self.pool_state();
        let quote = quote_deposit(self.config.curve, &self.config.fees, state, assets)?;

        // EFFECTS: reconciling only books what custody already holds
        self.ledger.reconcile_assets(state.total_assets)?;
        self.ledger.settle_deposit(receiver, assets, quote.shares)?;

        // INTERACTIONS: a failed pull takes the new shares back
        if let Err(err) = self.reserve.transfer_in(caller, assets) {
            msg!("Deposit transfer from {} failed: {}", caller, err);
            self.ledger.settle_redeem(receiver, quote.shares, assets)?;
            return Err(error!(VaultError::AssetTransferFailed));
        }

        let record = SettlementRecord::Deposit {
            caller: *caller,
            receiver: *receiver,
            assets: quote.net_assets,
            shares: quote.shares,
        };
        self.events.push(record.clone());
        Ok(record)
    }

    /// Burn `shares` from `owner` and pay the reserve to `receiver`
    ///
    /// Authorising the caller to act for `owner` is the host's concern.
    pub fn redeem(
        &mut self,
        shares: U256,
        receiver: &Pubkey,
        owner: &Pubkey,
    ) -> Result<SettlementRecord> {
        // CHECKS
        require!(!shares.is_zero(), VaultError::ZeroAmount);
        require!(
            shares <= self.ledger.balance_of(owner),
            VaultError::InsufficientShares
        );
        let state = self.pool_state();
        let quote = quote_redeem(self.config.curve, &self.config.fees, state, shares)?;

        // EFFECTS: the exit fee never leaves custody
        self.ledger.reconcile_assets(state.total_assets)?;
        self.ledger.settle_redeem(owner, shares, quote.net_assets)?;

        // INTERACTIONS
        if let Err(err) = self.reserve.transfer_out(receiver, quote.net_assets) {
            msg!("Redeem transfer to {} failed: {}", receiver, err);
            self.ledger.settle_deposit(owner, quote.net_assets, shares)?;
            return Err(error!(VaultError::AssetTransferFailed));
        }

        let record = SettlementRecord::Withdraw {
            owner: *owner,
            receiver: *receiver,
            assets: quote.net_assets,
            shares,
        };
        self.events.push(record.clone());
        Ok(record)
    }
}

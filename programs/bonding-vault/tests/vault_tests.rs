/// Deposit/redeem protocol tests for the library vault
///
/// Coverage:
///  Bootstrap and the concrete linear / fee scenarios
///  Preview consistency across curves and fees
///  Conservation of reserve and shares
///  Donation (first-depositor) attack behaviour
///  All-or-nothing settlement on transfer failure
///  Fee cap and query surface

use anchor_lang::prelude::*;
use bonding_vault::{
    curve::CurveKind,
    errors::VaultError,
    fees::FeeSchedule,
    math::U256,
    reserve::{InMemoryReserve, ReserveAsset},
    vault::{SettlementRecord, Vault, VaultConfig},
};

const CURVES: [CurveKind; 3] = [
    CurveKind::Linear,
    CurveKind::Quadratic,
    CurveKind::Logarithmic,
];

fn u(value: u64) -> U256 {
    U256::from(value)
}

struct Fixture {
    vault: Vault<InMemoryReserve>,
    alice: Pubkey,
    bob: Pubkey,
    custody: Pubkey,
}

fn setup(curve: CurveKind, entry_fee_bps: u16, exit_fee_bps: u16, funding: U256) -> Fixture {
    let custody = Pubkey::new_unique();
    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();

    let mut reserve = InMemoryReserve::new(custody);
    reserve.mint(&alice, funding).unwrap();
    reserve.mint(&bob, funding).unwrap();

    let config = VaultConfig::new(curve, entry_fee_bps, exit_fee_bps).unwrap();
    Fixture {
        vault: Vault::new(config, reserve).unwrap(),
        alice,
        bob,
        custody,
    }
}

fn minted(record: &SettlementRecord) -> U256 {
    match record {
        SettlementRecord::Deposit { shares, .. } => *shares,
        SettlementRecord::Withdraw { .. } => panic!("expected a deposit record"),
    }
}

fn paid_out(record: &SettlementRecord) -> U256 {
    match record {
        SettlementRecord::Withdraw { assets, .. } => *assets,
        SettlementRecord::Deposit { .. } => panic!("expected a withdraw record"),
    }
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn test_linear_deposit_deposit_redeem() {
    let Fixture {
        mut vault,
        alice,
        bob,
        ..
    } = setup(CurveKind::Linear, 0, 0, u(1_000_000));

    let first = vault.deposit(&alice, u(1000), &alice).unwrap();
    assert_eq!(minted(&first), u(1000));

    let second = vault.deposit(&bob, u(1000), &bob).unwrap();
    assert_eq!(minted(&second), u(1000));
    assert_eq!(vault.total_assets(), u(2000));
    assert_eq!(vault.total_supply(), u(2000));

    let exit = vault.redeem(u(1000), &alice, &alice).unwrap();
    assert_eq!(
        exit,
        SettlementRecord::Withdraw {
            owner: alice,
            receiver: alice,
            assets: u(1000),
            shares: u(1000),
        }
    );
    assert_eq!(vault.total_assets(), u(1000));
    assert_eq!(vault.total_supply(), u(1000));
    assert_eq!(vault.reserve().balance_of(&alice), u(1_000_000));
    assert_eq!(vault.events().len(), 3);
}

#[test]
fn test_entry_fee_on_empty_vault() {
    let Fixture {
        mut vault, alice, ..
    } = setup(CurveKind::Linear, 100, 0, u(1_000_000));

    let record = vault.deposit(&alice, u(1_000_000), &alice).unwrap();
    assert_eq!(
        record,
        SettlementRecord::Deposit {
            caller: alice,
            receiver: alice,
            assets: u(990_000),
            shares: u(990_000),
        }
    );
    // the fee stays in custody
    assert_eq!(vault.total_assets(), u(1_000_000));
    assert_eq!(vault.balance_of(&alice), u(990_000));
}

#[test]
fn test_quadratic_ceiling_leaves_state_unchanged() {
    let funding = U256::exp10(39);
    let Fixture {
        mut vault, alice, ..
    } = setup(CurveKind::Quadratic, 0, 0, funding);

    let too_large = U256::exp10(38) + U256::one();
    assert_eq!(
        vault.deposit(&alice, too_large, &alice).unwrap_err(),
        error!(VaultError::AmountTooLarge)
    );
    assert!(vault.total_assets().is_zero());
    assert!(vault.total_supply().is_zero());
    assert_eq!(vault.reserve().balance_of(&alice), funding);
    assert!(vault.events().is_empty());

    // exactly at the ceiling is accepted
    let record = vault.deposit(&alice, U256::exp10(38), &alice).unwrap();
    assert_eq!(minted(&record), U256::exp10(38));
}

#[test]
fn test_deposit_to_other_receiver() {
    let Fixture {
        mut vault,
        alice,
        bob,
        ..
    } = setup(CurveKind::Logarithmic, 0, 0, u(1_000_000));

    let record = vault.deposit(&alice, u(5000), &bob).unwrap();
    assert_eq!(
        record,
        SettlementRecord::Deposit {
            caller: alice,
            receiver: bob,
            assets: u(5000),
            shares: u(5000),
        }
    );
    assert!(vault.balance_of(&alice).is_zero());
    assert_eq!(vault.balance_of(&bob), u(5000));
    assert_eq!(vault.reserve().balance_of(&alice), u(995_000));

    // bob redeems to alice
    let record = vault.redeem(u(5000), &alice, &bob).unwrap();
    assert_eq!(
        record,
        SettlementRecord::Withdraw {
            owner: bob,
            receiver: alice,
            assets: u(5000),
            shares: u(5000),
        }
    );
    assert_eq!(vault.reserve().balance_of(&alice), u(1_000_000));
}

// =============================================================================
// Preview consistency
// =============================================================================

#[test]
fn test_previews_match_settlement() {
    for curve in CURVES {
        let Fixture {
            mut vault,
            alice,
            bob,
            ..
        } = setup(curve, 250, 75, u(10_000_000_000));

        vault.deposit(&alice, u(1_000_000_000), &alice).unwrap();

        let expected_shares = vault.preview_deposit(u(500_000_000)).unwrap();
        let record = vault.deposit(&bob, u(500_000_000), &bob).unwrap();
        assert_eq!(minted(&record), expected_shares, "{:?}", curve);

        let half = vault.balance_of(&alice) / u(2);
        let expected_assets = vault.preview_redeem(half).unwrap();
        let record = vault.redeem(half, &alice, &alice).unwrap();
        assert_eq!(paid_out(&record), expected_assets, "{:?}", curve);
    }
}

#[test]
fn test_convert_round_trip_never_creates_value() {
    for curve in CURVES {
        let Fixture {
            mut vault, alice, ..
        } = setup(curve, 0, 0, u(10_000_000));
        vault.deposit(&alice, u(3_000_000), &alice).unwrap();

        for assets in [1u64, 7, 1_000, 123_456, 2_000_000] {
            let shares = vault.convert_to_shares(u(assets)).unwrap();
            // selling them back from the current supply never pays more
            let supply = vault.total_supply();
            if shares <= supply {
                assert!(vault.convert_to_assets(shares).unwrap() <= u(assets));
            }
        }
    }
}

// =============================================================================
// Conservation
// =============================================================================

fn assert_conserved(fixture: &Fixture, funding: U256) {
    let Fixture {
        vault,
        alice,
        bob,
        custody,
    } = fixture;
    let reserve = vault.reserve();
    assert_eq!(
        reserve.balance_of(alice) + reserve.balance_of(bob) + reserve.balance_of(custody),
        funding + funding
    );
    assert_eq!(vault.total_assets(), vault.ledger().total_assets());

    let held = vault
        .ledger()
        .holders()
        .fold(U256::zero(), |acc, (_, balance)| acc + *balance);
    assert_eq!(held, vault.total_supply());
}

#[test]
fn test_conservation_without_fees() {
    for curve in CURVES {
        let funding = u(1_000_000_000);
        let mut fixture = setup(curve, 0, 0, funding);
        let (alice, bob) = (fixture.alice, fixture.bob);

        fixture.vault.deposit(&alice, u(10_000_000), &alice).unwrap();
        fixture.vault.deposit(&bob, u(25_000_000), &bob).unwrap();
        assert_conserved(&fixture, funding);

        let part = fixture.vault.balance_of(&alice) / u(3);
        fixture.vault.redeem(part, &alice, &alice).unwrap();
        fixture.vault.deposit(&alice, u(4_321), &bob).unwrap();
        assert_conserved(&fixture, funding);

        // everyone leaves; rounding dust stays with the vault
        let all_bob = fixture.vault.balance_of(&bob);
        fixture.vault.redeem(all_bob, &bob, &bob).unwrap();
        let all_alice = fixture.vault.balance_of(&alice);
        fixture.vault.redeem(all_alice, &alice, &alice).unwrap();

        assert_conserved(&fixture, funding);
        assert!(fixture.vault.total_supply().is_zero());
        assert!(fixture.vault.total_assets().is_zero());
        let reserve = fixture.vault.reserve();
        assert_eq!(reserve.balance_of(&alice) + reserve.balance_of(&bob), funding + funding);
    }
}

#[test]
fn test_conservation_with_fees() {
    for curve in CURVES {
        let funding = u(1_000_000_000);
        let mut fixture = setup(curve, 100, 300, funding);
        let (alice, bob) = (fixture.alice, fixture.bob);

        fixture.vault.deposit(&alice, u(50_000_000), &alice).unwrap();
        fixture.vault.deposit(&bob, u(20_000_000), &bob).unwrap();
        let all_alice = fixture.vault.balance_of(&alice);
        fixture.vault.redeem(all_alice, &alice, &alice).unwrap();
        assert_conserved(&fixture, funding);

        let all_bob = fixture.vault.balance_of(&bob);
        fixture.vault.redeem(all_bob, &bob, &bob).unwrap();
        assert_conserved(&fixture, funding);

        // fees outlive the last holder
        assert!(fixture.vault.total_supply().is_zero());
        assert!(!fixture.vault.total_assets().is_zero());
        let reserve = fixture.vault.reserve();
        assert!(reserve.balance_of(&alice) + reserve.balance_of(&bob) < funding + funding);
    }
}

#[test]
fn test_exit_fee_benefits_remaining_holders() {
    let Fixture {
        mut vault,
        alice,
        bob,
        ..
    } = setup(CurveKind::Linear, 0, 1000, u(1_000_000));

    vault.deposit(&alice, u(1000), &alice).unwrap();
    vault.deposit(&bob, u(1000), &bob).unwrap();

    // 10% of 1000 stays behind
    let record = vault.redeem(u(1000), &alice, &alice).unwrap();
    assert_eq!(paid_out(&record), u(900));
    assert_eq!(vault.total_assets(), u(1100));
    assert_eq!(vault.convert_to_assets(u(1000)).unwrap(), u(1100));
}

// =============================================================================
// Donation attack
// =============================================================================

#[test]
fn test_prefunded_vault_bootstraps_one_to_one() {
    let Fixture {
        mut vault,
        alice,
        bob,
        custody,
    } = setup(CurveKind::Linear, 0, 0, u(1_000_000));

    // reserve sent straight to custody is priced in, not minted against
    vault.reserve_mut().transfer(&bob, &custody, u(5000)).unwrap();
    assert_eq!(vault.total_assets(), u(5000));

    let first = vault.deposit(&alice, u(1000), &alice).unwrap();
    assert_eq!(minted(&first), u(1000));

    // the next depositor pays the inflated price
    let second = vault.deposit(&bob, u(1000), &bob).unwrap();
    assert_eq!(minted(&second), u(166));

    let exit = vault.redeem(u(1000), &alice, &alice).unwrap();
    assert_eq!(paid_out(&exit), u(6003));
}

#[test]
fn test_first_depositor_griefing() {
    let Fixture {
        mut vault,
        alice: attacker,
        bob: victim,
        custody,
    } = setup(CurveKind::Linear, 0, 0, u(10_000_000));

    vault.deposit(&attacker, u(1), &attacker).unwrap();
    vault
        .reserve_mut()
        .transfer(&attacker, &custody, u(1_000_000))
        .unwrap();

    // victim's deposit rounds down to nothing
    let record = vault.deposit(&victim, u(999_999), &victim).unwrap();
    assert!(minted(&record).is_zero());
    assert!(vault.max_redeem(&victim).is_zero());
    assert_eq!(vault.total_assets(), u(2_000_000));

    let exit = vault.redeem(u(1), &attacker, &attacker).unwrap();
    assert_eq!(paid_out(&exit), u(2_000_000));
    assert_eq!(vault.reserve().balance_of(&attacker), u(10_999_999));
    assert_eq!(vault.reserve().balance_of(&victim), u(9_000_001));
}

// =============================================================================
// All-or-nothing settlement
// =============================================================================

#[test]
fn test_failed_deposit_transfer_changes_nothing() {
    let Fixture {
        mut vault, alice, ..
    } = setup(CurveKind::Quadratic, 0, 0, u(1_000_000));

    vault.reserve_mut().freeze(&alice);
    assert_eq!(
        vault.deposit(&alice, u(1000), &alice).unwrap_err(),
        error!(VaultError::AssetTransferFailed)
    );
    assert!(vault.total_supply().is_zero());
    assert!(vault.total_assets().is_zero());
    assert!(vault.events().is_empty());

    // not enough reserve is a failed pull too
    vault.reserve_mut().thaw(&alice);
    assert_eq!(
        vault.deposit(&alice, u(1_000_001), &alice).unwrap_err(),
        error!(VaultError::AssetTransferFailed)
    );
    assert!(vault.events().is_empty());
}

#[test]
fn test_failed_deposit_transfer_restores_receiver() {
    let Fixture {
        mut vault,
        alice,
        bob,
        custody,
    } = setup(CurveKind::Linear, 0, 0, u(1_000_000));

    vault.deposit(&bob, u(1000), &bob).unwrap();
    vault.reserve_mut().transfer(&bob, &custody, u(500)).unwrap();
    vault.reserve_mut().freeze(&alice);

    assert_eq!(
        vault.deposit(&alice, u(300), &bob).unwrap_err(),
        error!(VaultError::AssetTransferFailed)
    );
    assert_eq!(vault.balance_of(&bob), u(1000));
    assert_eq!(vault.total_supply(), u(1000));
    assert_eq!(vault.total_assets(), u(1500));
    assert_eq!(vault.ledger().total_assets(), u(1500));
    assert_eq!(vault.reserve().balance_of(&alice), u(1_000_000));
    assert_eq!(vault.events().len(), 1);

    vault.reserve_mut().thaw(&alice);
    let record = vault.deposit(&alice, u(300), &bob).unwrap();
    assert_eq!(minted(&record), u(200));
    assert_eq!(vault.ledger().total_assets(), u(1800));
}

#[test]
fn test_failed_redeem_transfer_restores_shares() {
    let Fixture {
        mut vault,
        alice,
        bob,
        ..
    } = setup(CurveKind::Linear, 0, 100, u(1_000_000));

    vault.deposit(&alice, u(1000), &alice).unwrap();
    vault.reserve_mut().freeze(&bob);

    assert_eq!(
        vault.redeem(u(400), &bob, &alice).unwrap_err(),
        error!(VaultError::AssetTransferFailed)
    );
    assert_eq!(vault.balance_of(&alice), u(1000));
    assert_eq!(vault.total_supply(), u(1000));
    assert_eq!(vault.total_assets(), u(1000));
    assert_eq!(vault.ledger().total_assets(), u(1000));
    assert_eq!(vault.events().len(), 1);

    vault.reserve_mut().thaw(&bob);
    let record = vault.redeem(u(400), &bob, &alice).unwrap();
    assert_eq!(paid_out(&record), u(396));
    assert_eq!(vault.total_assets(), u(604));
    assert_eq!(vault.reserve().balance_of(&bob), u(1_000_396));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_zero_amounts_rejected() {
    let Fixture {
        mut vault, alice, ..
    } = setup(CurveKind::Linear, 0, 0, u(1_000_000));

    assert_eq!(
        vault.deposit(&alice, U256::zero(), &alice).unwrap_err(),
        error!(VaultError::ZeroAmount)
    );
    vault.deposit(&alice, u(10), &alice).unwrap();
    assert_eq!(
        vault.redeem(U256::zero(), &alice, &alice).unwrap_err(),
        error!(VaultError::ZeroAmount)
    );
}

#[test]
fn test_redeem_more_than_owned() {
    let Fixture {
        mut vault,
        alice,
        bob,
        ..
    } = setup(CurveKind::Logarithmic, 0, 0, u(1_000_000));

    vault.deposit(&alice, u(1000), &alice).unwrap();
    assert_eq!(
        vault.redeem(u(1), &bob, &bob).unwrap_err(),
        error!(VaultError::InsufficientShares)
    );
    assert_eq!(
        vault.redeem(u(1001), &alice, &alice).unwrap_err(),
        error!(VaultError::InsufficientShares)
    );
    assert_eq!(vault.max_redeem(&alice), u(1000));
}

#[test]
fn test_fee_cap() {
    let config = VaultConfig {
        curve: CurveKind::Linear,
        fees: FeeSchedule {
            entry_fee_bps: 6000,
            exit_fee_bps: 0,
        },
    };
    assert!(Vault::new(config, InMemoryReserve::new(Pubkey::new_unique())).is_err());
    assert_eq!(
        VaultConfig::new(CurveKind::Linear, 0, 5001).unwrap_err(),
        error!(VaultError::FeeExceedsMaximum)
    );

    let Fixture { mut vault, .. } = setup(CurveKind::Linear, 100, 100, u(0));
    assert_eq!(
        vault.set_entry_fee(5001).unwrap_err(),
        error!(VaultError::FeeExceedsMaximum)
    );
    assert_eq!(
        vault.set_exit_fee(u16::MAX).unwrap_err(),
        error!(VaultError::FeeExceedsMaximum)
    );
    assert_eq!(vault.fees(), FeeSchedule::new(100, 100).unwrap());

    vault.set_entry_fee(5000).unwrap();
    vault.set_exit_fee(0).unwrap();
    assert_eq!(vault.fees(), FeeSchedule::new(5000, 0).unwrap());
}

#[test]
fn test_max_deposit_tracks_reserve_headroom() {
    let funding = U256::exp10(77);
    let Fixture {
        mut vault,
        alice,
        bob,
        ..
    } = setup(CurveKind::Linear, 0, 0, funding);

    assert_eq!(vault.max_deposit(&alice), funding);
    assert_eq!(
        vault.deposit(&alice, funding + U256::one(), &alice).unwrap_err(),
        error!(VaultError::AmountTooLarge)
    );

    vault.deposit(&alice, funding, &alice).unwrap();

    // the reserve can only grow to U256::MAX - 1 at a 1:1 price
    let room = U256::MAX - U256::one() - funding;
    assert_eq!(vault.max_deposit(&bob), room);
    assert_eq!(
        vault.deposit(&bob, room + U256::one(), &bob).unwrap_err(),
        error!(VaultError::ExceedsMaxDeposit)
    );

    let record = vault.deposit(&bob, room, &bob).unwrap();
    assert_eq!(minted(&record), room);
    assert_eq!(vault.total_assets(), U256::MAX - U256::one());
}

#[test]
fn test_query_surface() {
    let Fixture {
        mut vault, alice, ..
    } = setup(CurveKind::Quadratic, 100, 200, u(1_000_000));

    assert_eq!(vault.curve(), CurveKind::Quadratic);
    assert_eq!(vault.fees(), FeeSchedule::new(100, 200).unwrap());
    assert_eq!(vault.preview_deposit(u(1000)).unwrap(), u(990));
    assert_eq!(vault.convert_to_shares(u(1000)).unwrap(), u(1000));

    vault.deposit(&alice, u(1000), &alice).unwrap();
    assert_eq!(vault.total_supply(), u(990));
    assert_eq!(vault.max_redeem(&alice), u(990));
    // full redeem releases the whole reserve before the exit fee
    assert_eq!(vault.convert_to_assets(u(990)).unwrap(), u(1000));
    assert_eq!(vault.preview_redeem(u(990)).unwrap(), u(980));
}

#![cfg(test)]

use super::*;
use crate::test::TestSetup;
use soroban_sdk::{testutils::Address as _, Address};

const DAY: u64 = 86_400;

#[test]
fn test_non_manager_cannot_set_fee_percentage() {
    let setup = TestSetup::new();
    let random = Address::generate(&setup.env);

    let result = setup.client.try_set_fee_percentage(&random, &5);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    assert_eq!(setup.client.get_fee_percentage(), 0);

    // roles do not overlap: neither owner nor oracle may configure fees
    let result = setup.client.try_set_fee_percentage(&setup.owner, &5);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    let result = setup.client.try_set_fee_percentage(&setup.oracle, &5);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
}

#[test]
fn test_non_manager_cannot_set_treasury() {
    let setup = TestSetup::new();
    let random = Address::generate(&setup.env);

    let result = setup.client.try_set_treasury(&random, &setup.treasury);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    assert_eq!(setup.client.get_treasury(), None);
}

#[test]
fn test_non_oracle_cannot_start_lockup() {
    let setup = TestSetup::new();
    setup.native_admin.mint(&setup.contributor, &1_000);
    setup
        .client
        .add_bounty(&setup.contributor, &1, &Asset::Native, &100, &DAY);

    let result = setup.client.try_start_lockup(&setup.manager, &1);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    assert_eq!(setup.client.get_bounty(&1).lockup_end, 0);
}

#[test]
fn test_non_oracle_cannot_release() {
    let setup = TestSetup::new();
    setup.native_admin.mint(&setup.contributor, &1_000);
    setup
        .client
        .add_bounty(&setup.contributor, &1, &Asset::Native, &100, &DAY);
    setup.client.start_lockup(&setup.oracle, &1);
    setup.advance_time(DAY);

    let result = setup
        .client
        .try_release_bounty(&setup.contributor, &1, &setup.recipient);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    assert!(!setup.client.get_bounty(&1).is_released);
    assert_eq!(setup.native.balance(&setup.client.address), 100);
}

#[test]
fn test_owner_rotates_oracle() {
    let setup = TestSetup::new();
    setup.native_admin.mint(&setup.contributor, &1_000);
    setup
        .client
        .add_bounty(&setup.contributor, &1, &Asset::Native, &100, &DAY);

    let new_oracle = Address::generate(&setup.env);
    setup.client.set_oracle(&setup.owner, &new_oracle);

    // the old oracle no longer has the capability
    let result = setup.client.try_start_lockup(&setup.oracle, &1);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));

    setup.client.start_lockup(&new_oracle, &1);
    assert!(setup.client.get_bounty(&1).lockup_end > 0);
}

#[test]
fn test_owner_rotates_manager() {
    let setup = TestSetup::new();

    let new_manager = Address::generate(&setup.env);
    setup.client.set_manager(&setup.owner, &new_manager);

    let result = setup.client.try_set_fee_percentage(&setup.manager, &5);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));

    setup.client.set_fee_percentage(&new_manager, &5);
    assert_eq!(setup.client.get_fee_percentage(), 5);
}

#[test]
fn test_only_owner_rotates_roles() {
    let setup = TestSetup::new();
    let random = Address::generate(&setup.env);

    let result = setup.client.try_set_oracle(&setup.manager, &random);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    let result = setup.client.try_set_manager(&setup.oracle, &random);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));
    let result = setup.client.try_transfer_ownership(&random, &random);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));

    assert_eq!(setup.client.get_roles().oracle, setup.oracle);
    assert_eq!(setup.client.get_roles().manager, setup.manager);
    assert_eq!(setup.client.get_roles().owner, setup.owner);
}

#[test]
fn test_ownership_transfer_hands_over_rotation() {
    let setup = TestSetup::new();
    let new_owner = Address::generate(&setup.env);
    let new_oracle = Address::generate(&setup.env);

    setup.client.transfer_ownership(&setup.owner, &new_owner);

    // the previous owner lost the capability
    let result = setup.client.try_set_oracle(&setup.owner, &new_oracle);
    assert_eq!(result, Err(Ok(Error::Unauthorized)));

    setup.client.set_oracle(&new_owner, &new_oracle);
    assert_eq!(setup.client.get_roles().oracle, new_oracle);
}

//! Conservation checks for the bounty ledger.
//!
//! The core conservation law: a bounty's `total_amount` always equals the sum
//! of its live contribution entries. Checked after every ledger mutation;
//! a violation traps, rolling back the whole invocation.

use crate::{read_contribution, read_contributors, Bounty};
use soroban_sdk::Env;

pub(crate) fn assert_conservation(env: &Env, bounty_id: u64, bounty: &Bounty) {
    if bounty.total_amount < 0 {
        panic!("Invariant violated: total_amount must be non-negative");
    }

    let mut sum: i128 = 0;
    for contributor in read_contributors(env, bounty_id).iter() {
        let entry = read_contribution(env, bounty_id, &contributor);
        if entry <= 0 {
            panic!("Invariant violated: indexed contribution must be positive");
        }
        sum = sum
            .checked_add(entry)
            .unwrap_or_else(|| panic!("Invariant violated: contribution sum overflow"));
    }

    if sum != bounty.total_amount {
        panic!("Invariant violated: total_amount != sum of contributions");
    }
}

pub(crate) fn verify_conservation(env: &Env, bounty_id: u64, bounty: &Bounty) -> bool {
    if bounty.total_amount < 0 {
        return false;
    }
    let mut sum: i128 = 0;
    for contributor in read_contributors(env, bounty_id).iter() {
        let entry = read_contribution(env, bounty_id, &contributor);
        if entry <= 0 {
            return false;
        }
        match sum.checked_add(entry) {
            Some(s) => sum = s,
            None => return false,
        }
    }
    sum == bounty.total_amount
}

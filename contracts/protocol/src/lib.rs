//! Bounty-escrow protocol.
//!
//! Third parties contribute value (the native asset or any standard fungible
//! token) to a numbered bounty. The oracle later starts a fixed-duration
//! lockup and, once it elapses, either releases the pool to a recipient
//! (minus the protocol fee) or leaves contributors free to reclaim their
//! stake. The manager configures the fee percentage and the treasury that
//! receives the fee cut.
//!
//! State machine per bounty id:
//!
//! ```text
//! Open --start_lockup--> Locked --release_bounty--> Released (terminal)
//! Locked --reclaim_contribution (per contributor, time >= lockup_end)--> Locked
//! ```
//!
//! Contributions are accepted in Open and Locked until release. `Released`
//! is terminal: no further contribution, lockup, or reclaim succeeds.

#![no_std]

mod events;
mod invariants;
mod reentrancy_guard;
#[cfg(test)]
mod test_access;

use escrow_core::asset::{self, Asset};
use escrow_core::fee;
use events::{
    emit_bounty_added, emit_bounty_released, emit_contribution_reclaimed, emit_fee_collected,
    emit_fee_percentage_updated, emit_fee_skipped, emit_lockup_started,
    emit_protocol_initialized, emit_role_rotated, emit_treasury_updated, BountyAdded,
    BountyReleased, ContributionReclaimed, FeeCollected, FeePercentageUpdated, FeeSkipped,
    LockupStarted, ProtocolInitialized, RoleRotated, TreasuryUpdated, EVENT_VERSION,
};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env, Vec,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InvalidDuration = 5,
    InvalidFeePercentage = 6,
    InvalidTreasury = 7,
    InvalidRecipient = 8,
    /// Returned when a token identifier is not a contract address.
    InvalidAsset = 9,
    /// Returned when a contribution names a different asset than the one
    /// already bound to the bounty id.
    AssetMismatch = 10,
    BountyNotFound = 11,
    /// Release is terminal: it forecloses contribution and reclaim alike.
    AlreadyReleased = 12,
    LockupAlreadyStarted = 13,
    LockupNotStarted = 14,
    LockupNotElapsed = 15,
    /// Returned when the caller has no outstanding contribution to reclaim.
    NothingToReclaim = 16,
}

/// The three protocol roles. Fixed at `init`; rotated only by the owner.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Roles {
    pub owner: Address,
    pub manager: Address,
    pub oracle: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bounty {
    /// Fixed at first contribution to this id.
    pub asset: Asset,
    /// Sum of all live (non-reclaimed) contributions, in the asset's
    /// smallest unit.
    pub total_amount: i128,
    /// Seconds; fixed at creation.
    pub lockup_duration: u64,
    /// 0 until the oracle starts the lockup, then start time + duration.
    pub lockup_end: u64,
    pub is_released: bool,
    /// Set only on release.
    pub recipient: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionKey {
    pub bounty_id: u64,
    pub contributor: Address,
}

#[contracttype]
pub enum DataKey {
    Roles,
    NativeAsset,
    FeePercentage,
    Treasury,
    BountyCounter,
    BountyIndex,             // Vec<u64> of all bounty ids
    Bounty(u64),             // bounty_id -> Bounty
    Contribution(ContributionKey), // (bounty_id, contributor) -> i128
    Contributors(u64),       // bounty_id -> Vec<Address>
    ReentrancyGuard,
}

pub(crate) fn read_contribution(env: &Env, bounty_id: u64, contributor: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Contribution(ContributionKey {
            bounty_id,
            contributor: contributor.clone(),
        }))
        .unwrap_or(0)
}

pub(crate) fn read_contributors(env: &Env, bounty_id: u64) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Contributors(bounty_id))
        .unwrap_or(Vec::new(env))
}

fn write_contribution(env: &Env, bounty_id: u64, contributor: &Address, amount: i128) {
    let key = DataKey::Contribution(ContributionKey {
        bounty_id,
        contributor: contributor.clone(),
    });
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
    }
}

fn read_roles(env: &Env) -> Result<Roles, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Roles)
        .ok_or(Error::NotInitialized)
}

fn read_bounty(env: &Env, bounty_id: u64) -> Result<Bounty, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Bounty(bounty_id))
        .ok_or(Error::BountyNotFound)
}

fn write_bounty(env: &Env, bounty_id: u64, bounty: &Bounty) {
    env.storage()
        .persistent()
        .set(&DataKey::Bounty(bounty_id), bounty);
}

#[contract]
pub struct BountyProtocolContract;

#[contractimpl]
impl BountyProtocolContract {
    /// Initialize the protocol with its three roles and the token contract
    /// the `Asset::Native` sentinel resolves to.
    pub fn init(
        env: Env,
        owner: Address,
        manager: Address,
        oracle: Address,
        native_asset: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Roles) {
            return Err(Error::AlreadyInitialized);
        }
        asset::validate_asset(&env, &Asset::Token(native_asset.clone()))
            .map_err(|_| Error::InvalidAsset)?;

        let roles = Roles {
            owner: owner.clone(),
            manager: manager.clone(),
            oracle: oracle.clone(),
        };
        env.storage().instance().set(&DataKey::Roles, &roles);
        env.storage()
            .instance()
            .set(&DataKey::NativeAsset, &native_asset);

        emit_protocol_initialized(
            &env,
            ProtocolInitialized {
                version: EVENT_VERSION,
                owner,
                manager,
                oracle,
                native_asset,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    /// Contribute `amount` of `asset` to the bounty at `bounty_id`.
    ///
    /// Creates the bounty if the id is new (asset and lockup duration become
    /// fixed for that id); otherwise adds to the existing pool, which must
    /// not be released and must be denominated in the same asset. For an
    /// existing id the `lockup_duration` argument is ignored. Contributions
    /// are accepted up until release, even while the lockup is running.
    ///
    /// # Reentrancy
    /// Protected by the shared reentrancy guard. The bounty record,
    /// contribution entry, and indexes are all written before the inbound
    /// token transfer is pulled, so a malicious token callback cannot
    /// re-enter with stale state.
    pub fn add_bounty(
        env: Env,
        contributor: Address,
        bounty_id: u64,
        asset: Asset,
        amount: i128,
        lockup_duration: u64,
    ) -> Result<(), Error> {
        // GUARD: acquire reentrancy lock
        reentrancy_guard::acquire(&env);

        contributor.require_auth();

        if !env.storage().instance().has(&DataKey::Roles) {
            return Err(Error::NotInitialized);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let bounty = match env
            .storage()
            .persistent()
            .get::<DataKey, Bounty>(&DataKey::Bounty(bounty_id))
        {
            Some(mut existing) => {
                if existing.is_released {
                    return Err(Error::AlreadyReleased);
                }
                if existing.asset != asset {
                    return Err(Error::AssetMismatch);
                }
                existing.total_amount = existing
                    .total_amount
                    .checked_add(amount)
                    .ok_or(Error::InvalidAmount)?;
                existing
            }
            None => {
                if lockup_duration == 0 {
                    return Err(Error::InvalidDuration);
                }
                asset::validate_asset(&env, &asset).map_err(|_| Error::InvalidAsset)?;

                let mut index: Vec<u64> = env
                    .storage()
                    .persistent()
                    .get(&DataKey::BountyIndex)
                    .unwrap_or(Vec::new(&env));
                index.push_back(bounty_id);
                env.storage().persistent().set(&DataKey::BountyIndex, &index);

                let counter: u64 = env
                    .storage()
                    .instance()
                    .get(&DataKey::BountyCounter)
                    .unwrap_or(0);
                env.storage()
                    .instance()
                    .set(&DataKey::BountyCounter, &counter.checked_add(1).unwrap());

                Bounty {
                    asset: asset.clone(),
                    total_amount: amount,
                    lockup_duration,
                    lockup_end: 0,
                    is_released: false,
                    recipient: None,
                }
            }
        };

        // EFFECTS: commit the ledger before the external call
        let entry = read_contribution(&env, bounty_id, &contributor);
        if entry == 0 {
            let mut contributors = read_contributors(&env, bounty_id);
            contributors.push_back(contributor.clone());
            env.storage()
                .persistent()
                .set(&DataKey::Contributors(bounty_id), &contributors);
        }
        write_contribution(
            &env,
            bounty_id,
            &contributor,
            entry.checked_add(amount).ok_or(Error::InvalidAmount)?,
        );
        write_bounty(&env, bounty_id, &bounty);

        invariants::assert_conservation(&env, bounty_id, &bounty);

        // INTERACTION: pull the deposit last
        let native_asset: Address = env.storage().instance().get(&DataKey::NativeAsset).unwrap();
        let client = token::Client::new(&env, &bounty.asset.token_address(&native_asset));
        client.transfer(&contributor, &env.current_contract_address(), &amount);

        emit_bounty_added(
            &env,
            BountyAdded {
                version: EVENT_VERSION,
                bounty_id,
                contributor,
                asset,
                amount,
                total_amount: bounty.total_amount,
                timestamp: env.ledger().timestamp(),
            },
        );

        // GUARD: release reentrancy lock
        reentrancy_guard::release(&env);
        Ok(())
    }

    /// Start the lockup timer for a bounty. Oracle only.
    ///
    /// Sets `lockup_end = now + lockup_duration` exactly once; a second call
    /// fails rather than extending the window.
    pub fn start_lockup(env: Env, caller: Address, bounty_id: u64) -> Result<(), Error> {
        caller.require_auth();
        let roles = read_roles(&env)?;
        if caller != roles.oracle {
            return Err(Error::Unauthorized);
        }

        let mut bounty = read_bounty(&env, bounty_id)?;
        if bounty.is_released {
            return Err(Error::AlreadyReleased);
        }
        if bounty.lockup_end != 0 {
            return Err(Error::LockupAlreadyStarted);
        }

        let now = env.ledger().timestamp();
        bounty.lockup_end = now
            .checked_add(bounty.lockup_duration)
            .ok_or(Error::InvalidDuration)?;
        write_bounty(&env, bounty_id, &bounty);

        emit_lockup_started(
            &env,
            LockupStarted {
                version: EVENT_VERSION,
                bounty_id,
                lockup_end: bounty.lockup_end,
                timestamp: now,
            },
        );

        Ok(())
    }

    /// Release the bounty pool to `recipient`. Oracle only; requires the
    /// lockup to have started and elapsed.
    ///
    /// Payout is fused into release: the fee (computed once, on the full
    /// pool) goes to the treasury and the remainder to the recipient in the
    /// same invocation. If a fee is due but no treasury is configured, the
    /// fee transfer is skipped and flagged via the `fee_skipped` event; the
    /// recipient still receives the net amount.
    ///
    /// # Reentrancy
    /// Protected by the shared reentrancy guard. The bounty is marked
    /// released *before* the outbound transfers (checks-effects-interactions),
    /// so re-entrant release or reclaim attempts observe the terminal state.
    pub fn release_bounty(
        env: Env,
        caller: Address,
        bounty_id: u64,
        recipient: Address,
    ) -> Result<(), Error> {
        // GUARD: acquire reentrancy lock
        reentrancy_guard::acquire(&env);

        caller.require_auth();
        let roles = read_roles(&env)?;
        if caller != roles.oracle {
            return Err(Error::Unauthorized);
        }
        if recipient == env.current_contract_address() {
            return Err(Error::InvalidRecipient);
        }

        let mut bounty = read_bounty(&env, bounty_id)?;
        if bounty.is_released {
            return Err(Error::AlreadyReleased);
        }
        if bounty.lockup_end == 0 {
            return Err(Error::LockupNotStarted);
        }
        let now = env.ledger().timestamp();
        if now < bounty.lockup_end {
            return Err(Error::LockupNotElapsed);
        }

        let percentage = Self::get_fee_percentage(env.clone());
        let treasury: Option<Address> = env.storage().instance().get(&DataKey::Treasury);
        let gross = bounty.total_amount;
        let (fee_amount, net_amount) = fee::split_amount(gross, percentage);

        // EFFECTS: mark released before any transfer
        bounty.is_released = true;
        bounty.recipient = Some(recipient.clone());
        write_bounty(&env, bounty_id, &bounty);

        invariants::assert_conservation(&env, bounty_id, &bounty);

        // INTERACTIONS: treasury cut first, then the recipient
        let native_asset: Address = env.storage().instance().get(&DataKey::NativeAsset).unwrap();
        let client = token::Client::new(&env, &bounty.asset.token_address(&native_asset));
        let contract_address = env.current_contract_address();

        if fee_amount > 0 {
            match treasury {
                Some(treasury) => {
                    client.transfer(&contract_address, &treasury, &fee_amount);
                    emit_fee_collected(
                        &env,
                        FeeCollected {
                            version: EVENT_VERSION,
                            bounty_id,
                            amount: fee_amount,
                            percentage,
                            treasury,
                            timestamp: now,
                        },
                    );
                }
                None => {
                    emit_fee_skipped(
                        &env,
                        FeeSkipped {
                            version: EVENT_VERSION,
                            bounty_id,
                            fee_amount,
                            timestamp: now,
                        },
                    );
                }
            }
        }
        if net_amount > 0 {
            client.transfer(&contract_address, &recipient, &net_amount);
        }

        emit_bounty_released(
            &env,
            BountyReleased {
                version: EVENT_VERSION,
                bounty_id,
                recipient,
                gross_amount: gross,
                fee_amount,
                net_amount,
                timestamp: now,
            },
        );

        // GUARD: release reentrancy lock
        reentrancy_guard::release(&env);
        Ok(())
    }

    /// Return the caller's outstanding contribution. Self-service; requires
    /// the lockup to have started and elapsed, and the bounty to be
    /// unreleased: release permanently forecloses reclaim for every
    /// contributor. No fee is applied to reclaims.
    ///
    /// # Reentrancy
    /// Protected by the shared reentrancy guard. The contribution entry is
    /// zeroed and `total_amount` decremented *before* the outbound transfer,
    /// so a re-entrant reclaim finds nothing left to take.
    pub fn reclaim_contribution(
        env: Env,
        contributor: Address,
        bounty_id: u64,
    ) -> Result<(), Error> {
        // GUARD: acquire reentrancy lock
        reentrancy_guard::acquire(&env);

        contributor.require_auth();

        if !env.storage().instance().has(&DataKey::Roles) {
            return Err(Error::NotInitialized);
        }

        let mut bounty = read_bounty(&env, bounty_id)?;
        if bounty.is_released {
            return Err(Error::AlreadyReleased);
        }
        if bounty.lockup_end == 0 {
            return Err(Error::LockupNotStarted);
        }
        if env.ledger().timestamp() < bounty.lockup_end {
            return Err(Error::LockupNotElapsed);
        }

        let amount = read_contribution(&env, bounty_id, &contributor);
        if amount == 0 {
            return Err(Error::NothingToReclaim);
        }

        // EFFECTS: zero the entry and shrink the pool before the transfer
        write_contribution(&env, bounty_id, &contributor, 0);
        let mut contributors = read_contributors(&env, bounty_id);
        if let Some(index) = contributors.first_index_of(&contributor) {
            let _ = contributors.remove(index);
        }
        env.storage()
            .persistent()
            .set(&DataKey::Contributors(bounty_id), &contributors);

        bounty.total_amount = bounty
            .total_amount
            .checked_sub(amount)
            .ok_or(Error::InvalidAmount)?;
        write_bounty(&env, bounty_id, &bounty);

        invariants::assert_conservation(&env, bounty_id, &bounty);

        // INTERACTION: external token transfer is last
        let native_asset: Address = env.storage().instance().get(&DataKey::NativeAsset).unwrap();
        let client = token::Client::new(&env, &bounty.asset.token_address(&native_asset));
        client.transfer(&env.current_contract_address(), &contributor, &amount);

        emit_contribution_reclaimed(
            &env,
            ContributionReclaimed {
                version: EVENT_VERSION,
                bounty_id,
                contributor,
                amount,
                total_remaining: bounty.total_amount,
                timestamp: env.ledger().timestamp(),
            },
        );

        // GUARD: release reentrancy lock
        reentrancy_guard::release(&env);
        Ok(())
    }

    /// Set the protocol fee percentage (whole percent, 0–100). Manager only.
    pub fn set_fee_percentage(env: Env, caller: Address, percentage: u32) -> Result<(), Error> {
        caller.require_auth();
        let roles = read_roles(&env)?;
        if caller != roles.manager {
            return Err(Error::Unauthorized);
        }
        if percentage > fee::MAX_FEE_PERCENTAGE {
            return Err(Error::InvalidFeePercentage);
        }

        env.storage()
            .instance()
            .set(&DataKey::FeePercentage, &percentage);

        emit_fee_percentage_updated(
            &env,
            FeePercentageUpdated {
                version: EVENT_VERSION,
                percentage,
                manager: caller,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    /// Set the treasury that receives the fee cut on release. Manager only.
    /// The escrow contract itself is rejected as a destination.
    pub fn set_treasury(env: Env, caller: Address, treasury: Address) -> Result<(), Error> {
        caller.require_auth();
        let roles = read_roles(&env)?;
        if caller != roles.manager {
            return Err(Error::Unauthorized);
        }
        if treasury == env.current_contract_address() {
            return Err(Error::InvalidTreasury);
        }

        env.storage().instance().set(&DataKey::Treasury, &treasury);

        emit_treasury_updated(
            &env,
            TreasuryUpdated {
                version: EVENT_VERSION,
                treasury,
                manager: caller,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    /// Rotate the oracle role. Owner only.
    pub fn set_oracle(env: Env, caller: Address, new_oracle: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut roles = read_roles(&env)?;
        if caller != roles.owner {
            return Err(Error::Unauthorized);
        }

        let previous = roles.oracle.clone();
        roles.oracle = new_oracle.clone();
        env.storage().instance().set(&DataKey::Roles, &roles);

        emit_role_rotated(
            &env,
            RoleRotated {
                version: EVENT_VERSION,
                role: symbol_short!("oracle"),
                previous,
                new: new_oracle,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    /// Rotate the manager role. Owner only.
    pub fn set_manager(env: Env, caller: Address, new_manager: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut roles = read_roles(&env)?;
        if caller != roles.owner {
            return Err(Error::Unauthorized);
        }

        let previous = roles.manager.clone();
        roles.manager = new_manager.clone();
        env.storage().instance().set(&DataKey::Roles, &roles);

        emit_role_rotated(
            &env,
            RoleRotated {
                version: EVENT_VERSION,
                role: symbol_short!("manager"),
                previous,
                new: new_manager,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    /// Transfer the owner capability. Owner only.
    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut roles = read_roles(&env)?;
        if caller != roles.owner {
            return Err(Error::Unauthorized);
        }

        let previous = roles.owner.clone();
        roles.owner = new_owner.clone();
        env.storage().instance().set(&DataKey::Roles, &roles);

        emit_role_rotated(
            &env,
            RoleRotated {
                version: EVENT_VERSION,
                role: symbol_short!("owner"),
                previous,
                new: new_owner,
                timestamp: env.ledger().timestamp(),
            },
        );

        Ok(())
    }

    // ─── Read-only queries ───────────────────────────────────────────

    pub fn get_bounty(env: Env, bounty_id: u64) -> Result<Bounty, Error> {
        read_bounty(&env, bounty_id)
    }

    /// The caller's outstanding contribution to a bounty; 0 if none.
    pub fn get_contribution(env: Env, bounty_id: u64, contributor: Address) -> i128 {
        read_contribution(&env, bounty_id, &contributor)
    }

    pub fn get_contributors(env: Env, bounty_id: u64) -> Vec<Address> {
        read_contributors(&env, bounty_id)
    }

    /// All bounty ids ever created, in creation order.
    pub fn get_bounty_ids(env: Env) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::BountyIndex)
            .unwrap_or(Vec::new(&env))
    }

    /// Monotonic count of distinct bounty ids created.
    pub fn bounty_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::BountyCounter)
            .unwrap_or(0)
    }

    pub fn get_fee_percentage(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::FeePercentage)
            .unwrap_or(0)
    }

    pub fn get_treasury(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Treasury)
    }

    pub fn get_roles(env: Env) -> Result<Roles, Error> {
        read_roles(&env)
    }

    /// The protocol's custody balance in the given asset.
    pub fn get_custody_balance(env: Env, asset: Asset) -> Result<i128, Error> {
        let native_asset: Address = env
            .storage()
            .instance()
            .get(&DataKey::NativeAsset)
            .ok_or(Error::NotInitialized)?;
        let client = token::Client::new(&env, &asset.token_address(&native_asset));
        Ok(client.balance(&env.current_contract_address()))
    }

    /// Off-chain monitoring hook: true when the bounty's `total_amount`
    /// equals the sum of its live contribution entries.
    pub fn verify_bounty(env: Env, bounty_id: u64) -> Result<bool, Error> {
        let bounty = read_bounty(&env, bounty_id)?;
        Ok(invariants::verify_conservation(&env, bounty_id, &bounty))
    }
}

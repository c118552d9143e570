use escrow_core::asset::Asset;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

pub const EVENT_VERSION: u32 = 1;

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProtocolInitialized {
    pub version: u32,
    pub owner: Address,
    pub manager: Address,
    pub oracle: Address,
    pub native_asset: Address,
    pub timestamp: u64,
}

pub fn emit_protocol_initialized(env: &Env, event: ProtocolInitialized) {
    let topics = (symbol_short!("init"),);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BountyAdded {
    pub version: u32,
    pub bounty_id: u64,
    pub contributor: Address,
    pub asset: Asset,
    pub amount: i128,
    pub total_amount: i128,
    pub timestamp: u64,
}

pub fn emit_bounty_added(env: &Env, event: BountyAdded) {
    let topics = (symbol_short!("b_add"), event.bounty_id);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct LockupStarted {
    pub version: u32,
    pub bounty_id: u64,
    pub lockup_end: u64,
    pub timestamp: u64,
}

pub fn emit_lockup_started(env: &Env, event: LockupStarted) {
    let topics = (symbol_short!("lockup"), event.bounty_id);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BountyReleased {
    pub version: u32,
    pub bounty_id: u64,
    pub recipient: Address,
    pub gross_amount: i128,
    pub fee_amount: i128,
    pub net_amount: i128,
    pub timestamp: u64,
}

pub fn emit_bounty_released(env: &Env, event: BountyReleased) {
    let topics = (symbol_short!("b_rel"), event.bounty_id);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ContributionReclaimed {
    pub version: u32,
    pub bounty_id: u64,
    pub contributor: Address,
    pub amount: i128,
    pub total_remaining: i128,
    pub timestamp: u64,
}

pub fn emit_contribution_reclaimed(env: &Env, event: ContributionReclaimed) {
    let topics = (symbol_short!("b_rec"), event.bounty_id);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FeeCollected {
    pub version: u32,
    pub bounty_id: u64,
    pub amount: i128,
    pub percentage: u32,
    pub treasury: Address,
    pub timestamp: u64,
}

pub fn emit_fee_collected(env: &Env, event: FeeCollected) {
    let topics = (symbol_short!("fee"),);
    env.events().publish(topics, event);
}

/// Telemetry for the configuration error where a fee is due but no treasury
/// has been set: the fee transfer is skipped and the fee stays in custody.
#[contracttype]
#[derive(Clone, Debug)]
pub struct FeeSkipped {
    pub version: u32,
    pub bounty_id: u64,
    pub fee_amount: i128,
    pub timestamp: u64,
}

pub fn emit_fee_skipped(env: &Env, event: FeeSkipped) {
    let topics = (symbol_short!("fee_skip"),);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FeePercentageUpdated {
    pub version: u32,
    pub percentage: u32,
    pub manager: Address,
    pub timestamp: u64,
}

pub fn emit_fee_percentage_updated(env: &Env, event: FeePercentageUpdated) {
    let topics = (symbol_short!("fee_cfg"),);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TreasuryUpdated {
    pub version: u32,
    pub treasury: Address,
    pub manager: Address,
    pub timestamp: u64,
}

pub fn emit_treasury_updated(env: &Env, event: TreasuryUpdated) {
    let topics = (symbol_short!("treasury"),);
    env.events().publish(topics, event);
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RoleRotated {
    pub version: u32,
    pub role: Symbol,
    pub previous: Address,
    pub new: Address,
    pub timestamp: u64,
}

pub fn emit_role_rotated(env: &Env, event: RoleRotated) {
    let topics = (symbol_short!("role"), event.role.clone());
    env.events().publish(topics, event);
}

//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the protocol:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key              | Type             | Description                        |
//! |------------------|------------------|------------------------------------|
//! | `Config`         | `ProtocolConfig` | Protocol configuration             |
//! | `Curve`          | `CurveState`     | Bonding-curve supply and pool      |
//! | `ProjectCount`   | `u64`            | Auto-increment project ID counter  |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                          | Type             | Description                     |
//! |------------------------------|------------------|---------------------------------|
//! | `Account(addr)`              | `Account`        | Token and reputation balances   |
//! | `ProjConfig(id)`             | `ProjectConfig`  | Immutable project configuration |
//! | `ProjState(id)`              | `ProjectState`   | Mutable project state           |
//! | `Task(id, idx)`              | `Task`           | One unit of project work        |
//! | `Stake(id, addr)`            | `Stake`          | Per-staker project escrow       |
//! | `Validation(id, idx, addr)`  | `Validation`     | A validator's task position     |
//! | `Validators(id, idx)`        | `Vec<Address>`   | Validators of a task, in order  |
//! | `HashVote(id, addr)`         | `BytesN<32>`     | Staker's task-list submission   |
//! | `HashWeight(id, hash)`       | `u128`           | Accumulated weight of a list    |
//! | `TaskHashes(id)`             | `Vec<BytesN<32>>`| Distinct submitted list hashes  |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, BytesN, Env, IntoVal, TryFromVal, Val, Vec};

use crate::registry::Account;
use crate::types::{
    CurveState, Project, ProjectConfig, ProjectState, ProtocolConfig, Stake, Task, Validation,
};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Protocol configuration (Instance).
    Config,
    /// Bonding-curve counters (Instance).
    Curve,
    /// Global auto-increment counter for project IDs (Instance).
    ProjectCount,
    Account(Address),
    ProjConfig(u64),
    ProjState(u64),
    Task(u64, u32),
    Stake(u64, Address),
    Validation(u64, u32, Address),
    Validators(u64, u32),
    HashVote(u64, Address),
    HashWeight(u64, BytesN<32>),
    TaskHashes(u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &ProtocolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<ProtocolConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

/// The curve starts empty; a missing entry reads as all zeros.
pub fn load_curve(env: &Env) -> CurveState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Curve)
        .unwrap_or_default()
}

pub fn save_curve(env: &Env, curve: &CurveState) {
    env.storage().instance().set(&DataKey::Curve, curve);
}

/// Atomically reads, increments, and stores the project counter.
/// Returns the ID to use for the *current* project (pre-increment value).
pub fn get_and_increment_project_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::ProjectCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read<T: TryFromVal<Env, Val>>(env: &Env, key: &DataKey) -> Option<T> {
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

fn write<T: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &T) {
    env.storage().persistent().set(key, value);
    bump_persistent(env, key);
}

/// Accounts that never held anything read as the empty account.
pub fn load_account(env: &Env, owner: &Address) -> Account {
    read(env, &DataKey::Account(owner.clone())).unwrap_or_default()
}

pub fn save_account(env: &Env, owner: &Address, account: &Account) {
    write(env, &DataKey::Account(owner.clone()), account);
}

/// Save both the immutable config and initial mutable state for a new project.
pub fn save_project(env: &Env, config: &ProjectConfig, state: &ProjectState) {
    write(env, &DataKey::ProjConfig(config.id), config);
    write(env, &DataKey::ProjState(config.id), state);
}

/// Load the full `Project` by combining config and state.
pub fn load_project(env: &Env, id: u64) -> Result<Project, Error> {
    let (config, state) = load_project_pair(env, id)?;
    Ok(Project {
        id: config.id,
        proposer: config.proposer,
        wei_cost: config.wei_cost,
        reputation_cost: config.reputation_cost,
        pass_threshold: config.pass_threshold,
        description: config.description,
        proposer_stake: config.proposer_stake,
        status: state.status,
        next_deadline: state.next_deadline,
        wei_bal: state.wei_bal,
        reputation_staked: state.reputation_staked,
        tokens_staked: state.tokens_staked,
        pass_amount: state.pass_amount,
        task_count: state.task_count,
        top_task_hash: state.top_task_hash,
    })
}

/// Load config and state together; both always exist for a proposed project.
pub fn load_project_pair(env: &Env, id: u64) -> Result<(ProjectConfig, ProjectState), Error> {
    let config = read(env, &DataKey::ProjConfig(id)).ok_or(Error::ProjectNotFound)?;
    let state = read(env, &DataKey::ProjState(id)).ok_or(Error::ProjectNotFound)?;
    Ok((config, state))
}

/// Save only the mutable project state.
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    write(env, &DataKey::ProjState(id), state);
}

pub fn load_task(env: &Env, project_id: u64, index: u32) -> Result<Task, Error> {
    read(env, &DataKey::Task(project_id, index)).ok_or(Error::TaskNotFound)
}

pub fn save_task(env: &Env, project_id: u64, index: u32, task: &Task) {
    write(env, &DataKey::Task(project_id, index), task);
}

pub fn load_stake(env: &Env, project_id: u64, staker: &Address) -> Stake {
    read(env, &DataKey::Stake(project_id, staker.clone())).unwrap_or_default()
}

pub fn save_stake(env: &Env, project_id: u64, staker: &Address, stake: &Stake) {
    write(env, &DataKey::Stake(project_id, staker.clone()), stake);
}

pub fn load_validation(
    env: &Env,
    project_id: u64,
    index: u32,
    validator: &Address,
) -> Option<Validation> {
    read(env, &DataKey::Validation(project_id, index, validator.clone()))
}

/// Record a validator's position, appending them to the task's validator
/// list the first time they appear.
pub fn save_validation(
    env: &Env,
    project_id: u64,
    index: u32,
    validator: &Address,
    validation: &Validation,
) {
    let key = DataKey::Validation(project_id, index, validator.clone());
    if !env.storage().persistent().has(&key) {
        let mut validators = load_validators(env, project_id, index);
        validators.push_back(validator.clone());
        write(env, &DataKey::Validators(project_id, index), &validators);
    }
    write(env, &key, validation);
}

pub fn remove_validation(env: &Env, project_id: u64, index: u32, validator: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Validation(project_id, index, validator.clone()));
}

pub fn load_validators(env: &Env, project_id: u64, index: u32) -> Vec<Address> {
    read(env, &DataKey::Validators(project_id, index)).unwrap_or_else(|| Vec::new(env))
}

pub fn load_hash_vote(env: &Env, project_id: u64, staker: &Address) -> Option<BytesN<32>> {
    read(env, &DataKey::HashVote(project_id, staker.clone()))
}

pub fn save_hash_vote(env: &Env, project_id: u64, staker: &Address, hash: &BytesN<32>) {
    write(env, &DataKey::HashVote(project_id, staker.clone()), hash);
}

pub fn load_hash_weight(env: &Env, project_id: u64, hash: &BytesN<32>) -> u128 {
    read(env, &DataKey::HashWeight(project_id, hash.clone())).unwrap_or(0)
}

/// Record a weight change, remembering the hash as a curation candidate.
pub fn save_hash_weight(env: &Env, project_id: u64, hash: &BytesN<32>, weight: u128) {
    let key = DataKey::HashWeight(project_id, hash.clone());
    if !env.storage().persistent().has(&key) {
        let mut hashes = load_task_hashes(env, project_id);
        hashes.push_back(hash.clone());
        write(env, &DataKey::TaskHashes(project_id), &hashes);
    }
    write(env, &key, &weight);
}

pub fn load_task_hashes(env: &Env, project_id: u64) -> Vec<BytesN<32>> {
    read(env, &DataKey::TaskHashes(project_id)).unwrap_or_else(|| Vec::new(env))
}

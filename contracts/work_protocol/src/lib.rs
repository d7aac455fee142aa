//! # Distributed Work Protocol Contract
//!
//! Root crate of the work protocol. It exposes the single Soroban contract
//! `WorkProtocol`, which couples a bonding-curve utility token with a
//! staked, curated and validated project lifecycle:
//!
//! | Phase          | Entry Point(s)                                              |
//! |----------------|-------------------------------------------------------------|
//! | Bootstrap      | [`WorkProtocol::init`], [`WorkProtocol::register`]          |
//! | Token ledger   | `mint`, `burn_and_refund`, `escrow_in`, `escrow_out`, `privileged_burn` |
//! | Proposal       | `propose_project`, `stake_tokens`, `unstake_tokens`, `stake_reputation`, `unstake_reputation`, `check_staked` |
//! | Curation       | `submit_task_hash`, `hash_task_list`, `check_active`        |
//! | Work           | `claim_task`, `submit_task_complete`, `check_validate`      |
//! | Validation     | `validate`, `check_voting`, `check_end`                     |
//! | Settlement     | `claim_task_reward`, `claim_validator_reward`, `refund_staker`, `refund_tokens`, `refund_reputation`, `refund_proposer` |
//! | Queries        | `get_config`, `get_curve`, `get_account`, `get_project`, `get_task`, `get_stake`, `get_validation`, price helpers |
//!
//! ## Architecture
//!
//! Curve arithmetic lives in [`curve`], balances in [`registry`], the state
//! machine in [`project`] and per-task bookkeeping in [`task`]. Storage access
//! is fully delegated to [`storage`]. This file holds the public entry points,
//! authorization and the capital-token transfers.
//!
//! Every entry point returns `Result`; an `Err` rolls back all of the call's
//! ledger writes, so an operation either applies completely or not at all.
//! Capital leaves the contract only as the last step of a call.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, log, token, Address, BytesN, Env, Vec,
};

mod curve;
mod events;
mod project;
mod registry;
mod storage;
mod task;
mod types;
mod voting;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_refunds;

pub use registry::Account;
pub use types::{
    CurveState, Project, ProjectStatus, ProtocolConfig, Stake, Task, TaskSpec, Validation,
};
pub use voting::VotingClient;

use registry::RegistryOrigin;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized         = 1,
    AlreadyInitialized     = 2,
    NotAuthorized          = 3,
    ProjectNotFound        = 4,
    TaskNotFound           = 5,
    InvalidState           = 6,
    DeadlinePassed         = 7,
    InvalidAmount          = 8,
    InsufficientBalance    = 9,
    InsufficientCapital    = 10,
    InsufficientReputation = 11,
    Underflow              = 12,
    Overflow               = 13,
    AlreadyRegistered      = 14,
    NotRegistered          = 15,
    FullyStaked            = 16,
    NotStaker              = 17,
    TaskListMismatch       = 18,
    TaskAlreadyClaimed     = 19,
    TaskNotComplete        = 20,
    TaskNotClaimable       = 21,
    RewardAlreadyClaimed   = 22,
    ConflictingValidation  = 23,
    ValidationNotFound     = 24,
    InvalidDeadline        = 25,
    DivisionByZero         = 26,
    NothingToRefund        = 27,
}

/// Coarse grouping of [`Error`] for callers that only care about the class.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The caller may not perform the operation.
    Authorization,
    /// Wrong state, missing record, or an unmet business rule.
    StatePrecondition,
    /// A balance or counter would leave its range.
    Arithmetic,
}

impl Error {
    pub fn kind(self) -> ErrorKind {
        match self {
            Error::NotAuthorized | Error::NotRegistered | Error::NotStaker => {
                ErrorKind::Authorization
            }
            Error::Underflow | Error::Overflow | Error::DivisionByZero => ErrorKind::Arithmetic,
            _ => ErrorKind::StatePrecondition,
        }
    }
}

fn to_amount(value: u128) -> Result<i128, Error> {
    i128::try_from(value).map_err(|_| Error::Overflow)
}

/// Send capital from the contract to `to`.
fn pay_out(env: &Env, to: &Address, amount: u128) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    let config = storage::load_config(env)?;
    token::Client::new(env, &config.capital_token).transfer(
        &env.current_contract_address(),
        to,
        &to_amount(amount)?,
    );
    Ok(())
}

#[contract]
pub struct WorkProtocol;

#[contractimpl]
impl WorkProtocol {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Store the protocol configuration. Callable once; `config.admin` signs.
    pub fn init(env: Env, config: ProtocolConfig) -> Result<(), Error> {
        config.admin.require_auth();
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if config.base_cost == 0 {
            return Err(Error::InvalidAmount);
        }
        storage::save_config(&env, &config);
        Ok(())
    }

    /// Grant `owner` the starting reputation. Returns the new balance.
    pub fn register(env: Env, owner: Address) -> Result<u128, Error> {
        owner.require_auth();
        registry::register(&env, &owner)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_config(env: Env) -> Result<ProtocolConfig, Error> {
        storage::load_config(&env)
    }

    pub fn get_curve(env: Env) -> CurveState {
        storage::load_curve(&env)
    }

    /// Capital one free token currently redeems for.
    pub fn current_price(env: Env) -> Result<u128, Error> {
        let config = storage::load_config(&env)?;
        Ok(curve::current_price(&storage::load_curve(&env), config.base_cost))
    }

    /// Marginal price of minting `tokens` now.
    pub fn target_price(env: Env, tokens: u128) -> Result<u128, Error> {
        let config = storage::load_config(&env)?;
        curve::target_price(&storage::load_curve(&env), config.base_cost, tokens)
    }

    /// Capital `mint(tokens)` would charge right now.
    pub fn wei_required(env: Env, tokens: u128) -> Result<u128, Error> {
        let config = storage::load_config(&env)?;
        let curve = storage::load_curve(&env);
        let target = curve::target_price(&curve, config.base_cost, tokens)?;
        curve::wei_required(&curve, config.base_cost, target, tokens)
    }

    pub fn get_account(env: Env, owner: Address) -> Account {
        storage::load_account(&env, &owner)
    }

    pub fn get_project(env: Env, id: u64) -> Result<Project, Error> {
        storage::load_project(&env, id)
    }

    pub fn get_task(env: Env, project_id: u64, index: u32) -> Result<Task, Error> {
        storage::load_task(&env, project_id, index)
    }

    pub fn get_stake(env: Env, project_id: u64, staker: Address) -> Stake {
        storage::load_stake(&env, project_id, &staker)
    }

    pub fn get_validation(
        env: Env,
        project_id: u64,
        index: u32,
        validator: Address,
    ) -> Option<Validation> {
        storage::load_validation(&env, project_id, index, &validator)
    }

    // ─────────────────────────────────────────────────────────
    // Token ledger
    // ─────────────────────────────────────────────────────────

    /// Mint `tokens` to `buyer`, who sends `supplied` capital.
    ///
    /// Fails with `InsufficientCapital` when `supplied` is below the curve's
    /// cost; any surplus is sent back. Returns the cost charged.
    pub fn mint(env: Env, buyer: Address, tokens: u128, supplied: u128) -> Result<u128, Error> {
        buyer.require_auth();
        let minted = curve::mint(&env, &buyer, tokens, supplied)?;
        events::emit_minted(&env, buyer.clone(), tokens, minted.cost);
        log!(&env, "minted", tokens, minted.cost);

        let config = storage::load_config(&env)?;
        token::Client::new(&env, &config.capital_token).transfer(
            &buyer,
            &env.current_contract_address(),
            &to_amount(supplied)?,
        );
        pay_out(&env, &buyer, minted.surplus)?;
        Ok(minted.cost)
    }

    /// Burn `tokens` of `seller`'s free balance and pay out their value.
    pub fn burn_and_refund(env: Env, seller: Address, tokens: u128) -> Result<u128, Error> {
        seller.require_auth();
        let reward = curve::burn(&env, &seller, tokens)?;
        events::emit_withdrawn(&env, seller.clone(), tokens, reward);
        pay_out(&env, &seller, reward)?;
        Ok(reward)
    }

    /// Escrow `amount` of `owner`'s tokens. Token registry only.
    pub fn escrow_in(env: Env, caller: Address, owner: Address, amount: u128) -> Result<(), Error> {
        registry::require_token_registry(&env, &caller)?;
        curve::escrow_in(&env, &owner, amount)
    }

    /// Release `amount` of `owner`'s escrowed tokens. Token registry only.
    pub fn escrow_out(
        env: Env,
        caller: Address,
        owner: Address,
        amount: u128,
    ) -> Result<(), Error> {
        registry::require_token_registry(&env, &caller)?;
        curve::escrow_out(&env, &owner, amount)
    }

    /// Destroy `amount` of escrowed supply. Token registry only.
    pub fn privileged_burn(env: Env, caller: Address, amount: u128) -> Result<(), Error> {
        registry::require_token_registry(&env, &caller)?;
        curve::privileged_burn(&env, amount)
    }

    // ─────────────────────────────────────────────────────────
    // Proposal and staking
    // ─────────────────────────────────────────────────────────

    pub fn propose_project(
        env: Env,
        proposer: Address,
        wei_cost: u128,
        reputation_cost: u128,
        description: BytesN<32>,
        deadline: u64,
    ) -> Result<Project, Error> {
        proposer.require_auth();
        project::propose(&env, &proposer, wei_cost, reputation_cost, description, deadline)
    }

    /// Stake up to `tokens`; returns how many were actually taken.
    pub fn stake_tokens(
        env: Env,
        project_id: u64,
        staker: Address,
        tokens: u128,
    ) -> Result<u128, Error> {
        staker.require_auth();
        project::stake_tokens(&env, project_id, &staker, tokens)
    }

    /// Unstake `tokens`; returns the capital that went back to the pool.
    pub fn unstake_tokens(
        env: Env,
        project_id: u64,
        staker: Address,
        tokens: u128,
    ) -> Result<u128, Error> {
        staker.require_auth();
        project::unstake_tokens(&env, project_id, &staker, tokens)
    }

    pub fn stake_reputation(
        env: Env,
        project_id: u64,
        staker: Address,
        amount: u128,
    ) -> Result<u128, Error> {
        staker.require_auth();
        project::stake_reputation(&env, project_id, &staker, amount)
    }

    pub fn unstake_reputation(
        env: Env,
        project_id: u64,
        staker: Address,
        amount: u128,
    ) -> Result<(), Error> {
        staker.require_auth();
        project::unstake_reputation(&env, project_id, &staker, amount)
    }

    /// Proposed → Staked or Expired. Anyone may call; `false` means no change.
    pub fn check_staked(env: Env, project_id: u64) -> Result<bool, Error> {
        project::check_staked(&env, project_id)
    }

    // ─────────────────────────────────────────────────────────
    // Curation
    // ─────────────────────────────────────────────────────────

    pub fn calculate_weight_of_address(
        env: Env,
        project_id: u64,
        staker: Address,
    ) -> Result<u128, Error> {
        project::calculate_weight_of_address(&env, project_id, &staker)
    }

    pub fn hash_task_list(env: Env, tasks: Vec<TaskSpec>) -> BytesN<32> {
        project::hash_task_list(&env, &tasks)
    }

    pub fn submit_task_hash(
        env: Env,
        project_id: u64,
        staker: Address,
        hash: BytesN<32>,
    ) -> Result<(), Error> {
        staker.require_auth();
        project::submit_task_hash(&env, project_id, &staker, hash)
    }

    /// Staked → Active (with `tasks`, which must hash to the top submission)
    /// or Expired.
    pub fn check_active(env: Env, project_id: u64, tasks: Vec<TaskSpec>) -> Result<bool, Error> {
        project::check_active(&env, project_id, tasks)
    }

    // ─────────────────────────────────────────────────────────
    // Work
    // ─────────────────────────────────────────────────────────

    pub fn claim_task(env: Env, project_id: u64, index: u32, claimer: Address) -> Result<(), Error> {
        claimer.require_auth();
        project::claim_task(&env, project_id, index, &claimer)
    }

    pub fn submit_task_complete(
        env: Env,
        project_id: u64,
        index: u32,
        claimer: Address,
    ) -> Result<(), Error> {
        claimer.require_auth();
        project::submit_task_complete(&env, project_id, index, &claimer)
    }

    pub fn check_validate(env: Env, project_id: u64) -> Result<bool, Error> {
        project::check_validate(&env, project_id)
    }

    // ─────────────────────────────────────────────────────────
    // Validation and disputes
    // ─────────────────────────────────────────────────────────

    pub fn validate(
        env: Env,
        project_id: u64,
        validator: Address,
        index: u32,
        tokens: u128,
        approve: bool,
    ) -> Result<(), Error> {
        validator.require_auth();
        project::validate(&env, project_id, &validator, index, tokens, approve)
    }

    /// Validation → Voting, opening a poll on `oracle` per contested task.
    pub fn check_voting(env: Env, project_id: u64, oracle: Address) -> Result<bool, Error> {
        project::check_voting(&env, project_id, &oracle)
    }

    /// Voting → Complete or Failed, reading poll outcomes from `oracle`.
    pub fn check_end(env: Env, project_id: u64, oracle: Address) -> Result<bool, Error> {
        project::check_end(&env, project_id, &oracle)
    }

    pub fn calculate_pass_amount(env: Env, project_id: u64) -> Result<u32, Error> {
        project::calculate_pass_amount(&env, project_id)
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Pay a claimable task's capital and reputation reward to its claimer.
    /// Returns the capital paid.
    pub fn claim_task_reward(
        env: Env,
        project_id: u64,
        index: u32,
        claimer: Address,
    ) -> Result<u128, Error> {
        claimer.require_auth();
        let reward = project::claim_task_reward(&env, project_id, index, &claimer)?;
        pay_out(&env, &claimer, reward.wei)?;
        Ok(reward.wei)
    }

    /// Release a winning (or unresolved, once terminal) validator's stake.
    pub fn claim_validator_reward(
        env: Env,
        project_id: u64,
        index: u32,
        validator: Address,
    ) -> Result<u128, Error> {
        validator.require_auth();
        project::claim_validator_reward(&env, project_id, index, &validator)
    }

    /// Registry-driven refund. The formula depends on which registry `caller`
    /// is; any other caller is answered with 0 and nothing changes.
    pub fn refund_staker(
        env: Env,
        caller: Address,
        project_id: u64,
        staker: Address,
    ) -> Result<u128, Error> {
        caller.require_auth();
        let config = storage::load_config(&env)?;
        let origin = RegistryOrigin::of(&config, &caller);
        project::refund_staker(&env, project_id, &staker, origin)
    }

    pub fn refund_tokens(env: Env, project_id: u64, staker: Address) -> Result<u128, Error> {
        staker.require_auth();
        project::refund_staker(&env, project_id, &staker, RegistryOrigin::Token)
    }

    pub fn refund_reputation(env: Env, project_id: u64, staker: Address) -> Result<u128, Error> {
        staker.require_auth();
        project::refund_staker(&env, project_id, &staker, RegistryOrigin::Reputation)
    }

    pub fn refund_proposer(env: Env, project_id: u64, proposer: Address) -> Result<u128, Error> {
        proposer.require_auth();
        project::refund_proposer(&env, project_id, &proposer)
    }
}

//! # Project lifecycle
//!
//! A project moves through eight ordered states:
//!
//! | From | To | Driven by | Guard |
//! |------|----|-----------|-------|
//! | Proposed | Staked | [`check_staked`] | capital and reputation targets met |
//! | Proposed | Expired | [`check_staked`] | deadline passed, not staked |
//! | Staked | Active | [`check_active`] | deadline passed, curated list matches top hash |
//! | Staked | Expired | [`check_active`] | deadline passed, no list submitted |
//! | Staked | Expired | [`check_active`] | a further staked period passed, top list never supplied |
//! | Active | Validation | [`check_validate`] | deadline passed |
//! | Validation | Voting | [`check_voting`] | deadline passed |
//! | Voting | Complete / Failed | [`check_end`] | deadline passed |
//!
//! Nothing advances on its own: some external caller has to invoke the check
//! once it believes the deadline is behind it. Every check re-validates its
//! guard and answers `Ok(false)` without touching storage when the project is
//! in another state or the guard does not hold yet, so redundant or early
//! calls are harmless.
//!
//! Projects and tasks are addressed by id and index only; every helper loads
//! what it needs and writes it back before returning.

use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{log, Address, BytesN, Env, Vec};

use crate::curve::{self, add, mul, percent, sub};
use crate::events;
use crate::registry::{self, RegistryOrigin};
use crate::storage;
use crate::task;
use crate::types::{
    Project, ProjectConfig, ProjectState, ProjectStatus, Task, TaskSpec, DISPUTE_QUORUM,
    MAX_TASKS, PROPOSE_PROPORTION,
};
use crate::voting::VotingClient;
use crate::Error;

fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

fn deadline_from_now(env: &Env, period: u64) -> Result<u64, Error> {
    now(env).checked_add(period).ok_or(Error::Overflow)
}

fn require_status(state: &ProjectState, status: ProjectStatus) -> Result<(), Error> {
    if state.status != status {
        return Err(Error::InvalidState);
    }
    Ok(())
}

fn require_before_deadline(env: &Env, state: &ProjectState) -> Result<(), Error> {
    if now(env) > state.next_deadline {
        return Err(Error::DeadlinePassed);
    }
    Ok(())
}

/// The guard every deadline-driven transition shares.
fn deadline_passed(env: &Env, state: &ProjectState) -> bool {
    now(env) > state.next_deadline
}

fn advance(
    env: &Env,
    project_id: u64,
    state: &mut ProjectState,
    to: ProjectStatus,
    next_deadline: u64,
) {
    let from = state.status;
    state.status = to;
    state.next_deadline = next_deadline;
    storage::save_project_state(env, project_id, state);
    log!(env, "project status", project_id, from as u32, to as u32);
    events::emit_status_changed(env, project_id, from, to, next_deadline);
}

/// Return the project's remaining capital to the pool and make every
/// staker whole on refund.
fn expire(env: &Env, project_id: u64, state: &mut ProjectState) -> Result<(), Error> {
    curve::return_to_pool(env, state.wei_bal)?;
    state.wei_bal = 0;
    state.pass_amount = 100;
    let deadline = state.next_deadline;
    advance(env, project_id, state, ProjectStatus::Expired, deadline);
    Ok(())
}

fn is_fully_staked(config: &ProjectConfig, state: &ProjectState) -> bool {
    state.wei_bal >= config.wei_cost && state.reputation_staked >= config.reputation_cost
}

// ─────────────────────────────────────────────────────────
// Proposal and staking
// ─────────────────────────────────────────────────────────

/// Propose a project; the proposer escrows `wei_cost / 20` worth of tokens.
pub fn propose(
    env: &Env,
    proposer: &Address,
    wei_cost: u128,
    reputation_cost: u128,
    description: BytesN<32>,
    deadline: u64,
) -> Result<Project, Error> {
    if wei_cost == 0 || reputation_cost == 0 {
        return Err(Error::InvalidAmount);
    }
    if deadline <= now(env) {
        return Err(Error::InvalidDeadline);
    }

    let protocol = storage::load_config(env)?;
    let price = curve::current_price(&storage::load_curve(env), protocol.base_cost);
    let proposer_stake = (wei_cost / PROPOSE_PROPORTION)
        .checked_div(price)
        .ok_or(Error::DivisionByZero)?;
    if proposer_stake > 0 {
        curve::escrow_in(env, proposer, proposer_stake)?;
    }

    let id = storage::get_and_increment_project_id(env);
    let config = ProjectConfig {
        id,
        proposer: proposer.clone(),
        wei_cost,
        reputation_cost,
        pass_threshold: protocol.pass_threshold,
        description,
        proposer_stake,
        staked_period: protocol.staked_period,
        active_period: protocol.active_period,
        validate_period: protocol.validate_period,
        vote_commit_period: protocol.vote_commit_period,
        vote_reveal_period: protocol.vote_reveal_period,
    };
    let state = ProjectState {
        status: ProjectStatus::Proposed,
        next_deadline: deadline,
        wei_bal: 0,
        reputation_staked: 0,
        tokens_staked: 0,
        pass_amount: 0,
        task_count: 0,
        top_task_hash: None,
        proposer_refunded: false,
    };
    storage::save_project(env, &config, &state);
    events::emit_project_proposed(env, id, proposer.clone(), wei_cost, reputation_cost);
    storage::load_project(env, id)
}

/// Return the proposer's escrow once the project got past proposal.
pub fn refund_proposer(env: &Env, project_id: u64, proposer: &Address) -> Result<u128, Error> {
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    if config.proposer != *proposer {
        return Err(Error::NotAuthorized);
    }
    if state.status == ProjectStatus::Proposed {
        return Err(Error::InvalidState);
    }
    if state.proposer_refunded {
        return Err(Error::NothingToRefund);
    }
    state.proposer_refunded = true;
    curve::escrow_out(env, proposer, config.proposer_stake)?;
    storage::save_project_state(env, project_id, &state);
    Ok(config.proposer_stake)
}

/// Stake up to `tokens`, moving their capital value from the pool into the
/// project. Stops at what the project still needs; returns tokens taken.
pub fn stake_tokens(
    env: &Env,
    project_id: u64,
    staker: &Address,
    tokens: u128,
) -> Result<u128, Error> {
    if tokens == 0 {
        return Err(Error::InvalidAmount);
    }
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    require_status(&state, ProjectStatus::Proposed)?;
    require_before_deadline(env, &state)?;

    let remaining = sub(config.wei_cost, state.wei_bal.min(config.wei_cost))?;
    if remaining == 0 {
        return Err(Error::FullyStaked);
    }
    let protocol = storage::load_config(env)?;
    let price = curve::current_price(&storage::load_curve(env), protocol.base_cost);
    if price == 0 {
        return Err(Error::DivisionByZero);
    }
    let taken = tokens.min(remaining.div_ceil(price));
    let wei = mul(taken, price)?.min(remaining);

    curve::escrow_in(env, staker, taken)?;
    curve::draw_from_pool(env, wei)?;

    let mut stake = storage::load_stake(env, project_id, staker);
    stake.tokens = add(stake.tokens, taken)?;
    state.wei_bal = add(state.wei_bal, wei)?;
    state.tokens_staked = add(state.tokens_staked, taken)?;

    storage::save_stake(env, project_id, staker, &stake);
    storage::save_project_state(env, project_id, &state);
    events::emit_staked(env, project_id, staker.clone(), taken, 0);
    Ok(taken)
}

/// Withdraw staked tokens while the project is still proposed; their
/// proportional share of the project's capital goes back to the pool.
pub fn unstake_tokens(
    env: &Env,
    project_id: u64,
    staker: &Address,
    tokens: u128,
) -> Result<u128, Error> {
    if tokens == 0 {
        return Err(Error::InvalidAmount);
    }
    let (_, mut state) = storage::load_project_pair(env, project_id)?;
    require_status(&state, ProjectStatus::Proposed)?;
    require_before_deadline(env, &state)?;

    let mut stake = storage::load_stake(env, project_id, staker);
    if stake.tokens < tokens {
        return Err(Error::InsufficientBalance);
    }
    let wei = mul(tokens, state.wei_bal)? / state.tokens_staked;

    stake.tokens -= tokens;
    state.tokens_staked = sub(state.tokens_staked, tokens)?;
    state.wei_bal = sub(state.wei_bal, wei)?;

    curve::return_to_pool(env, wei)?;
    curve::escrow_out(env, staker, tokens)?;
    storage::save_stake(env, project_id, staker, &stake);
    storage::save_project_state(env, project_id, &state);
    events::emit_unstaked(env, project_id, staker.clone(), tokens, 0);
    Ok(wei)
}

/// Stake up to `amount` reputation, capped at the remaining reputation cost.
pub fn stake_reputation(
    env: &Env,
    project_id: u64,
    staker: &Address,
    amount: u128,
) -> Result<u128, Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    require_status(&state, ProjectStatus::Proposed)?;
    require_before_deadline(env, &state)?;

    let remaining = sub(config.reputation_cost, state.reputation_staked.min(config.reputation_cost))?;
    if remaining == 0 {
        return Err(Error::FullyStaked);
    }
    let taken = amount.min(remaining);

    let mut account = storage::load_account(env, staker);
    registry::lock_reputation(&mut account, taken)?;
    let mut stake = storage::load_stake(env, project_id, staker);
    stake.reputation = add(stake.reputation, taken)?;
    state.reputation_staked = add(state.reputation_staked, taken)?;

    storage::save_account(env, staker, &account);
    storage::save_stake(env, project_id, staker, &stake);
    storage::save_project_state(env, project_id, &state);
    events::emit_staked(env, project_id, staker.clone(), 0, taken);
    Ok(taken)
}

pub fn unstake_reputation(
    env: &Env,
    project_id: u64,
    staker: &Address,
    amount: u128,
) -> Result<(), Error> {
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    let (_, mut state) = storage::load_project_pair(env, project_id)?;
    require_status(&state, ProjectStatus::Proposed)?;
    require_before_deadline(env, &state)?;

    let mut stake = storage::load_stake(env, project_id, staker);
    if stake.reputation < amount {
        return Err(Error::InsufficientReputation);
    }
    stake.reputation -= amount;
    state.reputation_staked = sub(state.reputation_staked, amount)?;

    let mut account = storage::load_account(env, staker);
    registry::settle_reputation(&mut account, amount, amount, 0)?;

    storage::save_account(env, staker, &account);
    storage::save_stake(env, project_id, staker, &stake);
    storage::save_project_state(env, project_id, &state);
    events::emit_unstaked(env, project_id, staker.clone(), 0, amount);
    Ok(())
}

/// Proposed → Staked once both cost targets are met, or Proposed → Expired
/// when the deadline passes first. The proposer's stake is burned on expiry.
pub fn check_staked(env: &Env, project_id: u64) -> Result<bool, Error> {
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    if state.status != ProjectStatus::Proposed {
        return Ok(false);
    }

    if is_fully_staked(&config, &state) {
        let deadline = deadline_from_now(env, config.staked_period)?;
        advance(env, project_id, &mut state, ProjectStatus::Staked, deadline);
        return Ok(true);
    }
    if !deadline_passed(env, &state) {
        return Ok(false);
    }

    if config.proposer_stake > 0 {
        let mut account = storage::load_account(env, &config.proposer);
        registry::forfeit_tokens(&mut account, config.proposer_stake)?;
        storage::save_account(env, &config.proposer, &account);
        curve::privileged_burn(env, config.proposer_stake)?;
    }
    state.proposer_refunded = true;
    expire(env, project_id, &mut state)?;
    Ok(true)
}

// ─────────────────────────────────────────────────────────
// Curation
// ─────────────────────────────────────────────────────────

/// Relative influence of `staker`: the mean of its reputation share and its
/// token share of the project, each in hundredths rounded half-up.
pub fn calculate_weight_of_address(
    env: &Env,
    project_id: u64,
    staker: &Address,
) -> Result<u128, Error> {
    let (_, state) = storage::load_project_pair(env, project_id)?;
    let stake = storage::load_stake(env, project_id, staker);

    let reputation_weight = if state.reputation_staked == 0 {
        0
    } else {
        percent(stake.reputation, state.reputation_staked, 2)?
    };
    let token_weight = if state.tokens_staked == 0 {
        0
    } else {
        percent(stake.tokens, state.tokens_staked, 2)?
    };
    Ok(add(reputation_weight, token_weight)? / 2)
}

/// SHA-256 over the XDR encoding of a task list.
pub fn hash_task_list(env: &Env, tasks: &Vec<TaskSpec>) -> BytesN<32> {
    env.crypto().sha256(&tasks.clone().to_xdr(env)).to_bytes()
}

/// Vote for a task list by hash with the staker's full weight. A second
/// submission moves that weight to the new hash.
pub fn submit_task_hash(
    env: &Env,
    project_id: u64,
    staker: &Address,
    hash: BytesN<32>,
) -> Result<(), Error> {
    let (_, mut state) = storage::load_project_pair(env, project_id)?;
    require_status(&state, ProjectStatus::Staked)?;
    require_before_deadline(env, &state)?;

    let weight = calculate_weight_of_address(env, project_id, staker)?;
    if weight == 0 {
        return Err(Error::NotStaker);
    }

    if let Some(previous) = storage::load_hash_vote(env, project_id, staker) {
        let previous_weight = storage::load_hash_weight(env, project_id, &previous);
        storage::save_hash_weight(env, project_id, &previous, sub(previous_weight, weight)?);
    }
    let current = storage::load_hash_weight(env, project_id, &hash);
    storage::save_hash_weight(env, project_id, &hash, add(current, weight)?);
    storage::save_hash_vote(env, project_id, staker, &hash);

    // Earliest submitted hash wins ties.
    let mut top: Option<(BytesN<32>, u128)> = None;
    for candidate in storage::load_task_hashes(env, project_id).iter() {
        let candidate_weight = storage::load_hash_weight(env, project_id, &candidate);
        let better = match &top {
            Some((_, best)) => candidate_weight > *best,
            None => candidate_weight > 0,
        };
        if better {
            top = Some((candidate, candidate_weight));
        }
    }
    state.top_task_hash = top.map(|(hash, _)| hash);
    storage::save_project_state(env, project_id, &state);
    Ok(())
}

fn valid_task_list(tasks: &Vec<TaskSpec>) -> bool {
    if tasks.is_empty() || tasks.len() > MAX_TASKS {
        return false;
    }
    let mut total: u32 = 0;
    for spec in tasks.iter() {
        if spec.weighting == 0 {
            return false;
        }
        total = total.saturating_add(spec.weighting);
    }
    total == 100
}

/// Staked → Active with the curated task list, or Staked → Expired when no
/// list was ever submitted. A list that wins the vote but is malformed also
/// expires the project, as does a top hash whose list nobody has supplied
/// within one more staked period.
pub fn check_active(env: &Env, project_id: u64, tasks: Vec<TaskSpec>) -> Result<bool, Error> {
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    if state.status != ProjectStatus::Staked || !deadline_passed(env, &state) {
        return Ok(false);
    }

    let Some(top) = state.top_task_hash.clone() else {
        expire(env, project_id, &mut state)?;
        return Ok(true);
    };
    if hash_task_list(env, &tasks) != top {
        // Nobody may be able to produce the winning list. After a further
        // staked period the project expires so stake is not locked forever.
        let grace_end = state
            .next_deadline
            .checked_add(config.staked_period)
            .ok_or(Error::Overflow)?;
        if now(env) > grace_end {
            expire(env, project_id, &mut state)?;
            return Ok(true);
        }
        return Err(Error::TaskListMismatch);
    }
    if !valid_task_list(&tasks) {
        expire(env, project_id, &mut state)?;
        return Ok(true);
    }

    for (index, spec) in tasks.iter().enumerate() {
        let task = Task::from_spec(&spec, config.wei_cost, config.reputation_cost)?;
        storage::save_task(env, project_id, index as u32, &task);
    }
    state.task_count = tasks.len();
    let deadline = deadline_from_now(env, config.active_period)?;
    advance(env, project_id, &mut state, ProjectStatus::Active, deadline);
    Ok(true)
}

// ─────────────────────────────────────────────────────────
// Work
// ─────────────────────────────────────────────────────────

/// Take on a task, escrowing its reputation reward as the claimer's stake.
pub fn claim_task(env: &Env, project_id: u64, index: u32, claimer: &Address) -> Result<(), Error> {
    let (_, state) = storage::load_project_pair(env, project_id)?;
    require_status(&state, ProjectStatus::Active)?;
    require_before_deadline(env, &state)?;

    let mut task = storage::load_task(env, project_id, index)?;
    if task.claimer.is_some() {
        return Err(Error::TaskAlreadyClaimed);
    }
    let mut account = storage::load_account(env, claimer);
    registry::lock_reputation(&mut account, task.reputation_reward)?;
    task.claimer = Some(claimer.clone());
    task.claimer_stake = task.reputation_reward;

    storage::save_account(env, claimer, &account);
    storage::save_task(env, project_id, index, &task);
    Ok(())
}

pub fn submit_task_complete(
    env: &Env,
    project_id: u64,
    index: u32,
    claimer: &Address,
) -> Result<(), Error> {
    let (_, state) = storage::load_project_pair(env, project_id)?;
    require_status(&state, ProjectStatus::Active)?;
    require_before_deadline(env, &state)?;

    let mut task = storage::load_task(env, project_id, index)?;
    if task.claimer.as_ref() != Some(claimer) {
        return Err(Error::NotAuthorized);
    }
    task.complete = true;
    storage::save_task(env, project_id, index, &task);
    Ok(())
}

/// Active → Validation. Unfinished tasks give their capital back to the pool.
pub fn check_validate(env: &Env, project_id: u64) -> Result<bool, Error> {
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    if state.status != ProjectStatus::Active || !deadline_passed(env, &state) {
        return Ok(false);
    }

    for index in 0..state.task_count {
        let mut task = storage::load_task(env, project_id, index)?;
        if task.complete {
            continue;
        }
        let wei = task::return_reward_to_pool(env, &mut task)?;
        state.wei_bal = sub(state.wei_bal, wei)?;
        storage::save_task(env, project_id, index, &task);
    }

    let deadline = deadline_from_now(env, config.validate_period)?;
    advance(env, project_id, &mut state, ProjectStatus::Validation, deadline);
    Ok(true)
}

// ─────────────────────────────────────────────────────────
// Validation and disputes
// ─────────────────────────────────────────────────────────

/// Stake `tokens` for (`approve`) or against a completed task.
pub fn validate(
    env: &Env,
    project_id: u64,
    validator: &Address,
    index: u32,
    tokens: u128,
    approve: bool,
) -> Result<(), Error> {
    if tokens == 0 {
        return Err(Error::InvalidAmount);
    }
    let (_, state) = storage::load_project_pair(env, project_id)?;
    require_status(&state, ProjectStatus::Validation)?;
    require_before_deadline(env, &state)?;

    let mut task = storage::load_task(env, project_id, index)?;
    if !task.complete {
        return Err(Error::TaskNotComplete);
    }
    task::add_validation(env, project_id, index, &mut task, validator, tokens, approve)?;
    storage::save_task(env, project_id, index, &task);
    events::emit_task_validated(env, project_id, index, validator.clone(), tokens, approve);
    Ok(())
}

/// Validation → Voting. Contested tasks go to a poll; uncontested ones are
/// settled on the spot in favour of whichever side staked.
pub fn check_voting(env: &Env, project_id: u64, oracle: &Address) -> Result<bool, Error> {
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    if state.status != ProjectStatus::Validation || !deadline_passed(env, &state) {
        return Ok(false);
    }

    let voting = VotingClient::new(env, oracle);
    for index in 0..state.task_count {
        let mut task = storage::load_task(env, project_id, index)?;
        if !task.complete {
            continue;
        }
        if task.opposing_validator {
            task.poll_id = voting.start_poll(
                &DISPUTE_QUORUM,
                &config.vote_commit_period,
                &config.vote_reveal_period,
            );
            events::emit_poll_started(env, project_id, index, task.poll_id);
        } else if !task.mark_claimable_by_rep() {
            task.claimable_by_validators = task.deny_stake > 0;
            let wei = task::return_reward_to_pool(env, &mut task)?;
            state.wei_bal = sub(state.wei_bal, wei)?;
        }
        storage::save_task(env, project_id, index, &task);
    }

    let vote_period = config
        .vote_commit_period
        .checked_add(config.vote_reveal_period)
        .ok_or(Error::Overflow)?;
    let deadline = deadline_from_now(env, vote_period)?;
    advance(env, project_id, &mut state, ProjectStatus::Voting, deadline);
    Ok(true)
}

/// Sum of the weightings of tasks whose claimer may collect the reward.
pub fn calculate_pass_amount(env: &Env, project_id: u64) -> Result<u32, Error> {
    let (_, state) = storage::load_project_pair(env, project_id)?;
    let mut pass_amount: u32 = 0;
    for index in 0..state.task_count {
        let task = storage::load_task(env, project_id, index)?;
        if task.claimable_by_rep {
            pass_amount = pass_amount.checked_add(task.weighting).ok_or(Error::Overflow)?;
        }
    }
    Ok(pass_amount)
}

/// Voting → Complete or Failed. Finished polls settle their task; the losing
/// validators' stake is burned.
pub fn check_end(env: &Env, project_id: u64, oracle: &Address) -> Result<bool, Error> {
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    if state.status != ProjectStatus::Voting || !deadline_passed(env, &state) {
        return Ok(false);
    }

    let voting = VotingClient::new(env, oracle);
    for index in 0..state.task_count {
        let mut task = storage::load_task(env, project_id, index)?;
        if !task.is_disputed() || task.is_resolved() || !voting.poll_ended(&task.poll_id) {
            continue;
        }
        if voting.is_passed(&task.poll_id) {
            task.claimable_by_rep = true;
            task::burn_losing_side(env, project_id, index, &mut task, false)?;
        } else {
            task.claimable_by_validators = true;
            let wei = task::return_reward_to_pool(env, &mut task)?;
            state.wei_bal = sub(state.wei_bal, wei)?;
            task::burn_losing_side(env, project_id, index, &mut task, true)?;
        }
        storage::save_task(env, project_id, index, &task);
    }
    storage::save_project_state(env, project_id, &state);

    state.pass_amount = calculate_pass_amount(env, project_id)?;
    let to = if state.pass_amount >= config.pass_threshold {
        ProjectStatus::Complete
    } else {
        ProjectStatus::Failed
    };
    let deadline = state.next_deadline;
    advance(env, project_id, &mut state, to, deadline);
    Ok(true)
}

// ─────────────────────────────────────────────────────────
// Claims and refunds
// ─────────────────────────────────────────────────────────

/// Outcome of a task reward claim; the capital is paid by the caller.
pub struct TaskReward {
    pub wei: u128,
    pub reputation: u128,
}

/// Zero a claimable task's rewards and credit the claimer's reputation
/// (reward plus the returned claim stake).
pub fn claim_task_reward(
    env: &Env,
    project_id: u64,
    index: u32,
    claimer: &Address,
) -> Result<TaskReward, Error> {
    let (_, mut state) = storage::load_project_pair(env, project_id)?;
    let mut task = storage::load_task(env, project_id, index)?;
    if !task.claimable_by_rep {
        return Err(Error::TaskNotClaimable);
    }
    if task.claimer.as_ref() != Some(claimer) {
        return Err(Error::NotAuthorized);
    }
    if task.reward_paid_or_returned() && task.claimer_stake == 0 {
        return Err(Error::RewardAlreadyClaimed);
    }

    let reward = TaskReward {
        wei: task.wei_reward,
        reputation: task.reputation_reward,
    };
    let stake = task.claimer_stake;
    task.wei_reward = 0;
    task.reputation_reward = 0;
    task.claimer_stake = 0;
    state.wei_bal = sub(state.wei_bal, reward.wei)?;

    let mut account = storage::load_account(env, claimer);
    registry::settle_reputation(&mut account, stake, stake, reward.reputation)?;

    storage::save_account(env, claimer, &account);
    storage::save_task(env, project_id, index, &task);
    storage::save_project_state(env, project_id, &state);
    events::emit_task_reward_claimed(
        env,
        project_id,
        index,
        claimer.clone(),
        reward.wei,
        reward.reputation,
    );
    Ok(reward)
}

/// Return a validator's stake once their side has won, or once the project
/// ended with the task's dispute still open.
pub fn claim_validator_reward(
    env: &Env,
    project_id: u64,
    index: u32,
    validator: &Address,
) -> Result<u128, Error> {
    let (_, state) = storage::load_project_pair(env, project_id)?;
    let mut task = storage::load_task(env, project_id, index)?;
    let validation = storage::load_validation(env, project_id, index, validator)
        .ok_or(Error::ValidationNotFound)?;

    let entitled = match task.winning_side() {
        Some(approvers_won) => approvers_won == validation.approve,
        None => state.status.is_terminal(),
    };
    if !entitled {
        return Err(Error::TaskNotClaimable);
    }

    if validation.approve {
        task.approve_stake = sub(task.approve_stake, validation.tokens)?;
    } else {
        task.deny_stake = sub(task.deny_stake, validation.tokens)?;
    }
    curve::escrow_out(env, validator, validation.tokens)?;
    storage::remove_validation(env, project_id, index, validator);
    storage::save_task(env, project_id, index, &task);
    Ok(validation.tokens)
}

/// Settle a staker's escrow on a Complete or Expired project.
///
/// Token registry calls refund `tokens * pass_amount / 100` and burn the
/// rest; reputation registry calls do the same for reputation; any other
/// origin gets nothing.
pub fn refund_staker(
    env: &Env,
    project_id: u64,
    staker: &Address,
    origin: RegistryOrigin,
) -> Result<u128, Error> {
    if origin == RegistryOrigin::Unknown {
        return Ok(0);
    }
    let (_, state) = storage::load_project_pair(env, project_id)?;
    if !state.status.is_refundable() {
        return Err(Error::InvalidState);
    }
    match origin {
        RegistryOrigin::Token => refund_tokens(env, project_id, &state, staker),
        RegistryOrigin::Reputation => refund_reputation(env, project_id, &state, staker),
        RegistryOrigin::Unknown => Ok(0),
    }
}

fn refund_share(staked: u128, pass_amount: u32) -> Result<u128, Error> {
    Ok((mul(staked, pass_amount as u128)? / 100).min(staked))
}

fn refund_tokens(
    env: &Env,
    project_id: u64,
    state: &ProjectState,
    staker: &Address,
) -> Result<u128, Error> {
    let mut stake = storage::load_stake(env, project_id, staker);
    if stake.tokens == 0 {
        return Ok(0);
    }
    let staked = stake.tokens;
    let refund = refund_share(staked, state.pass_amount)?;
    let burned = staked - refund;
    stake.tokens = 0;
    storage::save_stake(env, project_id, staker, &stake);

    curve::escrow_out(env, staker, refund)?;
    let mut account = storage::load_account(env, staker);
    registry::forfeit_tokens(&mut account, burned)?;
    storage::save_account(env, staker, &account);
    curve::privileged_burn(env, burned)?;

    events::emit_token_refund(env, project_id, staker.clone(), refund);
    Ok(refund)
}

fn refund_reputation(
    env: &Env,
    project_id: u64,
    state: &ProjectState,
    staker: &Address,
) -> Result<u128, Error> {
    let mut stake = storage::load_stake(env, project_id, staker);
    if stake.reputation == 0 {
        return Ok(0);
    }
    let staked = stake.reputation;
    let refund = refund_share(staked, state.pass_amount)?;
    stake.reputation = 0;
    storage::save_stake(env, project_id, staker, &stake);

    let mut account = storage::load_account(env, staker);
    registry::settle_reputation(&mut account, staked, refund, 0)?;
    storage::save_account(env, staker, &account);

    events::emit_reputation_refund(env, project_id, staker.clone(), refund);
    Ok(refund)
}

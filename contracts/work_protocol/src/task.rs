//! # Tasks
//!
//! One record per unit of project work, keyed by `(project_id, index)`.
//! Rewards are fixed when the curated list is accepted and are zeroed exactly
//! once: either when the claimer collects them or when they are returned to
//! the capital pool. Validator positions live beside the task so settling a
//! dispute can walk them without loading the project.

use soroban_sdk::{Address, Env};

use crate::curve::{self, add, mul};
use crate::registry;
use crate::storage;
use crate::types::{Task, TaskSpec, Validation};
use crate::Error;

impl Task {
    /// Build a task whose rewards are `weighting` percent of the project costs.
    pub fn from_spec(spec: &TaskSpec, wei_cost: u128, reputation_cost: u128) -> Result<Self, Error> {
        let weighting = spec.weighting as u128;
        Ok(Task {
            description: spec.description.clone(),
            weighting: spec.weighting,
            wei_reward: mul(wei_cost, weighting)? / 100,
            reputation_reward: mul(reputation_cost, weighting)? / 100,
            complete: false,
            claimer: None,
            claimer_stake: 0,
            approve_stake: 0,
            deny_stake: 0,
            opposing_validator: false,
            poll_id: 0,
            claimable_by_rep: false,
            claimable_by_validators: false,
        })
    }

    pub fn is_disputed(&self) -> bool {
        self.poll_id != 0
    }

    /// A dispute is resolved once either side has been declared the winner.
    pub fn is_resolved(&self) -> bool {
        self.claimable_by_rep || self.claimable_by_validators
    }

    pub fn reward_paid_or_returned(&self) -> bool {
        self.wei_reward == 0 && self.reputation_reward == 0
    }

    /// Mark the task claimable by its claimer. Fails without approving stake.
    pub fn mark_claimable_by_rep(&mut self) -> bool {
        if self.approve_stake == 0 {
            return false;
        }
        self.claimable_by_rep = true;
        true
    }

    /// `Some(true)` when approvers won, `Some(false)` when deniers won.
    pub fn winning_side(&self) -> Option<bool> {
        if self.claimable_by_rep {
            Some(true)
        } else if self.claimable_by_validators {
            Some(false)
        } else {
            None
        }
    }

    /// Zero the reward fields, returning the capital to put back in the pool.
    fn take_wei_reward(&mut self) -> u128 {
        let wei = self.wei_reward;
        self.wei_reward = 0;
        self.reputation_reward = 0;
        wei
    }
}

/// Return a task's capital reward to the pool and void its claim.
///
/// The claimer's escrowed reputation is destroyed. Returns the capital moved,
/// which the caller must also deduct from the project's balance.
pub fn return_reward_to_pool(env: &Env, task: &mut Task) -> Result<u128, Error> {
    let wei = task.take_wei_reward();
    curve::return_to_pool(env, wei)?;

    if let Some(claimer) = task.claimer.clone() {
        if task.claimer_stake > 0 {
            let mut account = storage::load_account(env, &claimer);
            registry::settle_reputation(&mut account, task.claimer_stake, 0, 0)?;
            storage::save_account(env, &claimer, &account);
            task.claimer_stake = 0;
        }
    }
    Ok(wei)
}

/// Take a validator position, escrowing `tokens` on the chosen side.
pub fn add_validation(
    env: &Env,
    project_id: u64,
    index: u32,
    task: &mut Task,
    validator: &Address,
    tokens: u128,
    approve: bool,
) -> Result<(), Error> {
    let mut validation = match storage::load_validation(env, project_id, index, validator) {
        Some(existing) if existing.approve != approve => {
            return Err(Error::ConflictingValidation)
        }
        Some(existing) => existing,
        None => Validation { tokens: 0, approve },
    };

    curve::escrow_in(env, validator, tokens)?;
    validation.tokens = add(validation.tokens, tokens)?;
    if approve {
        task.approve_stake = add(task.approve_stake, tokens)?;
    } else {
        task.deny_stake = add(task.deny_stake, tokens)?;
    }
    task.opposing_validator = task.approve_stake > 0 && task.deny_stake > 0;

    storage::save_validation(env, project_id, index, validator, &validation);
    Ok(())
}

/// Destroy the stake of every validator on the losing side of a dispute.
pub fn burn_losing_side(
    env: &Env,
    project_id: u64,
    index: u32,
    task: &mut Task,
    losing_approve: bool,
) -> Result<u128, Error> {
    let mut burned: u128 = 0;
    for validator in storage::load_validators(env, project_id, index).iter() {
        let Some(validation) = storage::load_validation(env, project_id, index, &validator) else {
            continue;
        };
        if validation.approve != losing_approve {
            continue;
        }
        let mut account = storage::load_account(env, &validator);
        registry::forfeit_tokens(&mut account, validation.tokens)?;
        storage::save_account(env, &validator, &account);
        storage::remove_validation(env, project_id, index, &validator);
        burned = add(burned, validation.tokens)?;
    }

    if losing_approve {
        task.approve_stake = 0;
    } else {
        task.deny_stake = 0;
    }
    curve::privileged_burn(env, burned)?;
    Ok(burned)
}

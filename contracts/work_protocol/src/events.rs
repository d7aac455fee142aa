//! # Events
//!
//! Every notification the contract publishes. Topics are a short symbol,
//! followed by the project id for project-scoped events; the data is one of
//! the structs below. The off-chain indexer keys on the leading symbol.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::types::ProjectStatus;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Minted {
    pub buyer: Address,
    pub amount: u128,
    pub cost: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    pub seller: Address,
    pub amount: u128,
    pub reward: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectProposed {
    pub project_id: u64,
    pub proposer: Address,
    pub wei_cost: u128,
    pub reputation_cost: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeChanged {
    pub project_id: u64,
    pub staker: Address,
    pub tokens: u128,
    pub reputation: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusChanged {
    pub project_id: u64,
    pub from: ProjectStatus,
    pub to: ProjectStatus,
    pub next_deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskValidated {
    pub project_id: u64,
    pub index: u32,
    pub validator: Address,
    pub tokens: u128,
    pub approve: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PollStarted {
    pub project_id: u64,
    pub index: u32,
    pub poll_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskRewardClaimed {
    pub project_id: u64,
    pub index: u32,
    pub claimer: Address,
    pub wei: u128,
    pub reputation: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenRefund {
    pub project_id: u64,
    pub staker: Address,
    pub amount: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReputationRefund {
    pub project_id: u64,
    pub staker: Address,
    pub amount: u128,
}

pub fn emit_minted(env: &Env, buyer: Address, amount: u128, cost: u128) {
    env.events().publish(
        (symbol_short!("minted"),),
        Minted {
            buyer,
            amount,
            cost,
        },
    );
}

pub fn emit_withdrawn(env: &Env, seller: Address, amount: u128, reward: u128) {
    env.events().publish(
        (symbol_short!("withdrawn"),),
        Withdrawn {
            seller,
            amount,
            reward,
        },
    );
}

pub fn emit_project_proposed(
    env: &Env,
    project_id: u64,
    proposer: Address,
    wei_cost: u128,
    reputation_cost: u128,
) {
    env.events().publish(
        (symbol_short!("proposed"), project_id),
        ProjectProposed {
            project_id,
            proposer,
            wei_cost,
            reputation_cost,
        },
    );
}

pub fn emit_staked(env: &Env, project_id: u64, staker: Address, tokens: u128, reputation: u128) {
    env.events().publish(
        (symbol_short!("staked"), project_id),
        StakeChanged {
            project_id,
            staker,
            tokens,
            reputation,
        },
    );
}

pub fn emit_unstaked(env: &Env, project_id: u64, staker: Address, tokens: u128, reputation: u128) {
    env.events().publish(
        (symbol_short!("unstaked"), project_id),
        StakeChanged {
            project_id,
            staker,
            tokens,
            reputation,
        },
    );
}

pub fn emit_status_changed(
    env: &Env,
    project_id: u64,
    from: ProjectStatus,
    to: ProjectStatus,
    next_deadline: u64,
) {
    env.events().publish(
        (symbol_short!("status"), project_id),
        StatusChanged {
            project_id,
            from,
            to,
            next_deadline,
        },
    );
}

pub fn emit_task_validated(
    env: &Env,
    project_id: u64,
    index: u32,
    validator: Address,
    tokens: u128,
    approve: bool,
) {
    env.events().publish(
        (symbol_short!("validated"), project_id),
        TaskValidated {
            project_id,
            index,
            validator,
            tokens,
            approve,
        },
    );
}

pub fn emit_poll_started(env: &Env, project_id: u64, index: u32, poll_id: u64) {
    env.events().publish(
        (symbol_short!("poll"), project_id),
        PollStarted {
            project_id,
            index,
            poll_id,
        },
    );
}

pub fn emit_task_reward_claimed(
    env: &Env,
    project_id: u64,
    index: u32,
    claimer: Address,
    wei: u128,
    reputation: u128,
) {
    env.events().publish(
        (symbol_short!("rewarded"), project_id),
        TaskRewardClaimed {
            project_id,
            index,
            claimer,
            wei,
            reputation,
        },
    );
}

pub fn emit_token_refund(env: &Env, project_id: u64, staker: Address, amount: u128) {
    env.events().publish(
        (symbol_short!("tok_rfnd"), project_id),
        TokenRefund {
            project_id,
            staker,
            amount,
        },
    );
}

pub fn emit_reputation_refund(env: &Env, project_id: u64, staker: Address, amount: u128) {
    env.events().publish(
        (symbol_short!("rep_rfnd"), project_id),
        ReputationRefund {
            project_id,
            staker,
            amount,
        },
    );
}

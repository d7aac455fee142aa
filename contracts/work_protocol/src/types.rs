//! # Types
//!
//! Shared data structures used across all modules of the work protocol.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Project` is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`] — written once at proposal; never mutated.
//! - [`ProjectState`] — written on every stake, transition and claim.
//!
//! The public API exposes the reconstructed [`Project`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`ProjectStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Proposed ──► Staked ──► Active ──► Validation ──► Voting ──► Complete
//!     │           │                                    └─────► Failed
//!     └───────────┴──► Expired
//! ```
//!
//! Discriminants are the wire values (1..=8) and their order is the
//! lifecycle order, so `PartialOrd` comparisons read as "at or past".

use soroban_sdk::{contracttype, Address, BytesN};

/// Default price floor of the bonding curve, in capital units.
pub const DEFAULT_BASE_COST: u128 = 100_000_000_000_000;

/// Reputation granted to an account on registration.
pub const DEFAULT_INITIAL_REPUTATION: u128 = 10_000;

/// Minimum weighted score of rep-claimable tasks for a project to pass.
pub const DEFAULT_PASS_THRESHOLD: u32 = 100;

/// Quorum percentage requested from the voting oracle for task disputes.
pub const DISPUTE_QUORUM: u32 = 51;

/// Fraction (1 / N) of the capital cost a proposer stakes in tokens.
pub const PROPOSE_PROPORTION: u128 = 20;

/// Upper bound on the number of tasks in a curated list.
pub const MAX_TASKS: u32 = 100;

const DAY: u64 = 86_400;

/// Lifecycle status of a project.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ProjectStatus {
    /// Accepting token and reputation stake.
    Proposed = 1,
    /// Fully staked; task lists are being curated.
    Staked = 2,
    /// Task list fixed; work is being claimed and completed.
    Active = 3,
    /// Completed tasks are open to validator stake.
    Validation = 4,
    /// Disputed tasks are being decided by polls.
    Voting = 5,
    /// Pass threshold met.
    Complete = 6,
    /// Pass threshold missed.
    Failed = 7,
    /// Never staked or never curated.
    Expired = 8,
}

impl ProjectStatus {
    /// Stakers may only be refunded out of these states.
    pub fn is_refundable(self) -> bool {
        matches!(self, ProjectStatus::Complete | ProjectStatus::Expired)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProjectStatus::Complete | ProjectStatus::Failed | ProjectStatus::Expired
        )
    }
}

/// Protocol-wide configuration, written once by `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtocolConfig {
    /// Deployer that authorised `init`.
    pub admin: Address,
    /// Token contract used as the capital asset backing the curve.
    pub capital_token: Address,
    /// Operator allowed to call the raw escrow/burn interface.
    pub token_registry: Address,
    /// Operator whose refund calls settle reputation stake.
    pub reputation_registry: Address,
    /// Price floor of the bonding curve.
    pub base_cost: u128,
    /// Reputation granted by `register`.
    pub initial_reputation: u128,
    /// Copied into every new project.
    pub pass_threshold: u32,
    pub staked_period: u64,
    pub active_period: u64,
    pub validate_period: u64,
    pub vote_commit_period: u64,
    pub vote_reveal_period: u64,
}

impl ProtocolConfig {
    /// Reference configuration: one-week phases, three-day commit and reveal.
    pub fn with_defaults(
        admin: Address,
        capital_token: Address,
        token_registry: Address,
        reputation_registry: Address,
    ) -> Self {
        ProtocolConfig {
            admin,
            capital_token,
            token_registry,
            reputation_registry,
            base_cost: DEFAULT_BASE_COST,
            initial_reputation: DEFAULT_INITIAL_REPUTATION,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            staked_period: 7 * DAY,
            active_period: 7 * DAY,
            validate_period: 7 * DAY,
            vote_commit_period: 3 * DAY,
            vote_reveal_period: 3 * DAY,
        }
    }
}

/// Supply and capital counters of the bonding curve.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CurveState {
    /// Tokens in existence, free or escrowed.
    pub total_supply: u128,
    /// Tokens not escrowed into any project or task.
    pub total_free_supply: u128,
    /// Capital collected by minting and not yet paid out.
    pub pool_balance: u128,
}

/// Immutable project configuration, written once at proposal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub proposer: Address,
    /// Capital the project needs to be fully staked.
    pub wei_cost: u128,
    /// Reputation the project needs to be fully staked.
    pub reputation_cost: u128,
    pub pass_threshold: u32,
    /// Content hash of the proposal document.
    pub description: BytesN<32>,
    /// Tokens the proposer escrowed when proposing.
    pub proposer_stake: u128,
    pub staked_period: u64,
    pub active_period: u64,
    pub validate_period: u64,
    pub vote_commit_period: u64,
    pub vote_reveal_period: u64,
}

/// Mutable project state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub status: ProjectStatus,
    pub next_deadline: u64,
    /// Capital moved out of the pool by token stakers.
    pub wei_bal: u128,
    pub reputation_staked: u128,
    pub tokens_staked: u128,
    /// Weighted score of rep-claimable tasks, set when the project ends.
    pub pass_amount: u32,
    pub task_count: u32,
    /// Task-list hash carrying the most stake weight during curation.
    pub top_task_hash: Option<BytesN<32>>,
    pub proposer_refunded: bool,
}

/// Full representation of a project.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    pub id: u64,
    pub proposer: Address,
    pub wei_cost: u128,
    pub reputation_cost: u128,
    pub pass_threshold: u32,
    pub description: BytesN<32>,
    pub proposer_stake: u128,
    pub status: ProjectStatus,
    pub next_deadline: u64,
    pub wei_bal: u128,
    pub reputation_staked: u128,
    pub tokens_staked: u128,
    pub pass_amount: u32,
    pub task_count: u32,
    pub top_task_hash: Option<BytesN<32>>,
}

/// Per-staker escrow held by one project.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stake {
    pub tokens: u128,
    pub reputation: u128,
}

/// One entry of a curated task list.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskSpec {
    pub description: BytesN<32>,
    /// Share of the project (percent); a list's weightings sum to 100.
    pub weighting: u32,
}

/// A unit of project work.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Task {
    pub description: BytesN<32>,
    pub weighting: u32,
    pub wei_reward: u128,
    pub reputation_reward: u128,
    pub complete: bool,
    pub claimer: Option<Address>,
    /// Reputation the claimer escrowed when claiming.
    pub claimer_stake: u128,
    pub approve_stake: u128,
    pub deny_stake: u128,
    pub opposing_validator: bool,
    /// Dispute poll, 0 when none was started.
    pub poll_id: u64,
    pub claimable_by_rep: bool,
    pub claimable_by_validators: bool,
}

/// A validator's position on one task.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Validation {
    pub tokens: u128,
    pub approve: bool,
}

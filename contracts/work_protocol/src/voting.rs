//! Interface of the external commit-reveal voting contract.
//!
//! Disputed tasks are settled by a poll the oracle runs; this contract only
//! opens polls and reads their outcome. The oracle's address is supplied by
//! the caller of `check_voting` / `check_end`.

use soroban_sdk::{contractclient, Env};

#[allow(dead_code)]
#[contractclient(name = "VotingClient")]
pub trait VotingOracle {
    /// Open a poll; returns a non-zero poll id.
    fn start_poll(env: Env, quorum: u32, commit_duration: u64, reveal_duration: u64) -> u64;

    fn poll_ended(env: Env, poll_id: u64) -> bool;

    fn is_passed(env: Env, poll_id: u64) -> bool;
}

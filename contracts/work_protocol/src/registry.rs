//! # Registry
//!
//! Per-account custody of utility tokens and reputation. Each balance is split
//! into a free part and an escrowed (staked) part; every helper here moves
//! value between the two atomically so `free + staked` always equals what the
//! account holds.
//!
//! Two operator addresses from [`ProtocolConfig`] stand for the external token
//! and reputation registries. Only they may use the raw escrow interface, and
//! the one calling `refund_staker` decides which refund formula applies.

use soroban_sdk::{contracttype, Address, Env};

use crate::curve::{add, sub};
use crate::storage;
use crate::types::ProtocolConfig;
use crate::Error;

/// Token and reputation balances of one account.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    /// Free utility tokens.
    pub tokens: u128,
    /// Tokens escrowed in projects and validations.
    pub staked_tokens: u128,
    /// Free reputation.
    pub reputation: u128,
    /// Reputation escrowed in projects and task claims.
    pub staked_reputation: u128,
    pub registered: bool,
}

/// Which registry a privileged call came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RegistryOrigin {
    Token,
    Reputation,
    Unknown,
}

impl RegistryOrigin {
    pub fn of(config: &ProtocolConfig, caller: &Address) -> Self {
        if *caller == config.token_registry {
            RegistryOrigin::Token
        } else if *caller == config.reputation_registry {
            RegistryOrigin::Reputation
        } else {
            RegistryOrigin::Unknown
        }
    }
}

/// Require that `caller` is the configured token registry and signed the call.
pub fn require_token_registry(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let config = storage::load_config(env)?;
    if RegistryOrigin::of(&config, caller) != RegistryOrigin::Token {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}

/// Grant the configured starting reputation. Each account registers once.
pub fn register(env: &Env, owner: &Address) -> Result<u128, Error> {
    let config = storage::load_config(env)?;
    let mut account = storage::load_account(env, owner);
    if account.registered {
        return Err(Error::AlreadyRegistered);
    }
    account.registered = true;
    account.reputation = add(account.reputation, config.initial_reputation)?;
    storage::save_account(env, owner, &account);
    Ok(account.reputation)
}

pub fn lock_tokens(account: &mut Account, amount: u128) -> Result<(), Error> {
    if account.tokens < amount {
        return Err(Error::InsufficientBalance);
    }
    account.tokens -= amount;
    account.staked_tokens = add(account.staked_tokens, amount)?;
    Ok(())
}

pub fn unlock_tokens(account: &mut Account, amount: u128) -> Result<(), Error> {
    account.staked_tokens = sub(account.staked_tokens, amount)?;
    account.tokens = add(account.tokens, amount)?;
    Ok(())
}

/// Drop escrowed tokens from the account; the supply side is burned separately.
pub fn forfeit_tokens(account: &mut Account, amount: u128) -> Result<(), Error> {
    account.staked_tokens = sub(account.staked_tokens, amount)?;
    Ok(())
}

pub fn lock_reputation(account: &mut Account, amount: u128) -> Result<(), Error> {
    if !account.registered {
        return Err(Error::NotRegistered);
    }
    if account.reputation < amount {
        return Err(Error::InsufficientReputation);
    }
    account.reputation -= amount;
    account.staked_reputation = add(account.staked_reputation, amount)?;
    Ok(())
}

/// Release `staked` reputation, crediting back `returned` of it plus `bonus`.
/// Whatever part of `staked` is not returned is destroyed.
pub fn settle_reputation(
    account: &mut Account,
    staked: u128,
    returned: u128,
    bonus: u128,
) -> Result<(), Error> {
    if returned > staked {
        return Err(Error::Overflow);
    }
    account.staked_reputation = sub(account.staked_reputation, staked)?;
    account.reputation = add(account.reputation, add(returned, bonus)?)?;
    Ok(())
}

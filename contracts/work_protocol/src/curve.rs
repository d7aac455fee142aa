//! # Bonding curve
//!
//! Token supply is minted against, and burned out of, a single capital pool.
//! The redeemable price is `pool_balance / total_free_supply`; minting pays a
//! premium that grows with the share of supply being created, so the curve is
//! convex and a mint followed by a burn never returns more than it cost.
//!
//! The price functions are pure over [`CurveState`] so they can be evaluated
//! off-ledger; the `mint`/`burn`/`escrow` helpers load and store the curve
//! and the affected [`Account`](crate::registry::Account).
//!
//! All arithmetic is checked `u128`. Anything that would go below zero fails
//! with [`Error::Underflow`] instead of wrapping.

use soroban_sdk::{Address, Env};

use crate::registry;
use crate::storage;
use crate::types::CurveState;
use crate::Error;

/// Fixed-point ratio `numerator / denominator` scaled by `10^precision`,
/// rounded half-up at the last digit.
///
/// `percent(1, 3, 3) == 333`, `percent(2, 3, 2) == 67`.
pub fn percent(numerator: u128, denominator: u128, precision: u32) -> Result<u128, Error> {
    if denominator == 0 {
        return Err(Error::DivisionByZero);
    }
    let scale = 10u128.checked_pow(precision + 1).ok_or(Error::Overflow)?;
    let scaled = numerator.checked_mul(scale).ok_or(Error::Overflow)?;
    Ok((scaled / denominator + 5) / 10)
}

pub(crate) fn add(a: u128, b: u128) -> Result<u128, Error> {
    a.checked_add(b).ok_or(Error::Overflow)
}

pub(crate) fn sub(a: u128, b: u128) -> Result<u128, Error> {
    a.checked_sub(b).ok_or(Error::Underflow)
}

pub(crate) fn mul(a: u128, b: u128) -> Result<u128, Error> {
    a.checked_mul(b).ok_or(Error::Overflow)
}

/// Capital a single free token redeems for.
pub fn current_price(curve: &CurveState, base_cost: u128) -> u128 {
    if curve.total_free_supply == 0 {
        base_cost
    } else {
        curve.pool_balance / curve.total_free_supply
    }
}

/// Marginal price paid when minting `tokens` more.
///
/// An empty or worthless curve bootstraps at `base_cost`.
pub fn target_price(curve: &CurveState, base_cost: u128, tokens: u128) -> Result<u128, Error> {
    let price = current_price(curve, base_cost);
    if curve.total_supply == 0 || price == 0 {
        return Ok(base_cost);
    }
    let increase = percent(tokens, add(curve.total_supply, tokens)?, 3)?;
    Ok(mul(price, add(1000, increase)?)? / 1000)
}

/// Capital needed to lift the whole supply to `target` after minting `tokens`,
/// net of what already backs the existing supply.
pub fn wei_required(
    curve: &CurveState,
    base_cost: u128,
    target: u128,
    tokens: u128,
) -> Result<u128, Error> {
    let raised = mul(target, add(curve.total_supply, tokens)?)?;
    let backed = mul(current_price(curve, base_cost), curve.total_supply)?;
    sub(raised, backed)
}

/// Outcome of a successful mint.
pub struct Minted {
    pub cost: u128,
    pub surplus: u128,
}

/// Mint `tokens` to `buyer`, charging the curve's required capital.
///
/// Only updates ledger state; the caller moves the capital afterwards.
pub fn mint(env: &Env, buyer: &Address, tokens: u128, supplied: u128) -> Result<Minted, Error> {
    if tokens == 0 {
        return Err(Error::InvalidAmount);
    }
    let config = storage::load_config(env)?;
    let mut curve = storage::load_curve(env);

    let target = target_price(&curve, config.base_cost, tokens)?;
    let cost = wei_required(&curve, config.base_cost, target, tokens)?;
    if supplied < cost {
        return Err(Error::InsufficientCapital);
    }

    curve.total_supply = add(curve.total_supply, tokens)?;
    curve.total_free_supply = add(curve.total_free_supply, tokens)?;
    curve.pool_balance = add(curve.pool_balance, cost)?;

    let mut account = storage::load_account(env, buyer);
    account.tokens = add(account.tokens, tokens)?;

    storage::save_curve(env, &curve);
    storage::save_account(env, buyer, &account);

    Ok(Minted {
        cost,
        surplus: supplied - cost,
    })
}

/// Burn `tokens` of `seller`'s free balance; returns the capital owed.
pub fn burn(env: &Env, seller: &Address, tokens: u128) -> Result<u128, Error> {
    if tokens == 0 {
        return Err(Error::InvalidAmount);
    }
    let config = storage::load_config(env)?;
    let mut curve = storage::load_curve(env);
    let mut account = storage::load_account(env, seller);
    if account.tokens < tokens {
        return Err(Error::InsufficientBalance);
    }

    let reward = mul(tokens, current_price(&curve, config.base_cost))?;

    curve.total_supply = sub(curve.total_supply, tokens)?;
    curve.total_free_supply = sub(curve.total_free_supply, tokens)?;
    curve.pool_balance = sub(curve.pool_balance, reward)?;
    account.tokens -= tokens;

    storage::save_curve(env, &curve);
    storage::save_account(env, seller, &account);
    Ok(reward)
}

/// Move `amount` of `owner`'s tokens from the free pool into escrow.
pub fn escrow_in(env: &Env, owner: &Address, amount: u128) -> Result<(), Error> {
    let mut curve = storage::load_curve(env);
    let mut account = storage::load_account(env, owner);
    registry::lock_tokens(&mut account, amount)?;
    curve.total_free_supply = sub(curve.total_free_supply, amount)?;
    storage::save_curve(env, &curve);
    storage::save_account(env, owner, &account);
    Ok(())
}

/// Move `amount` of `owner`'s escrowed tokens back to the free pool.
pub fn escrow_out(env: &Env, owner: &Address, amount: u128) -> Result<(), Error> {
    let mut curve = storage::load_curve(env);
    let mut account = storage::load_account(env, owner);
    registry::unlock_tokens(&mut account, amount)?;
    curve.total_free_supply = add(curve.total_free_supply, amount)?;
    storage::save_curve(env, &curve);
    storage::save_account(env, owner, &account);
    Ok(())
}

/// Destroy escrowed supply. Free supply and the pool are untouched, so
/// `amount` may not exceed what is currently escrowed.
pub fn privileged_burn(env: &Env, amount: u128) -> Result<(), Error> {
    let mut curve = storage::load_curve(env);
    let escrowed = sub(curve.total_supply, curve.total_free_supply)?;
    if amount > escrowed {
        return Err(Error::Underflow);
    }
    curve.total_supply -= amount;
    storage::save_curve(env, &curve);
    Ok(())
}

/// Move capital out of the pool into a project's balance.
pub fn draw_from_pool(env: &Env, amount: u128) -> Result<(), Error> {
    let mut curve = storage::load_curve(env);
    curve.pool_balance = sub(curve.pool_balance, amount)?;
    storage::save_curve(env, &curve);
    Ok(())
}

/// Return project capital to the pool.
pub fn return_to_pool(env: &Env, amount: u128) -> Result<(), Error> {
    let mut curve = storage::load_curve(env);
    curve.pool_balance = add(curve.pool_balance, amount)?;
    storage::save_curve(env, &curve);
    Ok(())
}

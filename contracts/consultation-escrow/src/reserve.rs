use soroban_sdk::{log, token, Address, Env};

use crate::access::{has_role, require_admin, require_not_paused};
use crate::config::settlement_token;
use crate::error::ContractError;
use crate::events::emit_reserve_changed;
use crate::types::{DataKey, Role};

// Settlement tokens custodied by the escrow, patient payments included
pub fn reserve(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::Reserve).unwrap_or(0)
}

// Settlement tokens owed to Active sessions
pub fn locked(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::Locked).unwrap_or(0)
}

pub fn available(env: &Env) -> i128 {
    reserve(env) - locked(env)
}

pub fn collected(env: &Env, token: &Address) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::Collected(token.clone()))
        .unwrap_or(0)
}

fn set_reserve(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::Reserve, &amount);
}

fn set_locked(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::Locked, &amount);
}

fn set_collected(env: &Env, token: &Address, amount: i128) {
    env.storage()
        .instance()
        .set(&DataKey::Collected(token.clone()), &amount);
}

/// Pull `amount` of `token` from `from` using its prior approval.
pub fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
    let client = token::Client::new(env, token);
    let escrow = env.current_contract_address();
    if client.allowance(from, &escrow) < amount || client.balance(from) < amount {
        return Err(ContractError::InsufficientPayment);
    }
    client.transfer_from(&escrow, from, &escrow, &amount);
    Ok(())
}

pub fn push(env: &Env, token: &Address, to: &Address, amount: i128) {
    token::Client::new(env, token).transfer(&env.current_contract_address(), to, &amount);
}

/// Book a new session's payment: the payment itself goes to the reserve
/// (settlement token) or to the collected pool, and `pyusd_amount` is locked.
pub fn credit_session(
    env: &Env,
    payment_token: &Address,
    payment_amount: i128,
    pyusd_amount: i128,
) -> Result<(), ContractError> {
    if *payment_token == settlement_token(env)? {
        set_reserve(env, reserve(env) + payment_amount);
    } else {
        if available(env) < pyusd_amount {
            return Err(ContractError::InsufficientReserve);
        }
        set_collected(env, payment_token, collected(env, payment_token) + payment_amount);
    }
    set_locked(env, locked(env) + pyusd_amount);
    Ok(())
}

/// Pay a session's settlement amount out of the reserve.
pub fn debit_release(env: &Env, to: &Address, pyusd_amount: i128) -> Result<(), ContractError> {
    let current = reserve(env);
    if current < pyusd_amount {
        return Err(ContractError::InsufficientReserve);
    }
    set_reserve(env, current - pyusd_amount);
    set_locked(env, locked(env) - pyusd_amount);
    push(env, &settlement_token(env)?, to, pyusd_amount);
    Ok(())
}

/// Refund a session and unlock its amount, returning the token and amount paid out.
///
/// The original payment goes back when the escrow still holds it. Once collected
/// tokens have been withdrawn, the session's locked `pyusd_amount` is paid from
/// the reserve instead.
pub fn debit_refund(
    env: &Env,
    to: &Address,
    payment_token: &Address,
    payment_amount: i128,
    pyusd_amount: i128,
) -> Result<(Address, i128), ContractError> {
    let settlement = settlement_token(env)?;
    let (token, amount) = if *payment_token == settlement {
        set_reserve(env, reserve(env) - payment_amount);
        (settlement, payment_amount)
    } else {
        let held = collected(env, payment_token);
        if held >= payment_amount {
            set_collected(env, payment_token, held - payment_amount);
            (payment_token.clone(), payment_amount)
        } else {
            log!(env, "collected tokens withdrawn, refunding {} from reserve", pyusd_amount);
            set_reserve(env, reserve(env) - pyusd_amount);
            (settlement, pyusd_amount)
        }
    };
    set_locked(env, locked(env) - pyusd_amount);
    push(env, &token, to, amount);
    Ok((token, amount))
}

/// Top up the settlement reserve
pub fn deposit_pyusd_reserve(
    env: &Env,
    operator: Address,
    amount: i128,
) -> Result<(), ContractError> {
    operator.require_auth();
    if !has_role(env, &operator, Role::ReserveOperator) {
        return Err(ContractError::Unauthorized);
    }
    require_not_paused(env)?;
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    pull(env, &settlement_token(env)?, &operator, amount)?;
    let new_reserve = reserve(env) + amount;
    set_reserve(env, new_reserve);

    emit_reserve_changed(env, "reserve_deposited", operator, amount, new_reserve, locked(env));
    Ok(())
}

/// Withdraw settlement tokens not owed to any Active session
pub fn withdraw_reserve(
    env: &Env,
    admin: Address,
    to: Address,
    amount: i128,
) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    if amount > available(env) {
        return Err(ContractError::InsufficientReserve);
    }

    let new_reserve = reserve(env) - amount;
    set_reserve(env, new_reserve);
    push(env, &settlement_token(env)?, &to, amount);

    emit_reserve_changed(env, "reserve_withdrawn", to, amount, new_reserve, locked(env));
    Ok(())
}

/// Move converted patient payments out, e.g. to be swapped into the settlement token.
/// Refunds of sessions paid in `token` then fall back to the reserve.
pub fn withdraw_collected(
    env: &Env,
    admin: Address,
    token: Address,
    to: Address,
    amount: i128,
) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let held = collected(env, &token);
    if amount > held {
        return Err(ContractError::InsufficientReserve);
    }

    set_collected(env, &token, held - amount);
    push(env, &token, &to, amount);

    emit_reserve_changed(env, "collected_withdrawn", to, amount, reserve(env), locked(env));
    Ok(())
}

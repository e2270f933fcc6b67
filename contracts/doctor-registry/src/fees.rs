use soroban_sdk::{log, token, Address, Env, Symbol};

use crate::access::require_admin;
use crate::error::ContractError;
use crate::types::{DataKey, DepositPolicy};

/// Initialize the registry with its fee schedule
pub fn initialize(
    env: &Env,
    admin: Address,
    stablecoin: Address,
    deposit_fee: i128,
    stake_amount: i128,
) -> Result<(), ContractError> {
    let storage = env.storage().instance();
    if storage.has(&DataKey::Admin) {
        return Err(ContractError::AlreadyInitialized);
    }
    admin.require_auth();
    if deposit_fee < 0 || stake_amount < 0 {
        return Err(ContractError::InvalidAmount);
    }

    storage.set(&DataKey::Admin, &admin);
    storage.set(&DataKey::Stablecoin, &stablecoin);
    storage.set(&DataKey::DepositFee, &deposit_fee);
    storage.set(&DataKey::StakeAmount, &stake_amount);
    storage.set(&DataKey::Policy, &DepositPolicy::default_policy());
    storage.set(&DataKey::RegistrationCount, &0u32);
    storage.set(&DataKey::DoctorCount, &0u32);
    storage.set(&DataKey::HeldFunds, &0i128);
    storage.set(&DataKey::RetainedFees, &0i128);

    env.events().publish(
        (Symbol::new(env, "registry_initialized"),),
        (admin, stablecoin, deposit_fee, stake_amount),
    );
    Ok(())
}

pub fn stablecoin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Stablecoin)
        .ok_or(ContractError::NotInitialized)
}

pub fn deposit_fee(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::DepositFee).unwrap_or(0)
}

pub fn stake_amount(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::StakeAmount).unwrap_or(0)
}

pub fn deposit_policy(env: &Env) -> DepositPolicy {
    env.storage()
        .instance()
        .get(&DataKey::Policy)
        .unwrap_or(DepositPolicy::default_policy())
}

pub fn held_funds(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::HeldFunds).unwrap_or(0)
}

pub fn retained_fees(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::RetainedFees).unwrap_or(0)
}

fn set_held_funds(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::HeldFunds, &amount);
}

fn set_retained_fees(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::RetainedFees, &amount);
}

/// Change the deposit fee charged on future registrations
pub fn change_deposit_fee(env: &Env, admin: Address, fee: i128) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    if fee < 0 {
        return Err(ContractError::InvalidAmount);
    }
    let old = deposit_fee(env);
    env.storage().instance().set(&DataKey::DepositFee, &fee);

    env.events()
        .publish((Symbol::new(env, "deposit_fee_changed"),), (old, fee));
    Ok(())
}

/// Change the stake locked by future registrations
pub fn change_stake_amount(env: &Env, admin: Address, amount: i128) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    if amount < 0 {
        return Err(ContractError::InvalidAmount);
    }
    let old = stake_amount(env);
    env.storage().instance().set(&DataKey::StakeAmount, &amount);

    env.events()
        .publish((Symbol::new(env, "stake_amount_changed"),), (old, amount));
    Ok(())
}

pub fn set_deposit_policy(
    env: &Env,
    admin: Address,
    policy: DepositPolicy,
) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    env.storage().instance().set(&DataKey::Policy, &policy);

    env.events()
        .publish((Symbol::new(env, "deposit_policy_changed"),), policy);
    Ok(())
}

/// Pull `amount` of the stablecoin from `from` using its prior approval.
pub fn pull_funds(env: &Env, from: &Address, amount: i128) -> Result<(), ContractError> {
    if amount == 0 {
        return Ok(());
    }
    let token = token::Client::new(env, &stablecoin(env)?);
    let registry = env.current_contract_address();

    if token.allowance(from, &registry) < amount {
        log!(env, "registration allowance below required amount: {}", amount);
        return Err(ContractError::InsufficientAllowance);
    }
    if token.balance(from) < amount {
        return Err(ContractError::InsufficientBalance);
    }

    token.transfer_from(&registry, from, &registry, &amount);
    set_held_funds(env, held_funds(env) + amount);
    Ok(())
}

/// Release held registration funds: `refund` goes back to the doctor and
/// `retained` becomes withdrawable platform fees.
pub fn settle_held_funds(
    env: &Env,
    doctor: &Address,
    refund: i128,
    retained: i128,
) -> Result<(), ContractError> {
    let held = held_funds(env);
    let total = refund + retained;
    if total > held {
        return Err(ContractError::InsufficientBalance);
    }

    if refund > 0 {
        let token = token::Client::new(env, &stablecoin(env)?);
        token.transfer(&env.current_contract_address(), doctor, &refund);
    }
    set_held_funds(env, held - total);
    set_retained_fees(env, retained_fees(env) + retained);
    Ok(())
}

/// Pay out retained deposit fees
pub fn withdraw_fees(
    env: &Env,
    admin: Address,
    to: Address,
    amount: i128,
) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let retained = retained_fees(env);
    if amount > retained {
        return Err(ContractError::InsufficientBalance);
    }

    set_retained_fees(env, retained - amount);
    let token = token::Client::new(env, &stablecoin(env)?);
    token.transfer(&env.current_contract_address(), &to, &amount);

    env.events()
        .publish((Symbol::new(env, "fees_withdrawn"), to), amount);
    Ok(())
}

use soroban_sdk::{Address, Env, Symbol};

use crate::access::require_admin;
use crate::error::ContractError;
use crate::types::{DataKey, EscrowConfig};

const MAX_CONFIDENCE_BPS: u32 = 10_000;

/// Initialize the escrow with its collaborators and policy
pub fn initialize(
    env: &Env,
    admin: Address,
    registry: Address,
    settlement_token: Address,
    oracle: Address,
    config: EscrowConfig,
) -> Result<(), ContractError> {
    let storage = env.storage().instance();
    if storage.has(&DataKey::Admin) {
        return Err(ContractError::AlreadyInitialized);
    }
    admin.require_auth();
    validate_config(&config)?;

    storage.set(&DataKey::Admin, &admin);
    storage.set(&DataKey::Registry, &registry);
    storage.set(&DataKey::SettlementToken, &settlement_token);
    storage.set(&DataKey::Oracle, &oracle);
    storage.set(&DataKey::Config, &config);
    storage.set(&DataKey::Paused, &false);
    storage.set(&DataKey::SessionCount, &0u64);
    storage.set(&DataKey::Reserve, &0i128);
    storage.set(&DataKey::Locked, &0i128);

    env.events().publish(
        (Symbol::new(env, "escrow_initialized"),),
        (admin, registry, settlement_token, oracle),
    );
    Ok(())
}

fn validate_config(config: &EscrowConfig) -> Result<(), ContractError> {
    if config.max_price_age == 0
        || config.max_confidence_bps > MAX_CONFIDENCE_BPS
        || config.resolution_window == 0
    {
        return Err(ContractError::InvalidConfig);
    }
    Ok(())
}

pub fn get_config(env: &Env) -> Result<EscrowConfig, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ContractError::NotInitialized)
}

pub fn update_config(env: &Env, admin: Address, config: EscrowConfig) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    validate_config(&config)?;
    env.storage().instance().set(&DataKey::Config, &config);

    env.events()
        .publish((Symbol::new(env, "config_updated"),), config);
    Ok(())
}

fn stored_address(env: &Env, key: &DataKey) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(ContractError::NotInitialized)
}

pub fn registry(env: &Env) -> Result<Address, ContractError> {
    stored_address(env, &DataKey::Registry)
}

pub fn settlement_token(env: &Env) -> Result<Address, ContractError> {
    stored_address(env, &DataKey::SettlementToken)
}

pub fn oracle(env: &Env) -> Result<Address, ContractError> {
    stored_address(env, &DataKey::Oracle)
}

/// Accept `token` for payment, priced by oracle feed `feed_id`
pub fn set_token_feed(
    env: &Env,
    admin: Address,
    token: Address,
    feed_id: Symbol,
) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    if token == settlement_token(env)? {
        return Err(ContractError::InvalidConfig);
    }
    env.storage()
        .instance()
        .set(&DataKey::TokenFeed(token.clone()), &feed_id);

    env.events()
        .publish((Symbol::new(env, "token_feed_set"), token), feed_id);
    Ok(())
}

pub fn remove_token_feed(env: &Env, admin: Address, token: Address) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    env.storage()
        .instance()
        .remove(&DataKey::TokenFeed(token.clone()));

    env.events()
        .publish((Symbol::new(env, "token_feed_removed"), token), ());
    Ok(())
}

pub fn get_token_feed(env: &Env, token: &Address) -> Option<Symbol> {
    env.storage()
        .instance()
        .get(&DataKey::TokenFeed(token.clone()))
}

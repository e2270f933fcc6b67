use soroban_sdk::{Address, Env, Symbol};

use crate::error::ContractError;
use crate::types::{DataKey, Role};

const ROLE_TTL_THRESHOLD: u32 = 17_280;
const ROLE_TTL_EXTEND_TO: u32 = 518_400;

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(ContractError::NotInitialized)
}

pub fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    if get_admin(env)? != *caller {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Role membership check. The admin holds every role.
pub fn has_role(env: &Env, account: &Address, role: Role) -> bool {
    match get_admin(env) {
        Ok(admin) if admin == *account => true,
        _ => env
            .storage()
            .persistent()
            .get(&DataKey::Role(role, account.clone()))
            .unwrap_or(false),
    }
}

pub fn set_role(
    env: &Env,
    admin: Address,
    account: Address,
    role: Role,
    granted: bool,
) -> Result<(), ContractError> {
    require_admin(env, &admin)?;

    let key = DataKey::Role(role, account.clone());
    if granted {
        env.storage().persistent().set(&key, &true);
        env.storage()
            .persistent()
            .extend_ttl(&key, ROLE_TTL_THRESHOLD, ROLE_TTL_EXTEND_TO);
    } else {
        env.storage().persistent().remove(&key);
    }

    env.events().publish(
        (Symbol::new(env, "role_updated"), account),
        (role, granted),
    );
    Ok(())
}

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Paused).unwrap_or(false)
}

pub fn require_not_paused(env: &Env) -> Result<(), ContractError> {
    if is_paused(env) {
        return Err(ContractError::ContractPaused);
    }
    Ok(())
}

/// Pause or resume new sessions and reserve deposits
pub fn set_paused(env: &Env, admin: Address, paused: bool) -> Result<(), ContractError> {
    require_admin(env, &admin)?;
    env.storage().instance().set(&DataKey::Paused, &paused);

    let topic = if paused { "escrow_paused" } else { "escrow_unpaused" };
    env.events().publish((Symbol::new(env, topic),), admin);
    Ok(())
}

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

/// Authenticate `caller` and check it is the stored admin.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    if get_admin(env)? != *caller {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// The admin holds every role.
pub fn has_role(env: &Env, account: &Address, role: Role) -> bool {
    if let Ok(admin) = get_admin(env) {
        if admin == *account {
            return true;
        }
    }
    env.storage()
        .persistent()
        .get(&DataKey::Role(role, account.clone()))
        .unwrap_or(false)
}

pub fn require_role(env: &Env, caller: &Address, role: Role) -> Result<(), ContractError> {
    caller.require_auth();
    get_admin(env)?;
    if !has_role(env, caller, role) {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
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

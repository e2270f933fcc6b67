use booking_common::{OracleError, Price, PriceUpdate};
use soroban_sdk::{contracttype, Address, Env, Symbol, Vec};

const TTL_THRESHOLD: u32 = 17_280;
const TTL_EXTEND_TO: u32 = 518_400;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    Publisher(Address),
    Price(Symbol), // Keyed by feed id, e.g. "XLM_USD"
}

pub fn initialize(env: &Env, admin: Address) -> Result<(), OracleError> {
    if env.storage().instance().has(&DataKey::Admin) {
        return Err(OracleError::AlreadyInitialized);
    }
    admin.require_auth();
    env.storage().instance().set(&DataKey::Admin, &admin);

    env.events()
        .publish((Symbol::new(env, "oracle_initialized"),), admin);
    Ok(())
}

pub fn set_publisher(
    env: &Env,
    admin: Address,
    publisher: Address,
    enabled: bool,
) -> Result<(), OracleError> {
    admin.require_auth();
    let stored: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(OracleError::NotInitialized)?;
    if stored != admin {
        return Err(OracleError::Unauthorized);
    }

    let key = DataKey::Publisher(publisher.clone());
    if enabled {
        env.storage().persistent().set(&key, &true);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    } else {
        env.storage().persistent().remove(&key);
    }

    env.events().publish(
        (Symbol::new(env, "publisher_updated"), publisher),
        enabled,
    );
    Ok(())
}

pub fn is_publisher(env: &Env, address: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Publisher(address.clone()))
        .unwrap_or(false)
}

pub fn update_price_feeds(env: &Env, updates: Vec<PriceUpdate>) -> Result<(), OracleError> {
    if !env.storage().instance().has(&DataKey::Admin) {
        return Err(OracleError::NotInitialized);
    }

    let now = env.ledger().timestamp();
    let mut authorized: Vec<Address> = Vec::new(env);
    for update in updates.iter() {
        if !authorized.contains(&update.publisher) {
            update.publisher.require_auth();
            if !is_publisher(env, &update.publisher) {
                return Err(OracleError::UnknownPublisher);
            }
            env.storage().persistent().extend_ttl(
                &DataKey::Publisher(update.publisher.clone()),
                TTL_THRESHOLD,
                TTL_EXTEND_TO,
            );
            authorized.push_back(update.publisher.clone());
        }
        if update.price <= 0 || update.conf < 0 {
            return Err(OracleError::InvalidPrice);
        }
        if update.publish_time > now {
            return Err(OracleError::InvalidPublishTime);
        }

        // Only move a feed forward in time
        if let Some(current) = get_price(env, update.feed_id.clone()) {
            if update.publish_time <= current.publish_time {
                continue;
            }
        }

        let key = DataKey::Price(update.feed_id.clone());
        env.storage().persistent().set(&key, &update.to_price());
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

        env.events().publish(
            (Symbol::new(env, "price_updated"), update.feed_id.clone()),
            (update.price, update.conf, update.expo, update.publish_time),
        );
    }

    Ok(())
}

// Get the latest price for a feed, however old
pub fn get_price(env: &Env, feed_id: Symbol) -> Option<Price> {
    env.storage().persistent().get(&DataKey::Price(feed_id))
}

pub fn get_price_no_older_than(
    env: &Env,
    feed_id: Symbol,
    max_age: u64,
) -> Result<Price, OracleError> {
    let price = get_price(env, feed_id).ok_or(OracleError::PriceNotFound)?;
    let now = env.ledger().timestamp();
    if now.saturating_sub(price.publish_time) > max_age {
        return Err(OracleError::StalePrice);
    }
    Ok(price)
}

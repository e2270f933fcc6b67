#![no_std]

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec};

mod oracle;


pub use booking_common::{OracleError, Price, PriceUpdate};
pub use oracle::DataKey;

#[contract]
pub struct PriceOracle;

#[contractimpl]
impl PriceOracle {
    /// Initialize the oracle with the admin that manages publishers
    pub fn initialize(env: Env, admin: Address) -> Result<(), OracleError> {
        oracle::initialize(&env, admin)
    }

    pub fn add_publisher(env: Env, admin: Address, publisher: Address) -> Result<(), OracleError> {
        oracle::set_publisher(&env, admin, publisher, true)
    }

    pub fn remove_publisher(
        env: Env,
        admin: Address,
        publisher: Address,
    ) -> Result<(), OracleError> {
        oracle::set_publisher(&env, admin, publisher, false)
    }

    pub fn is_publisher(env: Env, address: Address) -> bool {
        oracle::is_publisher(&env, &address)
    }

    /// Push a batch of price observations. Stale observations are skipped.
    pub fn update_price_feeds(env: Env, updates: Vec<PriceUpdate>) -> Result<(), OracleError> {
        oracle::update_price_feeds(&env, updates)
    }

    pub fn get_price_unsafe(env: Env, feed_id: Symbol) -> Option<Price> {
        oracle::get_price(&env, feed_id)
    }

    pub fn get_price_no_older_than(
        env: Env,
        feed_id: Symbol,
        max_age: u64,
    ) -> Result<Price, OracleError> {
        oracle::get_price_no_older_than(&env, feed_id, max_age)
    }
}

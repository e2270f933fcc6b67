use soroban_sdk::{contractclient, Env, Symbol, Vec};

use booking_common::{Doctor, OracleError, Price, PriceUpdate};

/// The parts of the doctor registry the escrow reads.
#[contractclient(name = "RegistryClient")]
#[allow(dead_code)]
pub trait DoctorRegistryInterface {
    fn get_doctor(env: Env, doctor_id: u32) -> Option<Doctor>;
}

/// The parts of the price oracle the escrow uses.
#[contractclient(name = "OracleClient")]
#[allow(dead_code)]
pub trait PriceOracleInterface {
    fn update_price_feeds(env: Env, updates: Vec<PriceUpdate>) -> Result<(), OracleError>;
    fn get_price_unsafe(env: Env, feed_id: Symbol) -> Option<Price>;
}

#![no_std]

//! Values that cross contract boundaries between the doctor registry, the
//! consultation escrow and the price oracle.

use soroban_sdk::{contracterror, contracttype, Address, BytesN, String, Symbol};

/// An approved doctor, as served by the registry to the escrow and to the
/// booking front-end.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Doctor {
    pub doctor_id: u32,
    pub registration_id: u32,
    pub full_name: String,
    pub specialization: String,
    pub profile_description: String,
    pub email: String,
    pub doctor_address: Address,
    pub payment_wallet: Address,
    /// Settlement-currency units per hour (6 decimals for PYUSD).
    pub consultation_fee_per_hour: i128,
    pub deposit_fee_stored: i128,
    pub legal_documents_hash: BytesN<32>,
    pub approved_at: u64,
}

/// A price observation. The real value is `price * 10^expo`, with the same
/// scaling applied to `conf`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Price {
    pub price: i128,
    pub conf: i128,
    pub expo: i32,
    pub publish_time: u64,
}

/// A publisher-signed observation pushed into the oracle, either directly or
/// bundled with a session creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceUpdate {
    pub feed_id: Symbol,
    pub publisher: Address,
    pub price: i128,
    pub conf: i128,
    pub expo: i32,
    pub publish_time: u64,
}

impl PriceUpdate {
    pub fn to_price(&self) -> Price {
        Price {
            price: self.price,
            conf: self.conf,
            expo: self.expo,
            publish_time: self.publish_time,
        }
    }
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum OracleError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    UnknownPublisher = 4,
    InvalidPrice = 5,
    InvalidPublishTime = 6,
    PriceNotFound = 7,
    StalePrice = 8,
}

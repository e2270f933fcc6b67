#![no_std]

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Symbol, Vec};

mod access;
mod config;
mod conversion;
mod error;
mod events;
mod interfaces;
mod release;
mod reserve;
mod session;
mod types;
mod verification;

#[cfg(test)]
mod tests; // session, verification, release, refund, conversion and reserve scenarios

pub use booking_common::PriceUpdate;
pub use error::ContractError;
pub use events::{
    MeetingVerifiedEvent, PaymentReleasedEvent, SessionCreatedEvent, SessionRefundedEvent,
};
pub use types::{
    EscrowConfig, ExpiryPolicy, MeetingVerification, Party, Role, Session, SessionStatus,
};

#[contract]
pub struct ConsultationEscrow;

#[contractimpl]
impl ConsultationEscrow {
    /// Initialize the escrow with the doctor registry, the settlement token and
    /// the price oracle
    pub fn initialize(
        env: Env,
        admin: Address,
        registry: Address,
        settlement_token: Address,
        oracle: Address,
        config: EscrowConfig,
    ) -> Result<(), ContractError> {
        config::initialize(&env, admin, registry, settlement_token, oracle, config)
    }

    /// Create a session for an approved doctor. The patient must have approved
    /// the escrow for `payment_amount` of `payment_token`. Payments in other
    /// tokens are converted with the bundled `price_updates`.
    pub fn create_session(
        env: Env,
        patient: Address,
        doctor_id: u32,
        payment_amount: i128,
        price_updates: Vec<PriceUpdate>,
        payment_token: Address,
        start_time: u64,
    ) -> Result<u64, ContractError> {
        session::create_session(
            &env,
            patient,
            doctor_id,
            payment_amount,
            price_updates,
            payment_token,
            start_time,
        )
    }

    /// Top up the settlement reserve
    pub fn deposit_pyusd_reserve(
        env: Env,
        operator: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        reserve::deposit_pyusd_reserve(&env, operator, amount)
    }

    pub fn withdraw_reserve(
        env: Env,
        admin: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        reserve::withdraw_reserve(&env, admin, to, amount)
    }

    pub fn withdraw_collected(
        env: Env,
        admin: Address,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        reserve::withdraw_collected(&env, admin, token, to, amount)
    }

    /// Confirm or revoke attendance for one party of a session
    pub fn set_verified(
        env: Env,
        session_id: u64,
        caller: Address,
        party: Party,
        verified: bool,
    ) -> Result<MeetingVerification, ContractError> {
        verification::set_verified(&env, session_id, caller, party, verified)
    }

    pub fn get_verification_status(
        env: Env,
        session_id: u64,
    ) -> Result<MeetingVerification, ContractError> {
        verification::get_verification_status(&env, session_id)
    }

    /// Release the settlement amount to the doctor once both parties verified
    pub fn release_payment(
        env: Env,
        caller: Address,
        session_id: u64,
        prescription_hash: BytesN<32>,
    ) -> Result<i128, ContractError> {
        release::release_payment(&env, caller, session_id, prescription_hash)
    }

    /// Refund the patient's original payment
    pub fn refund_session(
        env: Env,
        caller: Address,
        session_id: u64,
    ) -> Result<i128, ContractError> {
        release::refund_session(&env, caller, session_id)
    }

    /// Settle an Active session after its resolution window has passed
    pub fn resolve_expired_session(
        env: Env,
        caller: Address,
        session_id: u64,
    ) -> Result<SessionStatus, ContractError> {
        release::resolve_expired_session(&env, caller, session_id)
    }

    pub fn set_token_feed(
        env: Env,
        admin: Address,
        token: Address,
        feed_id: Symbol,
    ) -> Result<(), ContractError> {
        config::set_token_feed(&env, admin, token, feed_id)
    }

    pub fn remove_token_feed(
        env: Env,
        admin: Address,
        token: Address,
    ) -> Result<(), ContractError> {
        config::remove_token_feed(&env, admin, token)
    }

    pub fn update_config(
        env: Env,
        admin: Address,
        config: EscrowConfig,
    ) -> Result<(), ContractError> {
        config::update_config(&env, admin, config)
    }

    pub fn grant_role(
        env: Env,
        admin: Address,
        account: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        access::set_role(&env, admin, account, role, true)
    }

    pub fn revoke_role(
        env: Env,
        admin: Address,
        account: Address,
        role: Role,
    ) -> Result<(), ContractError> {
        access::set_role(&env, admin, account, role, false)
    }

    /// Stop new sessions and reserve deposits. Settlement stays open.
    pub fn pause(env: Env, admin: Address) -> Result<(), ContractError> {
        access::set_paused(&env, admin, true)
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), ContractError> {
        access::set_paused(&env, admin, false)
    }

    pub fn get_session(env: Env, session_id: u64) -> Option<Session> {
        session::load_session(&env, session_id).ok()
    }

    pub fn num_sessions(env: Env) -> u64 {
        session::num_sessions(&env)
    }

    pub fn pyusd_reserve_balance(env: Env) -> i128 {
        reserve::reserve(&env)
    }

    pub fn locked_balance(env: Env) -> i128 {
        reserve::locked(&env)
    }

    pub fn available_reserve(env: Env) -> i128 {
        reserve::available(&env)
    }

    pub fn collected_balance(env: Env, token: Address) -> i128 {
        reserve::collected(&env, &token)
    }

    pub fn get_config(env: Env) -> Result<EscrowConfig, ContractError> {
        config::get_config(&env)
    }

    pub fn get_token_feed(env: Env, token: Address) -> Option<Symbol> {
        config::get_token_feed(&env, &token)
    }

    pub fn get_patient_sessions(env: Env, patient: Address) -> Vec<u64> {
        session::patient_sessions(&env, patient)
    }

    pub fn get_doctor_sessions(env: Env, doctor_id: u32) -> Vec<u64> {
        session::doctor_sessions(&env, doctor_id)
    }

    pub fn is_paused(env: Env) -> bool {
        access::is_paused(&env)
    }

    pub fn has_role(env: Env, account: Address, role: Role) -> bool {
        access::has_role(&env, &account, role)
    }

    /// Preview the settlement amount for a payment using stored prices only
    pub fn quote_settlement_amount(
        env: Env,
        token: Address,
        amount: i128,
    ) -> Result<i128, ContractError> {
        conversion::quote(&env, &token, amount)
    }
}

#![no_std]

use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

mod access;
mod directory;
mod error;
mod fees;
mod registration;
mod types;
mod utils;

#[cfg(test)]
mod tests; // registration, approval, fee and directory scenarios

pub use booking_common::Doctor;
pub use error::ContractError;
pub use types::{DepositPolicy, DoctorProfile, DoctorRegistration, RegistrationStatus, Role};

#[contract]
pub struct DoctorRegistry;

#[contractimpl]
impl DoctorRegistry {
    /// Initialize the registry with its stablecoin and fee schedule
    pub fn initialize(
        env: Env,
        admin: Address,
        stablecoin: Address,
        deposit_fee: i128,
        stake_amount: i128,
    ) -> Result<(), ContractError> {
        fees::initialize(&env, admin, stablecoin, deposit_fee, stake_amount)
    }

    /// Register as a doctor. The caller must have approved the registry for
    /// `deposit_fee + stake_amount` of the stablecoin.
    pub fn register_as_doctor(
        env: Env,
        doctor: Address,
        profile: DoctorProfile,
        consultation_fee_per_hour: i128,
    ) -> Result<u32, ContractError> {
        registration::register_as_doctor(&env, doctor, profile, consultation_fee_per_hour)
    }

    /// Approve a pending registration, returning the new doctor id
    pub fn approve_doctor(
        env: Env,
        approver: Address,
        registration_id: u32,
    ) -> Result<u32, ContractError> {
        registration::approve_doctor(&env, approver, registration_id)
    }

    /// Deny a pending registration
    pub fn deny_doctor(
        env: Env,
        approver: Address,
        registration_id: u32,
    ) -> Result<(), ContractError> {
        registration::deny_doctor(&env, approver, registration_id)
    }

    pub fn change_deposit_fee(env: Env, admin: Address, fee: i128) -> Result<(), ContractError> {
        fees::change_deposit_fee(&env, admin, fee)
    }

    pub fn change_stake_amount(
        env: Env,
        admin: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        fees::change_stake_amount(&env, admin, amount)
    }

    pub fn set_deposit_policy(
        env: Env,
        admin: Address,
        policy: DepositPolicy,
    ) -> Result<(), ContractError> {
        fees::set_deposit_policy(&env, admin, policy)
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

    pub fn has_role(env: Env, account: Address, role: Role) -> bool {
        access::has_role(&env, &account, role)
    }

    /// Set the wallet that receives consultation payouts
    pub fn set_payment_wallet(
        env: Env,
        doctor: Address,
        wallet: Address,
    ) -> Result<(), ContractError> {
        registration::set_payment_wallet(&env, doctor, wallet)
    }

    pub fn update_consultation_fee(
        env: Env,
        doctor: Address,
        consultation_fee_per_hour: i128,
    ) -> Result<(), ContractError> {
        registration::update_consultation_fee(&env, doctor, consultation_fee_per_hour)
    }

    /// Withdraw retained deposit fees
    pub fn withdraw_fees(
        env: Env,
        admin: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        fees::withdraw_fees(&env, admin, to, amount)
    }

    pub fn get_doctor_id(env: Env, address: Address) -> u32 {
        directory::get_doctor_id(&env, address)
    }

    pub fn doc_to_registration_id(env: Env, address: Address) -> u32 {
        directory::doc_to_registration_id(&env, address)
    }

    pub fn get_pending_doctor_info_by_id(
        env: Env,
        registration_id: u32,
    ) -> Option<DoctorRegistration> {
        registration::load_registration(&env, registration_id)
    }

    pub fn get_doctor(env: Env, doctor_id: u32) -> Option<Doctor> {
        registration::load_doctor(&env, doctor_id)
    }

    pub fn num_doctors(env: Env) -> u32 {
        directory::num_doctors(&env)
    }

    pub fn num_registrations(env: Env) -> u32 {
        directory::num_registrations(&env)
    }

    /// Find approved doctors whose specialization matches `query`
    pub fn find_doctors_by_specialization(
        env: Env,
        query: String,
        max_results: u32,
    ) -> Vec<Doctor> {
        directory::find_doctors_by_specialization(&env, query, max_results)
    }

    pub fn deposit_fee(env: Env) -> i128 {
        fees::deposit_fee(&env)
    }

    pub fn stake_amount(env: Env) -> i128 {
        fees::stake_amount(&env)
    }

    pub fn deposit_policy(env: Env) -> DepositPolicy {
        fees::deposit_policy(&env)
    }

    /// Registration funds still awaiting a decision
    pub fn held_funds(env: Env) -> i128 {
        fees::held_funds(&env)
    }

    pub fn retained_fees(env: Env) -> i128 {
        fees::retained_fees(&env)
    }

    pub fn admin(env: Env) -> Result<Address, ContractError> {
        access::get_admin(&env)
    }
}

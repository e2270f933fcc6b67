use soroban_sdk::{Address, Env, Symbol};

use booking_common::Doctor;

use crate::access::require_role;
use crate::error::ContractError;
use crate::fees;
use crate::types::{DataKey, DoctorProfile, DoctorRegistration, RegistrationStatus, Role};
use crate::utils::{validate_fee, validate_profile};

const RECORD_TTL_THRESHOLD: u32 = 17_280;
const RECORD_TTL_EXTEND_TO: u32 = 518_400;

fn next_id(env: &Env, key: &DataKey) -> u32 {
    let next = env.storage().instance().get::<_, u32>(key).unwrap_or(0) + 1;
    env.storage().instance().set(key, &next);
    next
}

fn save_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, RECORD_TTL_THRESHOLD, RECORD_TTL_EXTEND_TO);
}

pub fn load_registration(env: &Env, registration_id: u32) -> Option<DoctorRegistration> {
    env.storage()
        .persistent()
        .get(&DataKey::Registration(registration_id))
}

/// Register the caller as a pending doctor, pulling deposit fee and stake
pub fn register_as_doctor(
    env: &Env,
    doctor: Address,
    profile: DoctorProfile,
    consultation_fee_per_hour: i128,
) -> Result<u32, ContractError> {
    doctor.require_auth();
    fees::stablecoin(env)?;

    let key = DataKey::RegistrationOf(doctor.clone());
    if env.storage().persistent().has(&key) {
        return Err(ContractError::AlreadyRegistered);
    }
    validate_profile(&profile)?;
    validate_fee(consultation_fee_per_hour)?;

    let deposit_fee = fees::deposit_fee(env);
    let stake_amount = fees::stake_amount(env);
    fees::pull_funds(env, &doctor, deposit_fee + stake_amount)?;

    let registration_id = next_id(env, &DataKey::RegistrationCount);
    let registration = DoctorRegistration {
        registration_id,
        full_name: profile.full_name,
        specialization: profile.specialization,
        profile_description: profile.profile_description,
        email: profile.email,
        consultation_fee_per_hour,
        legal_documents_hash: profile.legal_documents_hash,
        doctor_address: doctor.clone(),
        deposit_paid: deposit_fee,
        stake_paid: stake_amount,
        status: RegistrationStatus::Pending,
        registered_at: env.ledger().timestamp(),
        decided_at: None,
    };
    save_persistent(env, &DataKey::Registration(registration_id), &registration);
    save_persistent(env, &key, &registration_id);

    env.events().publish(
        (Symbol::new(env, "doctor_registered"), doctor),
        (registration_id, deposit_fee, stake_amount),
    );
    Ok(registration_id)
}

fn load_pending(env: &Env, registration_id: u32) -> Result<DoctorRegistration, ContractError> {
    let registration =
        load_registration(env, registration_id).ok_or(ContractError::RegistrationNotFound)?;
    if registration.status != RegistrationStatus::Pending {
        return Err(ContractError::NotPending);
    }
    Ok(registration)
}

/// Approve a pending registration and publish the doctor record
pub fn approve_doctor(
    env: &Env,
    approver: Address,
    registration_id: u32,
) -> Result<u32, ContractError> {
    require_role(env, &approver, Role::Approver)?;
    let mut registration = load_pending(env, registration_id)?;

    let now = env.ledger().timestamp();
    registration.status = RegistrationStatus::Approved;
    registration.decided_at = Some(now);

    let doctor_id = next_id(env, &DataKey::DoctorCount);
    let (refund, retained) = fees::deposit_policy(env).settle(&registration, true);
    let doctor = Doctor {
        doctor_id,
        registration_id,
        full_name: registration.full_name.clone(),
        specialization: registration.specialization.clone(),
        profile_description: registration.profile_description.clone(),
        email: registration.email.clone(),
        doctor_address: registration.doctor_address.clone(),
        payment_wallet: registration.doctor_address.clone(),
        consultation_fee_per_hour: registration.consultation_fee_per_hour,
        deposit_fee_stored: retained,
        legal_documents_hash: registration.legal_documents_hash.clone(),
        approved_at: now,
    };

    save_persistent(env, &DataKey::Registration(registration_id), &registration);
    save_persistent(env, &DataKey::Doctor(doctor_id), &doctor);
    save_persistent(
        env,
        &DataKey::DoctorOf(registration.doctor_address.clone()),
        &doctor_id,
    );
    fees::settle_held_funds(env, &registration.doctor_address, refund, retained)?;

    env.events().publish(
        (Symbol::new(env, "doctor_approved"), registration.doctor_address),
        (registration_id, doctor_id, refund, retained),
    );
    Ok(doctor_id)
}

pub fn deny_doctor(
    env: &Env,
    approver: Address,
    registration_id: u32,
) -> Result<(), ContractError> {
    require_role(env, &approver, Role::Approver)?;
    let mut registration = load_pending(env, registration_id)?;

    registration.status = RegistrationStatus::Denied;
    registration.decided_at = Some(env.ledger().timestamp());
    let (refund, retained) = fees::deposit_policy(env).settle(&registration, false);

    save_persistent(env, &DataKey::Registration(registration_id), &registration);
    fees::settle_held_funds(env, &registration.doctor_address, refund, retained)?;

    env.events().publish(
        (Symbol::new(env, "doctor_denied"), registration.doctor_address),
        (registration_id, refund, retained),
    );
    Ok(())
}

pub fn load_doctor(env: &Env, doctor_id: u32) -> Option<Doctor> {
    env.storage().persistent().get(&DataKey::Doctor(doctor_id))
}

fn load_own_doctor(env: &Env, doctor: &Address) -> Result<Doctor, ContractError> {
    let doctor_id: u32 = env
        .storage()
        .persistent()
        .get(&DataKey::DoctorOf(doctor.clone()))
        .ok_or(ContractError::DoctorNotFound)?;
    load_doctor(env, doctor_id).ok_or(ContractError::DoctorNotFound)
}

/// Point future payouts at a different wallet
pub fn set_payment_wallet(
    env: &Env,
    doctor: Address,
    wallet: Address,
) -> Result<(), ContractError> {
    doctor.require_auth();
    let mut record = load_own_doctor(env, &doctor)?;
    record.payment_wallet = wallet.clone();
    save_persistent(env, &DataKey::Doctor(record.doctor_id), &record);

    env.events()
        .publish((Symbol::new(env, "payment_wallet_set"), doctor), wallet);
    Ok(())
}

pub fn update_consultation_fee(
    env: &Env,
    doctor: Address,
    consultation_fee_per_hour: i128,
) -> Result<(), ContractError> {
    doctor.require_auth();
    validate_fee(consultation_fee_per_hour)?;
    let mut record = load_own_doctor(env, &doctor)?;
    record.consultation_fee_per_hour = consultation_fee_per_hour;
    save_persistent(env, &DataKey::Doctor(record.doctor_id), &record);

    env.events().publish(
        (Symbol::new(env, "consultation_fee_set"), doctor),
        consultation_fee_per_hour,
    );
    Ok(())
}

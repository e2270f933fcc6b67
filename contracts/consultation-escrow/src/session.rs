use soroban_sdk::{Address, Env, Vec};

use booking_common::PriceUpdate;

use crate::access::require_not_paused;
use crate::config::registry;
use crate::conversion::quote_with_updates;
use crate::error::ContractError;
use crate::events::{emit_session_created, SessionCreatedEvent};
use crate::interfaces::RegistryClient;
use crate::reserve;
use crate::types::{DataKey, MeetingVerification, Session, SessionStatus};

const SESSION_TTL_THRESHOLD: u32 = 17_280;
const SESSION_TTL_EXTEND_TO: u32 = 518_400;

pub fn load_session(env: &Env, session_id: u64) -> Result<Session, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Session(session_id))
        .ok_or(ContractError::SessionNotFound)
}

pub fn save_session(env: &Env, session: &Session) {
    let key = DataKey::Session(session.session_id);
    env.storage().persistent().set(&key, session);
    env.storage()
        .persistent()
        .extend_ttl(&key, SESSION_TTL_THRESHOLD, SESSION_TTL_EXTEND_TO);
}

pub fn load_verification(env: &Env, session_id: u64) -> Result<MeetingVerification, ContractError> {
    env.storage()
        .persistent()
        .get(&DataKey::Verification(session_id))
        .ok_or(ContractError::SessionNotFound)
}

pub fn save_verification(env: &Env, session_id: u64, verification: &MeetingVerification) {
    let key = DataKey::Verification(session_id);
    env.storage().persistent().set(&key, verification);
    env.storage()
        .persistent()
        .extend_ttl(&key, SESSION_TTL_THRESHOLD, SESSION_TTL_EXTEND_TO);
}

pub fn num_sessions(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::SessionCount).unwrap_or(0)
}

fn append_index(env: &Env, key: DataKey, session_id: u64) {
    let mut ids: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or(Vec::new(env));
    ids.push_back(session_id);
    env.storage().persistent().set(&key, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&key, SESSION_TTL_THRESHOLD, SESSION_TTL_EXTEND_TO);
}

pub fn patient_sessions(env: &Env, patient: Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::PatientSessions(patient))
        .unwrap_or(Vec::new(env))
}

pub fn doctor_sessions(env: &Env, doctor_id: u32) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::DoctorSessions(doctor_id))
        .unwrap_or(Vec::new(env))
}

/// Book a consultation: lock the patient's payment against an approved doctor
pub fn create_session(
    env: &Env,
    patient: Address,
    doctor_id: u32,
    payment_amount: i128,
    price_updates: Vec<PriceUpdate>,
    payment_token: Address,
    start_time: u64,
) -> Result<u64, ContractError> {
    patient.require_auth();
    let registry = RegistryClient::new(env, &registry(env)?);
    require_not_paused(env)?;

    if payment_amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let now = env.ledger().timestamp();
    if start_time < now {
        return Err(ContractError::InvalidStartTime);
    }

    let doctor = registry
        .get_doctor(&doctor_id)
        .ok_or(ContractError::DoctorNotApproved)?;

    let pyusd_amount = quote_with_updates(env, &payment_token, payment_amount, price_updates)?;
    reserve::credit_session(env, &payment_token, payment_amount, pyusd_amount)?;
    reserve::pull(env, &payment_token, &patient, payment_amount)?;

    let session_id = num_sessions(env) + 1;
    env.storage().instance().set(&DataKey::SessionCount, &session_id);

    let session = Session {
        session_id,
        doctor_id,
        doctor: doctor.doctor_address,
        patient: patient.clone(),
        payment_token: payment_token.clone(),
        payment_amount,
        pyusd_amount,
        status: SessionStatus::Active,
        created_at: now,
        start_time,
        prescription_hash: None,
        settled_at: None,
    };
    save_session(env, &session);
    save_verification(env, session_id, &MeetingVerification::empty());
    append_index(env, DataKey::PatientSessions(patient.clone()), session_id);
    append_index(env, DataKey::DoctorSessions(doctor_id), session_id);

    emit_session_created(
        env,
        SessionCreatedEvent {
            session_id,
            doctor_id,
            patient,
            payment_token,
            payment_amount,
            pyusd_amount,
            start_time,
        },
    );
    Ok(session_id)
}

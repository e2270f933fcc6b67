use soroban_sdk::{contracttype, Address, BytesN, Env, Symbol};

use crate::types::{Party, SessionStatus};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionCreatedEvent {
    pub session_id: u64,
    pub doctor_id: u32,
    pub patient: Address,
    pub payment_token: Address,
    pub payment_amount: i128,
    pub pyusd_amount: i128,
    pub start_time: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerificationUpdatedEvent {
    pub session_id: u64,
    pub party: Party,
    pub verified: bool,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MeetingVerifiedEvent {
    pub session_id: u64,
    pub doctor_verification_time: u64,
    pub patient_verification_time: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentReleasedEvent {
    pub session_id: u64,
    pub doctor_id: u32,
    pub wallet: Address,
    pub pyusd_amount: i128,
    pub prescription_hash: Option<BytesN<32>>,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionRefundedEvent {
    pub session_id: u64,
    pub patient: Address,
    pub token: Address,
    pub amount: i128,
    pub refunded_by: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionExpiredEvent {
    pub session_id: u64,
    pub outcome: SessionStatus,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveChangedEvent {
    pub operator: Address,
    pub amount: i128,
    pub reserve: i128,
    pub locked: i128,
}

pub fn emit_session_created(env: &Env, event: SessionCreatedEvent) {
    env.events()
        .publish((Symbol::new(env, "session_created"), event.session_id), event);
}

pub fn emit_verification_updated(env: &Env, session_id: u64, party: Party, verified: bool) {
    let event = VerificationUpdatedEvent {
        session_id,
        party,
        verified,
        timestamp: env.ledger().timestamp(),
    };
    env.events()
        .publish((Symbol::new(env, "verification_updated"), session_id), event);
}

/// Published once per session, when the second party confirms attendance.
pub fn emit_meeting_verified(
    env: &Env,
    session_id: u64,
    doctor_verification_time: u64,
    patient_verification_time: u64,
) {
    let event = MeetingVerifiedEvent {
        session_id,
        doctor_verification_time,
        patient_verification_time,
    };
    env.events()
        .publish((Symbol::new(env, "verified"), session_id), event);
}

pub fn emit_payment_released(
    env: &Env,
    session_id: u64,
    doctor_id: u32,
    wallet: Address,
    pyusd_amount: i128,
    prescription_hash: Option<BytesN<32>>,
) {
    let event = PaymentReleasedEvent {
        session_id,
        doctor_id,
        wallet,
        pyusd_amount,
        prescription_hash,
        timestamp: env.ledger().timestamp(),
    };
    env.events()
        .publish((Symbol::new(env, "payment_released"), session_id), event);
}

pub fn emit_session_refunded(
    env: &Env,
    session_id: u64,
    patient: Address,
    token: Address,
    amount: i128,
    refunded_by: Address,
) {
    let event = SessionRefundedEvent {
        session_id,
        patient,
        token,
        amount,
        refunded_by,
        timestamp: env.ledger().timestamp(),
    };
    env.events()
        .publish((Symbol::new(env, "session_refunded"), session_id), event);
}

pub fn emit_session_expired(env: &Env, session_id: u64, outcome: SessionStatus) {
    let event = SessionExpiredEvent {
        session_id,
        outcome,
        timestamp: env.ledger().timestamp(),
    };
    env.events()
        .publish((Symbol::new(env, "session_expired"), session_id), event);
}

pub fn emit_reserve_changed(
    env: &Env,
    name: &str,
    operator: Address,
    amount: i128,
    reserve: i128,
    locked: i128,
) {
    let event = ReserveChangedEvent {
        operator,
        amount,
        reserve,
        locked,
    };
    env.events().publish((Symbol::new(env, name),), event);
}

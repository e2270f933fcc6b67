use soroban_sdk::{Address, BytesN, Env};

use crate::access::has_role;
use crate::config::{get_config, registry};
use crate::error::ContractError;
use crate::events::{emit_payment_released, emit_session_expired, emit_session_refunded};
use crate::interfaces::RegistryClient;
use crate::reserve;
use crate::session::{load_session, load_verification, save_session};
use crate::types::{ExpiryPolicy, Role, Session, SessionStatus};

fn require_active(session: &Session) -> Result<(), ContractError> {
    match session.status {
        SessionStatus::Active => Ok(()),
        SessionStatus::Completed => Err(ContractError::AlreadyReleased),
        SessionStatus::Refunded => Err(ContractError::SessionNotActive),
    }
}

/// Pay the doctor's current wallet and close the session.
fn settle_release(
    env: &Env,
    mut session: Session,
    prescription_hash: Option<BytesN<32>>,
) -> Result<i128, ContractError> {
    let registry = RegistryClient::new(env, &registry(env)?);
    let wallet = registry
        .get_doctor(&session.doctor_id)
        .map(|doctor| doctor.payment_wallet)
        .unwrap_or(session.doctor.clone());

    session.status = SessionStatus::Completed;
    session.prescription_hash = prescription_hash.clone();
    session.settled_at = Some(env.ledger().timestamp());
    save_session(env, &session);

    reserve::debit_release(env, &wallet, session.pyusd_amount)?;
    emit_payment_released(
        env,
        session.session_id,
        session.doctor_id,
        wallet,
        session.pyusd_amount,
        prescription_hash,
    );
    Ok(session.pyusd_amount)
}

/// Refund the patient and close the session.
fn settle_refund(
    env: &Env,
    mut session: Session,
    refunded_by: Address,
) -> Result<i128, ContractError> {
    session.status = SessionStatus::Refunded;
    session.settled_at = Some(env.ledger().timestamp());
    save_session(env, &session);

    let (token, amount) = reserve::debit_refund(
        env,
        &session.patient,
        &session.payment_token,
        session.payment_amount,
        session.pyusd_amount,
    )?;
    emit_session_refunded(
        env,
        session.session_id,
        session.patient.clone(),
        token,
        amount,
        refunded_by,
    );
    Ok(amount)
}

/// Release a verified session's payment to the doctor
pub fn release_payment(
    env: &Env,
    caller: Address,
    session_id: u64,
    prescription_hash: BytesN<32>,
) -> Result<i128, ContractError> {
    caller.require_auth();
    let session = load_session(env, session_id)?;
    if caller != session.doctor && !has_role(env, &caller, Role::Releaser) {
        return Err(ContractError::Unauthorized);
    }
    require_active(&session)?;

    // Read in the same invocation that moves the funds
    if !load_verification(env, session_id)?.is_complete() {
        return Err(ContractError::VerificationIncomplete);
    }

    settle_release(env, session, Some(prescription_hash))
}

/// Cancel a session and refund the patient.
///
/// The patient may cancel only before `start_time` and while the doctor has
/// not confirmed attendance. The doctor and arbiters may cancel any Active
/// session.
pub fn refund_session(env: &Env, caller: Address, session_id: u64) -> Result<i128, ContractError> {
    caller.require_auth();
    let session = load_session(env, session_id)?;

    let is_patient = caller == session.patient;
    let privileged = caller == session.doctor || has_role(env, &caller, Role::Arbiter);
    if !is_patient && !privileged {
        return Err(ContractError::Unauthorized);
    }
    require_active(&session)?;

    if !privileged {
        let doctor_verified = load_verification(env, session_id)?.doctor_verified;
        if env.ledger().timestamp() >= session.start_time || doctor_verified {
            return Err(ContractError::RefundWindowClosed);
        }
    }

    settle_refund(env, session, caller)
}

/// Settle a session whose verification did not complete in time
pub fn resolve_expired_session(
    env: &Env,
    caller: Address,
    session_id: u64,
) -> Result<SessionStatus, ContractError> {
    caller.require_auth();
    let session = load_session(env, session_id)?;
    require_active(&session)?;

    let config = get_config(env)?;
    let deadline = session.start_time.saturating_add(config.resolution_window);
    if env.ledger().timestamp() < deadline {
        return Err(ContractError::ResolutionWindowOpen);
    }

    let verification = load_verification(env, session_id)?;
    let release = verification.is_complete()
        || (config.expiry_policy == ExpiryPolicy::ReleaseIfDoctorVerified
            && verification.doctor_verified);

    let outcome = if release {
        settle_release(env, session, None)?;
        SessionStatus::Completed
    } else {
        settle_refund(env, session, caller)?;
        SessionStatus::Refunded
    };
    emit_session_expired(env, session_id, outcome);
    Ok(outcome)
}

use soroban_sdk::{Address, Env};

use crate::error::ContractError;
use crate::events::{emit_meeting_verified, emit_verification_updated};
use crate::session::{load_session, load_verification, save_verification};
use crate::types::{MeetingVerification, Party, SessionStatus};

/// Set or clear the caller's attendance flag. Flags can be revoked until both
/// parties have confirmed; after that the record is locked.
pub fn set_verified(
    env: &Env,
    session_id: u64,
    caller: Address,
    party: Party,
    verified: bool,
) -> Result<MeetingVerification, ContractError> {
    caller.require_auth();
    let session = load_session(env, session_id)?;

    let expected = match party {
        Party::Doctor => &session.doctor,
        Party::Patient => &session.patient,
    };
    if caller != *expected {
        return Err(ContractError::Unauthorized);
    }
    if session.status != SessionStatus::Active {
        return Err(ContractError::SessionNotActive);
    }

    let mut record = load_verification(env, session_id)?;
    if record.is_complete() {
        return Err(ContractError::VerificationLocked);
    }

    let now = env.ledger().timestamp();
    let (flag, time) = match party {
        Party::Doctor => (
            &mut record.doctor_verified,
            &mut record.doctor_verification_time,
        ),
        Party::Patient => (
            &mut record.patient_verified,
            &mut record.patient_verification_time,
        ),
    };
    if *flag == verified {
        // Re-confirming keeps the original timestamp
        return Ok(record);
    }
    *flag = verified;
    *time = if verified { Some(now) } else { None };

    save_verification(env, session_id, &record);
    emit_verification_updated(env, session_id, party, verified);

    if let (Some(doctor_time), Some(patient_time)) = (
        record.doctor_verification_time,
        record.patient_verification_time,
    ) {
        emit_meeting_verified(env, session_id, doctor_time, patient_time);
    }
    Ok(record)
}

pub fn get_verification_status(
    env: &Env,
    session_id: u64,
) -> Result<MeetingVerification, ContractError> {
    load_verification(env, session_id)
}

use soroban_sdk::{BytesN, String};

use crate::error::ContractError;
use crate::types::DoctorProfile;

const MIN_NAME_LEN: u32 = 2;
const MAX_NAME_LEN: u32 = 100;
const MIN_SPECIALIZATION_LEN: u32 = 2;
const MAX_SPECIALIZATION_LEN: u32 = 50;
const MAX_DESCRIPTION_LEN: u32 = 1_000;
const MIN_EMAIL_LEN: u32 = 3;
const MAX_EMAIL_LEN: u32 = 100;

fn len_within(value: &String, min: u32, max: u32) -> bool {
    value.len() >= min && value.len() <= max
}

fn is_zero_hash(hash: &BytesN<32>) -> bool {
    hash.to_array() == [0u8; 32]
}

/// Validate the submitted profile fields
pub fn validate_profile(profile: &DoctorProfile) -> Result<(), ContractError> {
    if !len_within(&profile.full_name, MIN_NAME_LEN, MAX_NAME_LEN) {
        return Err(ContractError::InvalidProfile);
    }
    if !len_within(
        &profile.specialization,
        MIN_SPECIALIZATION_LEN,
        MAX_SPECIALIZATION_LEN,
    ) {
        return Err(ContractError::InvalidProfile);
    }
    if profile.profile_description.len() > MAX_DESCRIPTION_LEN {
        return Err(ContractError::InvalidProfile);
    }
    if !len_within(&profile.email, MIN_EMAIL_LEN, MAX_EMAIL_LEN) {
        return Err(ContractError::InvalidProfile);
    }
    // Legal documents are referenced by content hash only
    if is_zero_hash(&profile.legal_documents_hash) {
        return Err(ContractError::InvalidProfile);
    }
    Ok(())
}

pub fn validate_fee(consultation_fee_per_hour: i128) -> Result<(), ContractError> {
    if consultation_fee_per_hour <= 0 {
        return Err(ContractError::InvalidFee);
    }
    Ok(())
}

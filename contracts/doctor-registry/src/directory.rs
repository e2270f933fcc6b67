use soroban_sdk::{Address, Env, String, Vec};

use booking_common::Doctor;

use crate::registration::load_doctor;
use crate::types::DataKey;

const MAX_QUERY_LEN: usize = 128;

// Specialty names a patient may ask for, and terms doctors commonly list instead
const SPECIALTY_VARIATIONS: &[(&[u8], &[&[u8]])] = &[
    (b"cardiology", &[b"cardiologist", b"cardiac", b"heart"]),
    (b"neurology", &[b"neurologist", b"neuro", b"brain"]),
    (b"dermatology", &[b"dermatologist", b"derm", b"skin"]),
];

pub fn num_doctors(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::DoctorCount).unwrap_or(0)
}

pub fn num_registrations(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::RegistrationCount)
        .unwrap_or(0)
}

/// Approved doctor id for an address, 0 when the address is not an approved doctor.
pub fn get_doctor_id(env: &Env, address: Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::DoctorOf(address))
        .unwrap_or(0)
}

/// Registration id for an address, 0 when it never registered.
pub fn doc_to_registration_id(env: &Env, address: Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::RegistrationOf(address))
        .unwrap_or(0)
}

fn lowercase_bytes(value: &String, buf: &mut [u8; MAX_QUERY_LEN]) -> Option<usize> {
    let len = value.len() as usize;
    if len > MAX_QUERY_LEN {
        return None;
    }
    value.copy_into_slice(&mut buf[..len]);
    buf[..len].make_ascii_lowercase();
    Some(len)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Case-insensitive match where either side may be a substring of the other,
/// so "cardio" finds "Cardiology" and "Pediatric Surgery" finds "Surgery".
/// A few specialty names also match their common variations, so "Cardiology"
/// finds "Cardiologist" and "Heart Surgery".
pub fn specialization_matches(specialization: &String, query: &String) -> bool {
    let mut spec_buf = [0u8; MAX_QUERY_LEN];
    let mut query_buf = [0u8; MAX_QUERY_LEN];
    let (Some(spec_len), Some(query_len)) = (
        lowercase_bytes(specialization, &mut spec_buf),
        lowercase_bytes(query, &mut query_buf),
    ) else {
        return false;
    };

    let spec = &spec_buf[..spec_len];
    let query = &query_buf[..query_len];
    if contains(spec, query) || contains(query, spec) {
        return true;
    }

    SPECIALTY_VARIATIONS
        .iter()
        .find(|(name, _)| *name == query)
        .map_or(false, |(_, variations)| {
            variations.iter().any(|variation| contains(spec, variation))
        })
}

/// Scan approved doctors in id order, returning at most `max_results` matches
pub fn find_doctors_by_specialization(env: &Env, query: String, max_results: u32) -> Vec<Doctor> {
    let mut matches = Vec::new(env);
    if max_results == 0 {
        return matches;
    }

    for doctor_id in 1..=num_doctors(env) {
        if let Some(doctor) = load_doctor(env, doctor_id) {
            if specialization_matches(&doctor.specialization, &query) {
                matches.push_back(doctor);
                if matches.len() >= max_results {
                    break;
                }
            }
        }
    }
    matches
}

use soroban_sdk::{contracttype, Address, BytesN};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    Registry,
    SettlementToken,
    Oracle,
    Config,
    Paused,
    SessionCount,
    Reserve,
    Locked,
    Collected(Address),
    TokenFeed(Address),
    Session(u64),
    Verification(u64),
    PatientSessions(Address),
    DoctorSessions(u32),
    Role(Role, Address),
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionStatus {
    Active,
    Completed,
    Refunded,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Party {
    Doctor,
    Patient,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Releaser,
    Arbiter,
    ReserveOperator,
}

/// Outcome of a session whose verification never completed.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExpiryPolicy {
    RefundPatient,
    ReleaseIfDoctorVerified,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EscrowConfig {
    /// Oldest acceptable price, in seconds.
    pub max_price_age: u64,
    /// Widest acceptable confidence interval relative to price, in basis points.
    pub max_confidence_bps: u32,
    /// Seconds after `start_time` before an unverified session can be resolved.
    pub resolution_window: u64,
    pub expiry_policy: ExpiryPolicy,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    pub session_id: u64,
    pub doctor_id: u32,
    pub doctor: Address,
    pub patient: Address,
    pub payment_token: Address,
    /// Amount pulled from the patient, in `payment_token` units.
    pub payment_amount: i128,
    /// Settlement-currency amount owed to the doctor. Fixed at creation.
    pub pyusd_amount: i128,
    pub status: SessionStatus,
    pub created_at: u64,
    pub start_time: u64,
    pub prescription_hash: Option<BytesN<32>>,
    pub settled_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MeetingVerification {
    pub doctor_verified: bool,
    pub doctor_verification_time: Option<u64>,
    pub patient_verified: bool,
    pub patient_verification_time: Option<u64>,
}

impl MeetingVerification {
    pub fn empty() -> Self {
        MeetingVerification {
            doctor_verified: false,
            doctor_verification_time: None,
            patient_verified: false,
            patient_verification_time: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.doctor_verified && self.patient_verified
    }
}

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidConfig = 3,

    // Authorization errors
    Unauthorized = 4,
    ContractPaused = 5,

    // Session state errors
    SessionNotFound = 6,
    SessionNotActive = 7,
    AlreadyReleased = 8,
    DoctorNotApproved = 9,
    RefundWindowClosed = 10,
    ResolutionWindowOpen = 11,

    // Verification errors
    VerificationIncomplete = 12,
    VerificationLocked = 13,

    // Funds errors
    InsufficientPayment = 14,
    InsufficientReserve = 15,
    InvalidAmount = 16,
    InvalidStartTime = 17,

    // Oracle / conversion errors
    UnsupportedToken = 18,
    InvalidConversion = 19,
}

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Authorization errors
    Unauthorized = 3,

    // Registration state errors
    AlreadyRegistered = 4,
    RegistrationNotFound = 5,
    NotPending = 6,
    DoctorNotFound = 7,

    // Validation errors
    InvalidProfile = 8,
    InvalidFee = 9,
    InvalidAmount = 10,

    // Funds errors
    InsufficientAllowance = 11,
    InsufficientBalance = 12,
}

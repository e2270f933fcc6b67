use soroban_sdk::{contracttype, Address, BytesN, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    Stablecoin,
    DepositFee,
    StakeAmount,
    Policy,
    RegistrationCount,
    DoctorCount,
    HeldFunds,
    RetainedFees,
    Registration(u32),
    RegistrationOf(Address),
    Doctor(u32),
    DoctorOf(Address),
    Role(Role, Address),
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Denied,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Approver,
}

/// Profile fields submitted with a registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorProfile {
    pub full_name: String,
    pub specialization: String,
    pub profile_description: String,
    pub email: String,
    pub legal_documents_hash: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorRegistration {
    pub registration_id: u32,
    pub full_name: String,
    pub specialization: String,
    pub profile_description: String,
    pub email: String,
    pub consultation_fee_per_hour: i128,
    pub legal_documents_hash: BytesN<32>,
    pub doctor_address: Address,
    pub deposit_paid: i128,
    pub stake_paid: i128,
    pub status: RegistrationStatus,
    pub registered_at: u64,
    pub decided_at: Option<u64>,
}

/// What happens to the funds pulled at registration once a decision is made.
/// Anything not refunded is kept as a platform fee.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositPolicy {
    pub refund_stake_on_approval: bool,
    pub refund_deposit_on_approval: bool,
    pub refund_stake_on_denial: bool,
    pub refund_deposit_on_denial: bool,
}

impl DepositPolicy {
    pub fn default_policy() -> Self {
        DepositPolicy {
            refund_stake_on_approval: true,
            refund_deposit_on_approval: false,
            refund_stake_on_denial: true,
            refund_deposit_on_denial: false,
        }
    }

    /// Split the funds held for a registration into (refund, retained).
    pub fn settle(&self, registration: &DoctorRegistration, approved: bool) -> (i128, i128) {
        let (refund_stake, refund_deposit) = if approved {
            (self.refund_stake_on_approval, self.refund_deposit_on_approval)
        } else {
            (self.refund_stake_on_denial, self.refund_deposit_on_denial)
        };

        let mut refund = 0;
        let mut retained = 0;
        if refund_stake {
            refund += registration.stake_paid;
        } else {
            retained += registration.stake_paid;
        }
        if refund_deposit {
            refund += registration.deposit_paid;
        } else {
            retained += registration.deposit_paid;
        }
        (refund, retained)
    }
}

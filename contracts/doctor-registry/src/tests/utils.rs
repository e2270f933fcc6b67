#![cfg(test)]

use crate::{DoctorProfile, DoctorRegistry, DoctorRegistryClient};
use soroban_sdk::{testutils::Address as _, token, Address, BytesN, Env, String};

/// One whole stablecoin unit. Stellar asset contracts carry 7 decimals.
pub const PYUSD: i128 = 10_000_000;
pub const DEPOSIT_FEE: i128 = PYUSD;
pub const STAKE: i128 = 3 * PYUSD;
pub const EXPIRATION_LEDGER: u32 = 1_000;

pub struct TestContext {
    pub env: Env,
    pub client: DoctorRegistryClient<'static>,
    pub admin: Address,
    pub stablecoin: Address,
}

impl TestContext {
    pub fn token(&self) -> token::Client<'static> {
        token::Client::new(&self.env, &self.stablecoin)
    }

    pub fn balance(&self, address: &Address) -> i128 {
        self.token().balance(address)
    }

    pub fn registry_balance(&self) -> i128 {
        self.balance(&self.client.address)
    }
}

pub fn setup_default() -> TestContext {
    setup(DEPOSIT_FEE, STAKE)
}

pub fn setup(deposit_fee: i128, stake_amount: i128) -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let stablecoin = create_test_token(&env, &admin);

    let contract_id = env.register(DoctorRegistry, ());
    let client = DoctorRegistryClient::new(&env, &contract_id);
    client.initialize(&admin, &stablecoin, &deposit_fee, &stake_amount);

    TestContext {
        env,
        client,
        admin,
        stablecoin,
    }
}

pub fn create_test_token(env: &Env, admin: &Address) -> Address {
    env.register_stellar_asset_contract_v2(admin.clone())
        .address()
}

pub fn mint_tokens(ctx: &TestContext, to: &Address, amount: i128) {
    token::StellarAssetClient::new(&ctx.env, &ctx.stablecoin).mint(to, &amount);
}

pub fn approve_registry(ctx: &TestContext, from: &Address, amount: i128) {
    ctx.token()
        .approve(from, &ctx.client.address, &amount, &EXPIRATION_LEDGER);
}

pub fn documents_hash(env: &Env, seed: u8) -> BytesN<32> {
    BytesN::from_array(env, &[seed; 32])
}

pub fn profile(env: &Env, full_name: &str, specialization: &str) -> DoctorProfile {
    DoctorProfile {
        full_name: String::from_str(env, full_name),
        specialization: String::from_str(env, specialization),
        profile_description: String::from_str(env, "Board certified, ten years in practice"),
        email: String::from_str(env, "doctor@example.com"),
        legal_documents_hash: documents_hash(env, 7),
    }
}

/// A funded doctor that has approved exactly what registration costs.
pub fn funded_doctor(ctx: &TestContext) -> Address {
    let doctor = Address::generate(&ctx.env);
    let cost = ctx.client.deposit_fee() + ctx.client.stake_amount();
    mint_tokens(ctx, &doctor, cost);
    approve_registry(ctx, &doctor, cost);
    doctor
}

/// Register a funded doctor, returning its address and registration id.
pub fn register_doctor(ctx: &TestContext, specialization: &str) -> (Address, u32) {
    let doctor = funded_doctor(ctx);
    let registration_id = ctx.client.register_as_doctor(
        &doctor,
        &profile(&ctx.env, "Dr. Ada Okafor", specialization),
        &(150 * PYUSD),
    );
    (doctor, registration_id)
}

/// Register and approve a doctor, returning its address and doctor id.
pub fn approved_doctor(ctx: &TestContext, specialization: &str) -> (Address, u32) {
    let (doctor, registration_id) = register_doctor(ctx, specialization);
    let doctor_id = ctx.client.approve_doctor(&ctx.admin, &registration_id);
    (doctor, doctor_id)
}

/// Token custody must always match the registry's books.
pub fn assert_books_balance(ctx: &TestContext) {
    assert_eq!(
        ctx.registry_balance(),
        ctx.client.held_funds() + ctx.client.retained_fees()
    );
}

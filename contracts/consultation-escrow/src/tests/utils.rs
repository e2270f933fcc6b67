#![cfg(test)]

use crate::{
    ConsultationEscrow, ConsultationEscrowClient, EscrowConfig, ExpiryPolicy, Party, PriceUpdate,
};
use doctor_registry::{DoctorProfile, DoctorRegistry, DoctorRegistryClient};
use price_oracle::{PriceOracle, PriceOracleClient};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, BytesN, Env, String, Symbol, TryFromVal, Vec,
};

/// One whole token. Stellar asset contracts carry 7 decimals.
pub const UNIT: i128 = 10_000_000;
pub const NOW: u64 = 1_700_000_000;
pub const HOUR: u64 = 3_600;
pub const WEEK: u64 = 7 * 24 * HOUR;
/// $0.12 with an exponent of -8.
pub const XLM_PRICE: i128 = 12_000_000;
pub const EXPIRATION_LEDGER: u32 = 1_000;

pub struct TestContext {
    pub env: Env,
    pub escrow: ConsultationEscrowClient<'static>,
    pub registry: DoctorRegistryClient<'static>,
    pub oracle: PriceOracleClient<'static>,
    pub admin: Address,
    pub publisher: Address,
    pub pyusd: Address,
    pub xlm: Address,
    pub doctor: Address,
    pub doctor_id: u32,
    pub patient: Address,
}

impl TestContext {
    pub fn balance(&self, token: &Address, address: &Address) -> i128 {
        token::Client::new(&self.env, token).balance(address)
    }

    pub fn pyusd_balance(&self, address: &Address) -> i128 {
        self.balance(&self.pyusd, address)
    }

    pub fn xlm_feed(&self) -> Symbol {
        symbol_short!("XLM_USD")
    }

    pub fn set_time(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }
}

pub fn default_config() -> EscrowConfig {
    EscrowConfig {
        max_price_age: 60,
        max_confidence_bps: 200,
        resolution_window: WEEK,
        expiry_policy: ExpiryPolicy::RefundPatient,
    }
}

pub fn create_test_token(env: &Env, admin: &Address) -> Address {
    env.register_stellar_asset_contract_v2(admin.clone())
        .address()
}

pub fn mint_tokens(env: &Env, token_address: &Address, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, token_address).mint(to, &amount);
}

pub fn doctor_profile(env: &Env, specialization: &str) -> DoctorProfile {
    DoctorProfile {
        full_name: String::from_str(env, "Dr. Samuel Reyes"),
        specialization: String::from_str(env, specialization),
        profile_description: String::from_str(env, "General practice and telehealth"),
        email: String::from_str(env, "s.reyes@example.com"),
        legal_documents_hash: BytesN::from_array(env, &[5u8; 32]),
    }
}

/// Register a doctor with the 3 PYUSD stake and $1 deposit fee, leaving it Pending.
pub fn register_doctor(
    env: &Env,
    registry: &DoctorRegistryClient,
    pyusd: &Address,
) -> (Address, u32) {
    let doctor = Address::generate(env);
    let cost = registry.deposit_fee() + registry.stake_amount();
    mint_tokens(env, pyusd, &doctor, cost);
    token::Client::new(env, pyusd).approve(&doctor, &registry.address, &cost, &EXPIRATION_LEDGER);

    let registration_id = registry.register_as_doctor(
        &doctor,
        &doctor_profile(env, "General Practice"),
        &(60 * UNIT),
    );
    (doctor, registration_id)
}

pub fn setup() -> TestContext {
    setup_with_config(default_config())
}

pub fn setup_with_config(config: EscrowConfig) -> TestContext {
    let env = Env::default();
    // Oracle publishers authorize their updates inside the patient's call
    env.mock_all_auths_allowing_non_root_auth();
    env.ledger().set_timestamp(NOW);

    let admin = Address::generate(&env);
    let publisher = Address::generate(&env);
    let patient = Address::generate(&env);
    let pyusd = create_test_token(&env, &admin);
    let xlm = create_test_token(&env, &admin);

    let registry_id = env.register(DoctorRegistry, ());
    let registry = DoctorRegistryClient::new(&env, &registry_id);
    registry.initialize(&admin, &pyusd, &UNIT, &(3 * UNIT));

    let (doctor, registration_id) = register_doctor(&env, &registry, &pyusd);
    let doctor_id = registry.approve_doctor(&admin, &registration_id);

    let oracle_id = env.register(PriceOracle, ());
    let oracle = PriceOracleClient::new(&env, &oracle_id);
    oracle.initialize(&admin);
    oracle.add_publisher(&admin, &publisher);

    let escrow_id = env.register(ConsultationEscrow, ());
    let escrow = ConsultationEscrowClient::new(&env, &escrow_id);
    escrow.initialize(&admin, &registry_id, &pyusd, &oracle_id, &config);
    escrow.set_token_feed(&admin, &xlm, &symbol_short!("XLM_USD"));

    mint_tokens(&env, &pyusd, &patient, 1_000 * UNIT);
    mint_tokens(&env, &xlm, &patient, 10_000 * UNIT);

    TestContext {
        env,
        escrow,
        registry,
        oracle,
        admin,
        publisher,
        pyusd,
        xlm,
        doctor,
        doctor_id,
        patient,
    }
}

pub fn approve_escrow(ctx: &TestContext, token: &Address, from: &Address, amount: i128) {
    token::Client::new(&ctx.env, token).approve(
        from,
        &ctx.escrow.address,
        &amount,
        &EXPIRATION_LEDGER,
    );
}

pub fn no_updates(env: &Env) -> Vec<PriceUpdate> {
    Vec::new(env)
}

pub fn xlm_update(ctx: &TestContext, price: i128, conf: i128, publish_time: u64) -> PriceUpdate {
    PriceUpdate {
        feed_id: ctx.xlm_feed(),
        publisher: ctx.publisher.clone(),
        price,
        conf,
        expo: -8,
        publish_time,
    }
}

/// Fresh $0.12 XLM price with a 0.1% confidence interval.
pub fn fresh_xlm_updates(ctx: &TestContext) -> Vec<PriceUpdate> {
    vec![&ctx.env, xlm_update(ctx, XLM_PRICE, XLM_PRICE / 1_000, NOW - 10)]
}

/// Book a session paid in the settlement token, starting in one hour.
pub fn book_pyusd(ctx: &TestContext, amount: i128) -> u64 {
    approve_escrow(ctx, &ctx.pyusd, &ctx.patient, amount);
    ctx.escrow.create_session(
        &ctx.patient,
        &ctx.doctor_id,
        &amount,
        &no_updates(&ctx.env),
        &ctx.pyusd,
        &(NOW + HOUR),
    )
}

/// Book a session paid in XLM at the fresh price, starting in one hour.
pub fn book_xlm(ctx: &TestContext, amount: i128) -> u64 {
    approve_escrow(ctx, &ctx.xlm, &ctx.patient, amount);
    ctx.escrow.create_session(
        &ctx.patient,
        &ctx.doctor_id,
        &amount,
        &fresh_xlm_updates(ctx),
        &ctx.xlm,
        &(NOW + HOUR),
    )
}

pub fn fund_reserve(ctx: &TestContext, amount: i128) {
    mint_tokens(&ctx.env, &ctx.pyusd, &ctx.admin, amount);
    approve_escrow(ctx, &ctx.pyusd, &ctx.admin, amount);
    ctx.escrow.deposit_pyusd_reserve(&ctx.admin, &amount);
}

pub fn verify(ctx: &TestContext, session_id: u64, party: Party) {
    let caller = match party {
        Party::Doctor => ctx.doctor.clone(),
        Party::Patient => ctx.patient.clone(),
    };
    ctx.escrow.set_verified(&session_id, &caller, &party, &true);
}

pub fn verify_both(ctx: &TestContext, session_id: u64) {
    verify(ctx, session_id, Party::Doctor);
    verify(ctx, session_id, Party::Patient);
}

pub fn prescription_hash(env: &Env, seed: u8) -> BytesN<32> {
    BytesN::from_array(env, &[seed; 32])
}

/// Count published events whose first topic is `name`.
pub fn count_events(env: &Env, name: &str) -> u32 {
    let wanted = Symbol::new(env, name);
    let mut count = 0;
    for (_, topics, _) in env.events().all().iter() {
        if let Some(first) = topics.get(0) {
            if let Ok(symbol) = Symbol::try_from_val(env, &first) {
                if symbol == wanted {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Custody must always match the escrow's books.
pub fn assert_escrow_books(ctx: &TestContext) {
    let escrow = &ctx.escrow.address;
    assert_eq!(ctx.pyusd_balance(escrow), ctx.escrow.pyusd_reserve_balance());
    assert_eq!(
        ctx.balance(&ctx.xlm, escrow),
        ctx.escrow.collected_balance(&ctx.xlm)
    );
    assert!(ctx.escrow.pyusd_reserve_balance() >= ctx.escrow.locked_balance());
    assert_eq!(
        ctx.escrow.available_reserve(),
        ctx.escrow.pyusd_reserve_balance() - ctx.escrow.locked_balance()
    );
}

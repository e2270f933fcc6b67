use soroban_sdk::{testutils::Address as _, Address};

use super::utils::*;
use crate::{ContractError, Party, Role, SessionStatus};

#[test]
fn reserve_deposit_requires_operator_role() {
    let ctx = setup();
    let operator = Address::generate(&ctx.env);
    mint_tokens(&ctx.env, &ctx.pyusd, &operator, 100 * UNIT);
    approve_escrow(&ctx, &ctx.pyusd, &operator, 100 * UNIT);

    assert_eq!(
        ctx.escrow.try_deposit_pyusd_reserve(&operator, &(100 * UNIT)),
        Err(Ok(ContractError::Unauthorized))
    );

    ctx.escrow.grant_role(&ctx.admin, &operator, &Role::ReserveOperator);
    ctx.escrow.deposit_pyusd_reserve(&operator, &(100 * UNIT));
    assert_eq!(ctx.escrow.pyusd_reserve_balance(), 100 * UNIT);
    assert_eq!(ctx.escrow.available_reserve(), 100 * UNIT);

    ctx.escrow.revoke_role(&ctx.admin, &operator, &Role::ReserveOperator);
    assert!(!ctx.escrow.has_role(&operator, &Role::ReserveOperator));
    assert_escrow_books(&ctx);
}

#[test]
fn reserve_deposit_needs_approval() {
    let ctx = setup();
    mint_tokens(&ctx.env, &ctx.pyusd, &ctx.admin, 10 * UNIT);

    assert_eq!(
        ctx.escrow.try_deposit_pyusd_reserve(&ctx.admin, &(10 * UNIT)),
        Err(Ok(ContractError::InsufficientPayment))
    );
    assert_eq!(
        ctx.escrow.try_deposit_pyusd_reserve(&ctx.admin, &0),
        Err(Ok(ContractError::InvalidAmount))
    );
}

#[test]
fn paused_escrow_rejects_deposits() {
    let ctx = setup();
    ctx.escrow.pause(&ctx.admin);
    mint_tokens(&ctx.env, &ctx.pyusd, &ctx.admin, 10 * UNIT);
    approve_escrow(&ctx, &ctx.pyusd, &ctx.admin, 10 * UNIT);

    assert_eq!(
        ctx.escrow.try_deposit_pyusd_reserve(&ctx.admin, &(10 * UNIT)),
        Err(Ok(ContractError::ContractPaused))
    );
}

#[test]
fn only_unlocked_reserve_can_be_withdrawn() {
    let ctx = setup();
    fund_reserve(&ctx, 100 * UNIT);
    book_xlm(&ctx, 500 * UNIT);
    let treasury = Address::generate(&ctx.env);

    assert_eq!(
        ctx.escrow.try_withdraw_reserve(&ctx.admin, &treasury, &(41 * UNIT)),
        Err(Ok(ContractError::InsufficientReserve))
    );
    ctx.escrow.withdraw_reserve(&ctx.admin, &treasury, &(40 * UNIT));

    assert_eq!(ctx.pyusd_balance(&treasury), 40 * UNIT);
    assert_eq!(ctx.escrow.available_reserve(), 0);
    assert_eq!(ctx.escrow.locked_balance(), 60 * UNIT);
    assert_escrow_books(&ctx);
}

#[test]
fn collected_tokens_can_be_withdrawn() {
    let ctx = setup();
    fund_reserve(&ctx, 100 * UNIT);
    let session_id = book_xlm(&ctx, 500 * UNIT);
    verify_both(&ctx, session_id);
    ctx.escrow
        .release_payment(&ctx.doctor, &session_id, &prescription_hash(&ctx.env, 9));

    let treasury = Address::generate(&ctx.env);
    assert_eq!(
        ctx.escrow
            .try_withdraw_collected(&ctx.admin, &ctx.xlm, &treasury, &(501 * UNIT)),
        Err(Ok(ContractError::InsufficientReserve))
    );
    assert_eq!(
        ctx.escrow
            .try_withdraw_collected(&treasury, &ctx.xlm, &treasury, &(500 * UNIT)),
        Err(Ok(ContractError::Unauthorized))
    );

    ctx.escrow
        .withdraw_collected(&ctx.admin, &ctx.xlm, &treasury, &(500 * UNIT));
    assert_eq!(ctx.balance(&ctx.xlm, &treasury), 500 * UNIT);
    assert_eq!(ctx.escrow.collected_balance(&ctx.xlm), 0);
    assert_escrow_books(&ctx);
}

#[test]
fn refund_after_collected_withdrawal_pays_from_reserve() {
    let ctx = setup();
    fund_reserve(&ctx, 100 * UNIT);
    let session_id = book_xlm(&ctx, 500 * UNIT);
    let pyusd_amount = ctx.escrow.get_session(&session_id).unwrap().pyusd_amount;
    assert_eq!(pyusd_amount, 60 * UNIT);

    let treasury = Address::generate(&ctx.env);
    ctx.escrow
        .withdraw_collected(&ctx.admin, &ctx.xlm, &treasury, &(500 * UNIT));

    let patient_pyusd = ctx.pyusd_balance(&ctx.patient);
    let patient_xlm = ctx.balance(&ctx.xlm, &ctx.patient);
    assert_eq!(
        ctx.escrow.refund_session(&ctx.patient, &session_id),
        pyusd_amount
    );

    assert_eq!(ctx.pyusd_balance(&ctx.patient), patient_pyusd + pyusd_amount);
    assert_eq!(ctx.balance(&ctx.xlm, &ctx.patient), patient_xlm);
    assert_eq!(
        ctx.escrow.get_session(&session_id).unwrap().status,
        SessionStatus::Refunded
    );
    assert_eq!(ctx.escrow.locked_balance(), 0);
    assert_eq!(ctx.escrow.pyusd_reserve_balance(), 40 * UNIT);
    ctx.escrow.withdraw_reserve(&ctx.admin, &treasury, &(40 * UNIT));
    assert_escrow_books(&ctx);
}

#[test]
fn expired_session_resolves_after_collected_withdrawal() {
    let ctx = setup();
    fund_reserve(&ctx, 100 * UNIT);
    let session_id = book_xlm(&ctx, 500 * UNIT);
    let treasury = Address::generate(&ctx.env);
    ctx.escrow
        .withdraw_collected(&ctx.admin, &ctx.xlm, &treasury, &(300 * UNIT));

    ctx.set_time(NOW + HOUR + WEEK);
    let anyone = Address::generate(&ctx.env);
    assert_eq!(
        ctx.escrow.resolve_expired_session(&anyone, &session_id),
        SessionStatus::Refunded
    );

    // Only 200 XLM were left, so the locked settlement amount went back instead
    assert_eq!(ctx.balance(&ctx.xlm, &ctx.patient), 9_500 * UNIT);
    assert_eq!(ctx.pyusd_balance(&ctx.patient), 1_060 * UNIT);
    assert_eq!(ctx.escrow.collected_balance(&ctx.xlm), 200 * UNIT);
    assert_eq!(ctx.escrow.available_reserve(), 40 * UNIT);
    assert_escrow_books(&ctx);
}

#[test]
fn funds_are_conserved_across_mixed_activity() {
    let ctx = setup();
    let patient_start = ctx.pyusd_balance(&ctx.patient);
    let doctor_start = ctx.pyusd_balance(&ctx.doctor);
    fund_reserve(&ctx, 200 * UNIT);

    let paid = book_pyusd(&ctx, 40 * UNIT);
    let cancelled = book_pyusd(&ctx, 25 * UNIT);
    let converted = book_xlm(&ctx, 500 * UNIT);
    let open = book_pyusd(&ctx, 15 * UNIT);

    verify_both(&ctx, paid);
    ctx.escrow
        .release_payment(&ctx.doctor, &paid, &prescription_hash(&ctx.env, 1));
    ctx.escrow.refund_session(&ctx.patient, &cancelled);
    verify(&ctx, converted, Party::Doctor);
    verify(&ctx, converted, Party::Patient);
    ctx.escrow
        .release_payment(&ctx.doctor, &converted, &prescription_hash(&ctx.env, 2));
    verify(&ctx, open, Party::Patient);

    // Stablecoin in (top-up plus patient payments) equals payouts, refunds and what is still held
    let deposited = 200 * UNIT + 40 * UNIT + 25 * UNIT + 15 * UNIT;
    let payouts = ctx.pyusd_balance(&ctx.doctor) - doctor_start;
    let refunds = 25 * UNIT;
    assert_eq!(payouts, 100 * UNIT);
    assert_eq!(deposited, payouts + refunds + ctx.escrow.pyusd_reserve_balance());
    assert_eq!(ctx.pyusd_balance(&ctx.patient), patient_start - 40 * UNIT - 15 * UNIT);

    assert_eq!(ctx.escrow.locked_balance(), 15 * UNIT);
    assert_eq!(ctx.escrow.pyusd_reserve_balance(), 155 * UNIT);
    assert_escrow_books(&ctx);
}

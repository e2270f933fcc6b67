//! Converts patient payments in other tokens into settlement-currency units
//! using the oracle's feeds.

use soroban_sdk::{log, token, Address, Env, Vec};

use booking_common::{Price, PriceUpdate};

use crate::config::{get_config, get_token_feed, oracle, settlement_token};
use crate::error::ContractError;
use crate::interfaces::OracleClient;
use crate::types::EscrowConfig;

const BPS_DENOMINATOR: i128 = 10_000;

fn pow10(exp: u32) -> Result<i128, ContractError> {
    10i128
        .checked_pow(exp)
        .ok_or(ContractError::InvalidConversion)
}

/// Reject prices that are stale, future-dated, non-positive or too uncertain.
pub fn check_price(env: &Env, price: &Price, config: &EscrowConfig) -> Result<(), ContractError> {
    let now = env.ledger().timestamp();
    if price.price <= 0 || price.conf < 0 {
        return Err(ContractError::InvalidConversion);
    }
    if price.publish_time > now {
        return Err(ContractError::InvalidConversion);
    }
    if now - price.publish_time > config.max_price_age {
        log!(env, "stale price: published {}, now {}", price.publish_time, now);
        return Err(ContractError::InvalidConversion);
    }

    let conf_bps = price
        .conf
        .checked_mul(BPS_DENOMINATOR)
        .ok_or(ContractError::InvalidConversion)?
        / price.price;
    if conf_bps > config.max_confidence_bps as i128 {
        log!(env, "price confidence too wide: {} bps", conf_bps);
        return Err(ContractError::InvalidConversion);
    }
    Ok(())
}

/// `amount * price * 10^expo`, rescaled from `token_decimals` to
/// `settlement_decimals` and rounded down.
pub fn convert_amount(
    amount: i128,
    price: &Price,
    token_decimals: u32,
    settlement_decimals: u32,
) -> Result<i128, ContractError> {
    let scale = price.expo as i64 + settlement_decimals as i64 - token_decimals as i64;
    let value = amount
        .checked_mul(price.price)
        .ok_or(ContractError::InvalidConversion)?;

    let converted = if scale >= 0 {
        let factor = pow10(u32::try_from(scale).map_err(|_| ContractError::InvalidConversion)?)?;
        value
            .checked_mul(factor)
            .ok_or(ContractError::InvalidConversion)?
    } else {
        let divisor = pow10(u32::try_from(-scale).map_err(|_| ContractError::InvalidConversion)?)?;
        value / divisor
    };

    if converted <= 0 {
        return Err(ContractError::InvalidConversion);
    }
    Ok(converted)
}

fn read_feed_price(env: &Env, token: &Address) -> Result<Price, ContractError> {
    let feed_id = get_token_feed(env, token).ok_or(ContractError::UnsupportedToken)?;
    let oracle = OracleClient::new(env, &oracle(env)?);
    oracle
        .get_price_unsafe(&feed_id)
        .ok_or(ContractError::InvalidConversion)
}

/// Settlement-currency value of `amount` of `token`, using the stored feed price.
pub fn quote(env: &Env, token: &Address, amount: i128) -> Result<i128, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let settlement = settlement_token(env)?;
    if *token == settlement {
        return Ok(amount);
    }

    let price = read_feed_price(env, token)?;
    check_price(env, &price, &get_config(env)?)?;

    let token_decimals = token::Client::new(env, token).decimals();
    let settlement_decimals = token::Client::new(env, &settlement).decimals();
    convert_amount(amount, &price, token_decimals, settlement_decimals)
}

/// Push the bundled updates to the oracle, then quote. Any oracle rejection
/// surfaces as `InvalidConversion`.
pub fn quote_with_updates(
    env: &Env,
    token: &Address,
    amount: i128,
    updates: Vec<PriceUpdate>,
) -> Result<i128, ContractError> {
    if *token != settlement_token(env)? {
        get_token_feed(env, token).ok_or(ContractError::UnsupportedToken)?;
        if !updates.is_empty() {
            let oracle = OracleClient::new(env, &oracle(env)?);
            match oracle.try_update_price_feeds(&updates) {
                Ok(Ok(())) => {}
                _ => {
                    log!(env, "oracle rejected price updates");
                    return Err(ContractError::InvalidConversion);
                }
            }
        }
    }
    quote(env, token, amount)
}

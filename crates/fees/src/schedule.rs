//! Two-tier US marketplace fee schedule.
//!
//! Below the threshold the marketplace takes a flat fee; at or above it, a
//! percentage of the price. All math is on integer cents with half-up
//! rounding, so results match what the marketplace shows sellers.

use flipstock_core::{DomainError, DomainResult, Money};

/// Flat fee charged when the price is under [`THRESHOLD`]: $2.95.
pub const FLAT_FEE: Money = Money::from_cents(295);

/// Fee regime boundary: $15.00. Prices at or above this pay the percent fee.
pub const THRESHOLD: Money = Money::from_cents(1500);

/// Percent fee at or above the threshold: 20%.
const PERCENT_NUM: i128 = 20;
const PERCENT_DEN: i128 = 100;

fn ensure_non_negative(label: &str, amount: Money) -> DomainResult<()> {
    if amount.is_negative() {
        return Err(DomainError::validation(format!(
            "{label} cannot be negative: {amount}"
        )));
    }
    Ok(())
}

fn to_cents(value: i128) -> DomainResult<Money> {
    i64::try_from(value)
        .map(Money::from_cents)
        .map_err(|_| DomainError::invariant("fee amount overflow"))
}

/// The marketplace fee for a given listing/sold price.
pub fn fee(price: Money) -> DomainResult<Money> {
    ensure_non_negative("price", price)?;

    if price < THRESHOLD {
        return Ok(FLAT_FEE);
    }

    // 20% of price, rounded half-up to the cent.
    let cents = i128::from(price.cents());
    to_cents((cents * PERCENT_NUM + PERCENT_DEN / 2) / PERCENT_DEN)
}

/// Seller payout after marketplace fees: `price - fee(price)`.
///
/// Can be negative in the flat-fee regime (a $1.00 sale pays the seller
/// -$1.95); the marketplace rules don't forbid listing below the fee.
pub fn payout_after_fees(price: Money) -> DomainResult<Money> {
    let fee = fee(price)?;
    price.checked_sub(fee)
}

/// Minimum listing price whose payout covers `cost` (0% profit).
///
/// Candidate A (flat regime): `cost + 2.95`, valid only strictly below the
/// threshold. Candidate B (percent regime): `cost / 0.8`, half-up to the
/// cent. When candidate A lands exactly on the threshold the percent
/// formula decides, matching the `>= 15.00` fee bracket. The comparison is
/// on integer cents; no floating point is involved, so the branch cannot
/// oscillate with rounding.
pub fn break_even_price(cost: Money) -> DomainResult<Money> {
    ensure_non_negative("cost", cost)?;

    let flat_candidate = cost.checked_add(FLAT_FEE)?;
    if flat_candidate < THRESHOLD {
        return Ok(flat_candidate);
    }

    // cost / (1 - 20%) = cost * 5 / 4, rounded half-up to the cent.
    let cents = i128::from(cost.cents());
    let mut percent_candidate = to_cents((cents * 5 + 2) / 4)?;
    if percent_candidate < THRESHOLD {
        // The percent regime only exists at >= 15.00; bump to the boundary.
        percent_candidate = THRESHOLD;
    }
    Ok(percent_candidate)
}

/// Realized profit for a sale: `payout_after_fees(sold_price) - cost`.
///
/// Negative when the item sold at a loss.
pub fn profit(cost: Money, sold_price: Money) -> DomainResult<Money> {
    ensure_non_negative("cost", cost)?;
    let payout = payout_after_fees(sold_price)?;
    payout.checked_sub(cost)
}

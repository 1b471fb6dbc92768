//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::prices::Price;

/// Number of decimal places declared totals are compared at.
pub const TOTAL_COMPARISON_DP: u32 = 2;

/// Errors that can occur while pricing an order.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The client-declared total disagrees with the total recomputed from product prices.
    #[error("declared total {declared} does not match computed total {computed}")]
    AmountMismatch {
        /// Declared total, rounded to two decimal places.
        declared: Decimal,

        /// Server-side total, rounded to two decimal places.
        computed: Decimal,
    },

    /// A line or order total does not fit in the supported integer range.
    #[error("order total overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A single priced order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// Unit price actually charged.
    pub unit_price: Price,

    /// Number of units ordered.
    pub quantity: u32,
}

impl PricedLine {
    /// Creates a new priced line.
    pub const fn new(unit_price: Price, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    /// Line subtotal (unit price × quantity).
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in an `i64`.
    pub fn subtotal<'a>(&self, currency: &'a Currency) -> Result<Money<'a, Currency>, PricingError> {
        let unit = i64::try_from(*self.unit_price).map_err(|_overflow| PricingError::Overflow)?;

        let minor = unit
            .checked_mul(i64::from(self.quantity))
            .ok_or(PricingError::Overflow)?;

        Ok(Money::from_minor(minor, currency))
    }
}

/// Calculates the total of a list of priced lines.
///
/// An empty list totals zero.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line subtotal does not fit in an `i64`.
/// - [`PricingError::Money`]: wrapped money arithmetic error.
pub fn order_total<'a>(
    lines: &[PricedLine],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            Ok(acc.add(line.subtotal(currency)?)?)
        })
}

/// Compare a client-declared total against the computed total.
///
/// Both sides are rounded half away from zero to [`TOTAL_COMPARISON_DP`] decimal places before
/// an exact comparison. An exact half-cent declaration such as `100.005` therefore rounds up to
/// `100.01` and does not match a computed `100.00`.
///
/// # Errors
///
/// Returns [`PricingError::AmountMismatch`] when the rounded amounts differ.
pub fn verify_declared_total(
    declared: Decimal,
    computed: &Money<'_, Currency>,
) -> Result<(), PricingError> {
    let declared = round_total(declared);
    let computed = round_total(*computed.amount());

    if declared == computed {
        Ok(())
    } else {
        Err(PricingError::AmountMismatch { declared, computed })
    }
}

/// Convert an amount into minor currency units (cents for USD).
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount cannot be represented as an `i64`.
pub fn to_minor_units(money: &Money<'_, Currency>) -> Result<i64, PricingError> {
    let scale = 10_i64
        .checked_pow(money.currency().exponent)
        .map(Decimal::from)
        .ok_or(PricingError::Overflow)?;

    money
        .amount()
        .checked_mul(scale)
        .and_then(|minor| minor.trunc().to_i64())
        .ok_or(PricingError::Overflow)
}

/// Convert minor currency units into a decimal amount in major units.
pub fn to_major_units(minor: u64, currency: &Currency) -> Decimal {
    let minor = Decimal::from(minor);

    match 10_u64.checked_pow(currency.exponent) {
        Some(scale) => minor / Decimal::from(scale),
        None => minor,
    }
}

fn round_total(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(TOTAL_COMPARISON_DP, RoundingStrategy::MidpointAwayFromZero)
}

//! Money arithmetic. Amounts are stored as integer cents and exposed as decimals.

use alumni_config::ShopConfig;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::types::{ShopError, ShopResult};

pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Round half away from zero to whole cents. `None` when out of range.
pub fn decimal_to_cents(amount: Decimal) -> Option<i64> {
    (amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero) * Decimal::ONE_HUNDRED)
        .to_i64()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: i64,
}

impl CartTotals {
    /// Totals over `(unit_price_cents, quantity)` pairs. Shipping is free once the
    /// subtotal exceeds the threshold and flat otherwise, including for an empty cart.
    pub fn compute<I>(lines: I, config: &ShopConfig) -> ShopResult<Self>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut subtotal_cents = 0_i64;
        let mut item_count = 0_i64;
        for (price, quantity) in lines {
            subtotal_cents = price
                .checked_mul(quantity)
                .and_then(|line| subtotal_cents.checked_add(line))
                .ok_or_else(out_of_range)?;
            item_count = item_count.checked_add(quantity).ok_or_else(out_of_range)?;
        }

        let shipping_cents = if subtotal_cents > config.free_shipping_threshold_cents {
            0
        } else {
            config.flat_shipping_cents
        };
        let total_cents = subtotal_cents
            .checked_add(shipping_cents)
            .ok_or_else(out_of_range)?;

        Ok(Self {
            subtotal: cents_to_decimal(subtotal_cents),
            shipping: cents_to_decimal(shipping_cents),
            total: cents_to_decimal(total_cents),
            item_count,
        })
    }

    pub fn subtotal_cents(&self) -> i64 {
        decimal_to_cents(self.subtotal).unwrap_or_default()
    }

    pub fn shipping_cents(&self) -> i64 {
        decimal_to_cents(self.shipping).unwrap_or_default()
    }

    pub fn total_cents(&self) -> i64 {
        decimal_to_cents(self.total).unwrap_or_default()
    }
}

fn out_of_range() -> ShopError {
    ShopError::validation("Cart total is out of range")
}

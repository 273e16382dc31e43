//! Money rules - precise decimal arithmetic for monetary values
//!
//! All amounts are `Decimal` end-to-end with 2 decimal places, rounded
//! half-up at each defined step. This module is the single authority
//! for order totals: `total = subtotal - cart_discount + tax`, tax on
//! the post-discount subtotal, everything clamped at zero.

use crate::core::error::{EngineError, EngineResult};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::order::{Discount, DiscountKind, LineInput, OrderSnapshot, PaymentInput};

const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per unit (€1,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed payment amount (€1,000,000)
pub const MAX_PAYMENT_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Round to 2 decimal places, half-up.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

// ========== Validation ==========

pub fn validate_price(price: Decimal) -> EngineResult<()> {
    if price < Decimal::ZERO || price > MAX_PRICE {
        return Err(EngineError::InvalidPrice(price));
    }
    Ok(())
}

pub fn validate_discount(discount: &Discount) -> EngineResult<()> {
    match discount.kind {
        DiscountKind::Percentage => {
            if discount.value < Decimal::ZERO || discount.value > HUNDRED {
                return Err(EngineError::InvalidDiscount(discount.value));
            }
        }
        DiscountKind::FixedAmount => {
            if discount.value < Decimal::ZERO || discount.value > MAX_PRICE {
                return Err(EngineError::InvalidDiscount(discount.value));
            }
        }
    }
    Ok(())
}

pub fn validate_line(line: &LineInput) -> EngineResult<()> {
    if line.quantity <= 0 || line.quantity > MAX_QUANTITY {
        return Err(EngineError::InvalidQuantity {
            product_id: line.product_id,
            quantity: line.quantity,
        });
    }
    if let Some(discount) = &line.discount {
        validate_discount(discount)?;
    }
    Ok(())
}

pub fn validate_payment(payment: &PaymentInput) -> EngineResult<()> {
    if payment.amount <= Decimal::ZERO || payment.amount > MAX_PAYMENT_AMOUNT {
        return Err(EngineError::InvalidAmount(payment.amount));
    }
    if let Some(tendered) = payment.tendered
        && tendered < payment.amount
    {
        return Err(EngineError::TenderedBelowAmount {
            tendered,
            amount: payment.amount,
        });
    }
    Ok(())
}

/// Tax rate is a fraction: 0.21 for 21%.
pub fn validate_tax_rate(rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::InvalidTaxRate(rate));
    }
    Ok(())
}

// ========== Calculation ==========

/// Amount a discount takes off `base`, rounded and clamped to `[0, base]`.
pub fn discount_amount(base: Decimal, discount: &Discount) -> Decimal {
    let off = round2(discount.amount_off(base));
    if off > base {
        base
    } else if off < Decimal::ZERO {
        Decimal::ZERO
    } else {
        off
    }
}

/// Line total: `unit_price * quantity - discount`, floored at zero.
/// Percentage discounts apply to the gross line amount.
pub fn line_total(unit_price: Decimal, quantity: i32, discount: Option<&Discount>) -> Decimal {
    let gross = round2(unit_price * Decimal::from(quantity));
    match discount {
        Some(d) => gross - discount_amount(gross, d),
        None => gross,
    }
}

/// Recompute every derived figure on the snapshot in place:
/// line totals, subtotal, applied cart discount, tax, total.
pub fn recalculate_totals(snapshot: &mut OrderSnapshot) {
    for line in &mut snapshot.lines {
        line.line_total = line_total(line.unit_price, line.quantity, line.discount.as_ref());
    }
    let subtotal = round2(snapshot.lines.iter().map(|l| l.line_total).sum());
    let discount_total = match &snapshot.cart_discount {
        Some(d) => discount_amount(subtotal, d),
        None => Decimal::ZERO,
    };
    let discounted = subtotal - discount_total;
    let tax = round2(discounted * snapshot.tax_rate);

    snapshot.subtotal = subtotal;
    snapshot.discount_total = discount_total;
    snapshot.tax = tax;
    snapshot.total = round2(discounted + tax);
}

/// Paid covers required within tolerance (1 cent).
pub fn is_payment_sufficient(paid: Decimal, required: Decimal) -> bool {
    paid >= required - MONEY_TOLERANCE
}

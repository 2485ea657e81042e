use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::pricing::{
    models::{CostBreakdown, ShipmentRequest, Urgency},
    PricingError,
};

/// Surcharge applied to the base cost of urgent deliveries
pub const URGENCY_SURCHARGE_RATE: Decimal = dec!(0.20);
/// Totals strictly above this amount (after surcharge) earn the discount
pub const DISCOUNT_THRESHOLD: Decimal = dec!(500);
pub const DISCOUNT_RATE: Decimal = dec!(0.10);
/// Cargo strictly heavier than this pays the flat extra fee
pub const HEAVY_CARGO_THRESHOLD_KG: Decimal = dec!(50);
pub const HEAVY_CARGO_FEE: Decimal = dec!(15);

/// Decimal places kept on every monetary amount
pub const MONEY_SCALE: u32 = 2;

/// Compute the itemized cost of a delivery
///
/// Rules are applied in a fixed order and never revisited:
/// 1. base = distance * rate_per_km + weight * rate_per_kg
/// 2. urgent deliveries add 20% of the base
/// 3. if base + surcharge exceeds 500, 10% of that amount is discounted
/// 4. cargo over 50 kg adds a flat fee of 15, after (and outside) the discount
///
/// Each line item is rounded to cents (half away from zero) as it is
/// produced, and later rules work on the rounded amounts, so `final_cost` is
/// exactly the sum of the reported components.
pub fn compute_cost(request: &ShipmentRequest) -> Result<CostBreakdown, PricingError> {
    request.validate()?;

    let distance_cost = to_cents(checked(
        "distance_km",
        request.distance_km.checked_mul(request.rate_per_km),
    )?);
    let weight_cost = to_cents(checked(
        "weight_kg",
        request.weight_kg.checked_mul(request.rate_per_kg),
    )?);
    let base_cost = checked("base_cost", distance_cost.checked_add(weight_cost))?;

    let surcharge = match request.urgency {
        Urgency::Urgent => to_cents(checked(
            "surcharge",
            base_cost.checked_mul(URGENCY_SURCHARGE_RATE),
        )?),
        Urgency::Normal => Decimal::ZERO,
    };
    let mut running_total = checked("surcharge", base_cost.checked_add(surcharge))?;

    let discount = if running_total > DISCOUNT_THRESHOLD {
        to_cents(checked("discount", running_total.checked_mul(DISCOUNT_RATE))?)
    } else {
        Decimal::ZERO
    };
    running_total = checked("discount", running_total.checked_sub(discount))?;

    let extra_fee = if request.weight_kg > HEAVY_CARGO_THRESHOLD_KG {
        HEAVY_CARGO_FEE
    } else {
        Decimal::ZERO
    };
    running_total = checked("extra_fee", running_total.checked_add(extra_fee))?;

    Ok(CostBreakdown {
        distance_cost: distance_cost.normalize(),
        weight_cost: weight_cost.normalize(),
        base_cost: base_cost.normalize(),
        surcharge: surcharge.normalize(),
        discount: discount.normalize(),
        extra_fee: extra_fee.normalize(),
        final_cost: running_total.normalize(),
    })
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Arithmetic overflow means the inputs are beyond what can be priced
fn checked(field: &'static str, amount: Option<Decimal>) -> Result<Decimal, PricingError> {
    amount.ok_or_else(|| PricingError::invalid(field, "amount too large"))
}

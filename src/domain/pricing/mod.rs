//! Tiered bulk pricing
//!
//! A [`TierTable`] maps contiguous quantity bands to discount percentages.
//! The table is built once at startup, validated for totality over `[1, ∞)`,
//! and is immutable afterwards; resolution and price computation are pure.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Money, Quantity};
use crate::{CommerceError, Result};

/// One discount band: `[min_quantity, max_quantity]` at `discount_percent`.
/// `max_quantity = None` marks the unbounded top tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    pub label: String,
    pub min_quantity: u32,
    pub max_quantity: Option<u32>,
    pub discount_percent: Decimal,
}

impl PricingTier {
    pub fn new(label: &str, min_quantity: u32, max_quantity: Option<u32>, discount_percent: Decimal) -> Self {
        Self { label: label.to_string(), min_quantity, max_quantity, discount_percent }
    }

    pub fn matches(&self, quantity: u32) -> bool {
        quantity >= self.min_quantity && self.max_quantity.map_or(true, |max| quantity <= max)
    }
}

/// Ordered, gap-free table of pricing tiers.
#[derive(Clone, Debug)]
pub struct TierTable {
    tiers: Vec<PricingTier>,
}

impl TierTable {
    /// Build a table, failing fast when the tier configuration cannot cover
    /// every positive quantity exactly once.
    pub fn new(tiers: Vec<PricingTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(CommerceError::InvalidTierTable("no tiers defined".into()));
        }
        if tiers[0].min_quantity != 1 {
            return Err(CommerceError::InvalidTierTable(format!(
                "first tier `{}` must start at quantity 1, starts at {}",
                tiers[0].label, tiers[0].min_quantity
            )));
        }
        for pair in tiers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            match prev.max_quantity {
                None => {
                    return Err(CommerceError::InvalidTierTable(format!(
                        "tier `{}` is unbounded but is not the last tier",
                        prev.label
                    )));
                }
                Some(max) if max < prev.min_quantity => {
                    return Err(CommerceError::InvalidTierTable(format!(
                        "tier `{}` has max {} below min {}",
                        prev.label, max, prev.min_quantity
                    )));
                }
                Some(max) if next.min_quantity != max + 1 => {
                    return Err(CommerceError::InvalidTierTable(format!(
                        "gap or overlap between `{}` (ends {}) and `{}` (starts {})",
                        prev.label, max, next.label, next.min_quantity
                    )));
                }
                Some(_) => {}
            }
            // Non-decreasing discounts keep bulk pricing from penalizing a
            // higher band.
            if next.discount_percent < prev.discount_percent {
                return Err(CommerceError::InvalidTierTable(format!(
                    "tier `{}` discounts less than the lower tier `{}`",
                    next.label, prev.label
                )));
            }
        }
        if tiers.last().map(|t| t.max_quantity).unwrap_or(None).is_some() {
            return Err(CommerceError::InvalidTierTable(
                "last tier must be unbounded to cover all quantities".into(),
            ));
        }
        for tier in &tiers {
            if tier.discount_percent < Decimal::ZERO || tier.discount_percent >= Decimal::ONE_HUNDRED {
                return Err(CommerceError::InvalidTierTable(format!(
                    "tier `{}` discount {}% outside [0, 100)",
                    tier.label, tier.discount_percent
                )));
            }
        }
        Ok(Self { tiers })
    }

    /// Default tier configuration. Band boundaries and percentages are
    /// deployment configuration, not a contract; see `config`.
    pub fn standard() -> Self {
        Self::new(vec![
            PricingTier::new("Retail", 1, Some(49), dec!(0)),
            PricingTier::new("Small Bulk", 50, Some(99), dec!(15)),
            PricingTier::new("Medium Bulk", 100, Some(249), dec!(25)),
            PricingTier::new("Large Bulk", 250, Some(499), dec!(35)),
            PricingTier::new("Wholesale", 500, None, dec!(45)),
        ])
        .expect("standard tier table is valid")
    }

    pub fn tiers(&self) -> &[PricingTier] { &self.tiers }

    /// Resolve the unique tier for a quantity. Totality over `[1, ∞)` is
    /// guaranteed by construction, so a valid quantity always matches.
    pub fn resolve(&self, quantity: u32) -> Result<&PricingTier> {
        let quantity = Quantity::new(quantity)?.value();
        // Tiers are sorted by min_quantity: take the last tier at or below.
        let idx = self.tiers.partition_point(|t| t.min_quantity <= quantity);
        let tier = &self.tiers[idx - 1];
        debug_assert!(tier.matches(quantity));
        Ok(tier)
    }

    /// Full price breakdown for `quantity` units at `unit_price`.
    ///
    /// All arithmetic stays at full decimal precision; display rounding is
    /// left to [`Money::display_amount`].
    pub fn price(&self, unit_price: &Money, quantity: u32) -> Result<PriceBreakdown> {
        let tier = self.resolve(quantity)?;
        let savings_per_unit = unit_price.percent(tier.discount_percent);
        // percent() preserves the currency, so this mismatch cannot occur;
        // propagate it anyway rather than keeping a panic path.
        let discounted_unit_price =
            unit_price.subtract(&savings_per_unit).map_err(|_| CommerceError::CurrencyMismatch {
                expected: unit_price.currency().to_string(),
                actual: savings_per_unit.currency().to_string(),
            })?;
        Ok(PriceBreakdown {
            tier_label: tier.label.clone(),
            discount_percent: tier.discount_percent,
            quantity,
            unit_price: unit_price.clone(),
            discounted_unit_price: discounted_unit_price.clone(),
            savings_per_unit: savings_per_unit.clone(),
            total_price: discounted_unit_price.multiply(quantity),
            total_savings: savings_per_unit.multiply(quantity),
        })
    }
}

impl Default for TierTable {
    fn default() -> Self { Self::standard() }
}

/// Result of pricing a (unit price, quantity) pair against the tier table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub tier_label: String,
    pub discount_percent: Decimal,
    pub quantity: u32,
    pub unit_price: Money,
    pub discounted_unit_price: Money,
    pub savings_per_unit: Money,
    pub total_price: Money,
    pub total_savings: Money,
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prop_resolution_is_total_and_unique() {
        let table = TierTable::standard();
        proptest!(|(quantity in 1u32..=10_000)| {
            let tier = table.resolve(quantity).unwrap();
            let matching = table.tiers().iter().filter(|t| t.matches(quantity)).count();
            prop_assert_eq!(matching, 1);
            prop_assert!(tier.matches(quantity));
        });
    }

    #[test]
    fn prop_discounted_unit_price_never_increases_with_quantity() {
        let table = TierTable::standard();
        proptest!(|(quantity in 1u32..=5_000, price_cents in 1u32..=100_000)| {
            let unit = Money::usd(Decimal::from(price_cents) / Decimal::from(100));
            let here = table.price(&unit, quantity).unwrap();
            let next = table.price(&unit, quantity + 1).unwrap();
            prop_assert!(next.discounted_unit_price.amount() <= here.discounted_unit_price.amount());
        });
    }
}

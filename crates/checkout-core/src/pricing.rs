//! # Pricing Engine
//!
//! Deterministic total-cost computation for a cart. No I/O, no side effects.
//!
//! ```text
//! subtotal      = Σ price × qty
//! discount      = round_half_up(subtotal × tier_rate(subtotal), 2)
//! discounted    = subtotal - discount
//! weight        = Σ weight × qty                      (must be > 0)
//! shipping      = weight × band_multiplier(weight) + fragile_units × surcharge
//! total         = discounted + discounted + shipping
//! ```
//!
//! The final line adds the discounted subtotal twice. That is the observed
//! behaviour of the pricing this engine replaces and is kept on purpose until
//! the business confirms the intended formula; see DESIGN.md.

use crate::cart::Cart;
use crate::customer::{CustomerTier, Region};
use crate::error::{CheckoutError, CheckoutResult};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Volume discount applied when the pre-discount subtotal reaches `min_subtotal`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountTier {
    /// Inclusive lower bound on the merchandise subtotal
    pub min_subtotal: Decimal,
    /// Fraction taken off (0.10 = 10%)
    pub rate: Decimal,
}

/// Shipping multiplier for total weights up to `max_weight` (inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBand {
    /// Inclusive upper bound in kg; `None` means unbounded
    #[serde(default)]
    pub max_weight: Option<Decimal>,
    /// Cost per kg
    pub multiplier: Decimal,
}

/// Discount and shipping tables used by [`PricingEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Sorted by ascending `min_subtotal`
    pub discount_tiers: Vec<DiscountTier>,
    /// Sorted by ascending `max_weight`, last band unbounded
    pub weight_bands: Vec<WeightBand>,
    /// Added once per fragile unit
    pub fragile_surcharge_per_unit: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            discount_tiers: vec![
                DiscountTier {
                    min_subtotal: Decimal::from(500),
                    rate: Decimal::new(10, 2),
                },
                DiscountTier {
                    min_subtotal: Decimal::from(1000),
                    rate: Decimal::new(20, 2),
                },
            ],
            // The lightest band multiplies by 1, so shipping equals the weight
            // rather than being free.
            weight_bands: vec![
                WeightBand {
                    max_weight: Some(Decimal::from(5)),
                    multiplier: Decimal::ONE,
                },
                WeightBand {
                    max_weight: Some(Decimal::from(10)),
                    multiplier: Decimal::from(2),
                },
                WeightBand {
                    max_weight: Some(Decimal::from(50)),
                    multiplier: Decimal::from(4),
                },
                WeightBand {
                    max_weight: None,
                    multiplier: Decimal::from(7),
                },
            ],
            fragile_surcharge_per_unit: Decimal::from(5),
        }
    }
}

impl PricingRules {
    /// Load rules from a TOML string and validate them
    pub fn from_toml(toml_str: &str) -> CheckoutResult<Self> {
        let rules: PricingRules = toml::from_str(toml_str)
            .map_err(|e| CheckoutError::Configuration(format!("invalid pricing rules: {}", e)))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reject tables the engine cannot evaluate unambiguously
    pub fn validate(&self) -> CheckoutResult<()> {
        let config_err = |msg: &str| Err(CheckoutError::Configuration(msg.to_string()));

        for tier in &self.discount_tiers {
            if tier.rate < Decimal::ZERO || tier.rate > Decimal::ONE {
                return config_err("discount rate must be between 0 and 1");
            }
            if tier.min_subtotal < Decimal::ZERO {
                return config_err("discount threshold must be non-negative");
            }
        }
        if self
            .discount_tiers
            .windows(2)
            .any(|w| w[0].min_subtotal >= w[1].min_subtotal)
        {
            return config_err("discount tiers must be sorted by ascending threshold");
        }

        let Some((last, bounded)) = self.weight_bands.split_last() else {
            return config_err("at least one weight band is required");
        };
        if last.max_weight.is_some() {
            return config_err("last weight band must be unbounded");
        }
        let mut previous = Decimal::ZERO;
        for band in bounded {
            match band.max_weight {
                Some(max) if max > previous => previous = max,
                Some(_) => {
                    return config_err("weight bands must be sorted by ascending bound")
                }
                None => return config_err("only the last weight band may be unbounded"),
            }
        }
        if self
            .weight_bands
            .iter()
            .any(|b| b.multiplier < Decimal::ZERO)
        {
            return config_err("weight multipliers must be non-negative");
        }

        if self.fragile_surcharge_per_unit < Decimal::ZERO {
            return config_err("fragile surcharge must be non-negative");
        }
        Ok(())
    }

    /// Discount rate for a pre-discount subtotal
    pub fn discount_rate(&self, subtotal: Decimal) -> Decimal {
        self.discount_tiers
            .iter()
            .rev()
            .find(|tier| subtotal >= tier.min_subtotal)
            .map(|tier| tier.rate)
            .unwrap_or(Decimal::ZERO)
    }

    /// Shipping multiplier for a positive total weight
    pub fn weight_multiplier(&self, weight: Decimal) -> CheckoutResult<Decimal> {
        self.weight_bands
            .iter()
            .find(|band| band.max_weight.map_or(true, |max| weight <= max))
            .map(|band| band.multiplier)
            .ok_or_else(|| {
                CheckoutError::Configuration(format!("no weight band covers {} kg", weight))
            })
    }
}

/// Every intermediate value of a pricing run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discount_rate: Decimal,
    pub discount: Decimal,
    pub discounted_subtotal: Decimal,
    pub total_weight: Decimal,
    pub weight_multiplier: Decimal,
    pub base_shipping: Decimal,
    pub fragile_units: u64,
    pub fragile_surcharge: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Computes checkout totals from a cart and a set of [`PricingRules`]
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    rules: PricingRules,
}

impl PricingEngine {
    /// Create an engine over a validated rule table
    pub fn new(rules: PricingRules) -> CheckoutResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Total amount to charge for `cart`.
    ///
    /// `region` and `tier` are accepted for regional and loyalty pricing but
    /// do not affect the result yet.
    pub fn compute_total_cost(
        &self,
        cart: &Cart,
        region: Region,
        tier: CustomerTier,
    ) -> CheckoutResult<Decimal> {
        self.quote(cart, region, tier).map(|breakdown| breakdown.total)
    }

    /// Full breakdown of the amount to charge for `cart`
    pub fn quote(
        &self,
        cart: &Cart,
        _region: Region,
        _tier: CustomerTier,
    ) -> CheckoutResult<PriceBreakdown> {
        let mut subtotal = Decimal::ZERO;
        let mut total_weight = Decimal::ZERO;
        let mut fragile_units: u64 = 0;

        for item in &cart.items {
            let weight = item.product.validate()?;
            if item.quantity == 0 {
                return Err(CheckoutError::InvalidProduct(format!(
                    "line for product {} has zero quantity",
                    item.product.id
                )));
            }

            let quantity = Decimal::from(item.quantity);
            subtotal = checked_add(subtotal, checked_mul(item.product.price, quantity)?)?;
            total_weight = checked_add(total_weight, checked_mul(weight, quantity)?)?;
            if item.product.fragile {
                fragile_units = fragile_units.checked_add(item.quantity).ok_or_else(overflow)?;
            }
        }

        if total_weight <= Decimal::ZERO {
            return Err(CheckoutError::InvalidProduct(
                "cart total weight must be positive".to_string(),
            ));
        }

        let discount_rate = self.rules.discount_rate(subtotal);
        let discount = checked_mul(subtotal, discount_rate)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let discounted_subtotal = subtotal - discount;

        let weight_multiplier = self.rules.weight_multiplier(total_weight)?;
        let base_shipping = checked_mul(total_weight, weight_multiplier)?;
        let fragile_surcharge = checked_mul(
            Decimal::from(fragile_units),
            self.rules.fragile_surcharge_per_unit,
        )?;
        let shipping = checked_add(base_shipping, fragile_surcharge)?;

        let total = checked_add(
            checked_add(discounted_subtotal, discounted_subtotal)?,
            shipping,
        )?;

        Ok(PriceBreakdown {
            subtotal,
            discount_rate,
            discount,
            discounted_subtotal,
            total_weight,
            weight_multiplier,
            base_shipping,
            fragile_units,
            fragile_surcharge,
            shipping,
            total,
        })
    }
}

fn overflow() -> CheckoutError {
    CheckoutError::InvalidProduct("cart amounts overflow".to_string())
}

fn checked_mul(a: Decimal, b: Decimal) -> CheckoutResult<Decimal> {
    a.checked_mul(b).ok_or_else(overflow)
}

fn checked_add(a: Decimal, b: Decimal) -> CheckoutResult<Decimal> {
    a.checked_add(b).ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;
    use rust_decimal_macros::dec;

    fn engine() -> PricingEngine {
        PricingEngine::default()
    }

    fn single(price: Decimal, weight: Decimal, quantity: u64) -> Cart {
        Cart::new(1, 1).with_product(Product::new(1, "Basic", price, weight), quantity)
    }

    fn total(cart: &Cart) -> Decimal {
        engine()
            .compute_total_cost(cart, Region::Northeast, CustomerTier::Gold)
            .unwrap()
    }

    #[test]
    fn test_discount_rate_boundaries() {
        let rules = PricingRules::default();
        assert_eq!(rules.discount_rate(dec!(0)), dec!(0));
        assert_eq!(rules.discount_rate(dec!(499.99)), dec!(0));
        assert_eq!(rules.discount_rate(dec!(500)), dec!(0.10));
        assert_eq!(rules.discount_rate(dec!(999.99)), dec!(0.10));
        assert_eq!(rules.discount_rate(dec!(1000)), dec!(0.20));
        assert_eq!(rules.discount_rate(dec!(25000)), dec!(0.20));
    }

    #[test]
    fn test_weight_multiplier_boundaries() {
        let rules = PricingRules::default();
        assert_eq!(rules.weight_multiplier(dec!(0.1)).unwrap(), dec!(1));
        assert_eq!(rules.weight_multiplier(dec!(5)).unwrap(), dec!(1));
        assert_eq!(rules.weight_multiplier(dec!(5.1)).unwrap(), dec!(2));
        assert_eq!(rules.weight_multiplier(dec!(10)).unwrap(), dec!(2));
        assert_eq!(rules.weight_multiplier(dec!(10.01)).unwrap(), dec!(4));
        assert_eq!(rules.weight_multiplier(dec!(50)).unwrap(), dec!(4));
        assert_eq!(rules.weight_multiplier(dec!(50.5)).unwrap(), dec!(7));
    }

    #[test]
    fn test_single_product_ten_percent_tier() {
        // 500 subtotal -> 450 discounted, 5kg -> band 1 -> 5.00 shipping
        let cart = single(dec!(100.00), dec!(1), 5);
        let breakdown = engine()
            .quote(&cart, Region::South, CustomerTier::Silver)
            .unwrap();

        assert_eq!(breakdown.subtotal, dec!(500));
        assert_eq!(breakdown.discount, dec!(50.00));
        assert_eq!(breakdown.discounted_subtotal, dec!(450));
        assert_eq!(breakdown.total_weight, dec!(5));
        assert_eq!(breakdown.shipping, dec!(5));
        assert_eq!(breakdown.total, dec!(905.00));
    }

    #[test]
    fn test_mixed_cart_with_fragile_line() {
        let cart = Cart::new(1, 1)
            .with_product(Product::new(1, "Mug", dec!(100.00), dec!(1)), 5)
            .with_product(Product::new(2, "Vase", dec!(200.00), dec!(2)).fragile(), 3);
        let breakdown = engine()
            .quote(&cart, Region::North, CustomerTier::Bronze)
            .unwrap();

        assert_eq!(breakdown.subtotal, dec!(1100));
        assert_eq!(breakdown.discounted_subtotal, dec!(880));
        assert_eq!(breakdown.total_weight, dec!(11));
        assert_eq!(breakdown.base_shipping, dec!(44));
        assert_eq!(breakdown.fragile_units, 3);
        assert_eq!(breakdown.fragile_surcharge, dec!(15));
        assert_eq!(breakdown.shipping, dec!(59));
        assert_eq!(breakdown.total, dec!(1819.00));
    }

    #[test]
    fn test_shipping_by_weight_band() {
        // Zero-priced goods isolate shipping: total == shipping
        for (weight, expected) in [
            (dec!(5.00), dec!(5.00)),
            (dec!(5.1), dec!(10.20)),
            (dec!(6.00), dec!(12.00)),
            (dec!(10.00), dec!(20.00)),
            (dec!(11.00), dec!(44.00)),
            (dec!(50.00), dec!(200.00)),
            (dec!(60.00), dec!(420.00)),
        ] {
            assert_eq!(total(&single(dec!(0), weight, 1)), expected, "weight {}", weight);
        }
    }

    #[test]
    fn test_fragile_surcharge_after_weight_shipping() {
        let cart = Cart::new(1, 1)
            .with_product(Product::new(1, "Glass", dec!(1), dec!(1)).fragile(), 5);
        let breakdown = engine()
            .quote(&cart, Region::Midwest, CustomerTier::Gold)
            .unwrap();

        assert_eq!(breakdown.base_shipping, dec!(5));
        assert_eq!(breakdown.fragile_surcharge, dec!(25));
        // 5 + 5 + (5 + 25)
        assert_eq!(breakdown.total, dec!(40));
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 10% of 500.05 is 50.005, a midpoint
        let cart = single(dec!(500.05), dec!(1), 1);
        let breakdown = engine()
            .quote(&cart, Region::South, CustomerTier::Gold)
            .unwrap();

        assert_eq!(breakdown.discount, dec!(50.01));
        assert_eq!(breakdown.discounted_subtotal, dec!(450.04));
    }

    #[test]
    fn test_discount_evaluated_on_pre_discount_subtotal() {
        // 1000 drops to 800 after discount but still earns the 20% tier
        let breakdown = engine()
            .quote(&single(dec!(1000), dec!(1), 1), Region::South, CustomerTier::Gold)
            .unwrap();
        assert_eq!(breakdown.discount_rate, dec!(0.20));
        assert_eq!(breakdown.discounted_subtotal, dec!(800));
    }

    #[test]
    fn test_region_and_tier_do_not_change_total() {
        let cart = single(dec!(250), dec!(3), 3);
        let base = engine()
            .compute_total_cost(&cart, Region::North, CustomerTier::Bronze)
            .unwrap();
        for region in [Region::Northeast, Region::Midwest, Region::Southeast, Region::South] {
            for tier in [CustomerTier::Gold, CustomerTier::Silver, CustomerTier::Bronze] {
                assert_eq!(engine().compute_total_cost(&cart, region, tier).unwrap(), base);
            }
        }
    }

    #[test]
    fn test_invalid_products_fail() {
        let missing_weight = Cart::new(1, 1)
            .with_product(Product::new(1, "Orange", dec!(10), dec!(1)).without_weight(), 10);
        let zero_weight = single(dec!(10), dec!(0), 1);
        let negative_weight = single(dec!(10), dec!(-2), 1);
        let negative_price = single(dec!(-1), dec!(1), 10);

        for cart in [missing_weight, zero_weight, negative_weight, negative_price] {
            let result = engine().compute_total_cost(&cart, Region::Northeast, CustomerTier::Gold);
            assert!(matches!(result, Err(CheckoutError::InvalidProduct(_))));
        }
    }

    #[test]
    fn test_invalid_line_anywhere_in_cart_fails() {
        let cart = Cart::new(1, 1)
            .with_product(Product::new(1, "Fine", dec!(10), dec!(1)), 1)
            .with_product(Product::new(2, "Broken", dec!(10), dec!(1)).without_weight(), 1);
        assert!(engine()
            .compute_total_cost(&cart, Region::South, CustomerTier::Gold)
            .is_err());
    }

    #[test]
    fn test_empty_cart_has_no_weight() {
        let result = engine().compute_total_cost(&Cart::new(1, 1), Region::South, CustomerTier::Gold);
        assert!(matches!(result, Err(CheckoutError::InvalidProduct(_))));
    }

    #[test]
    fn test_zero_quantity_line_rejected() {
        let result = engine().compute_total_cost(
            &single(dec!(10), dec!(1), 0),
            Region::South,
            CustomerTier::Gold,
        );
        assert!(matches!(result, Err(CheckoutError::InvalidProduct(_))));
    }

    #[test]
    fn test_default_rules_are_valid() {
        assert!(PricingRules::default().validate().is_ok());
    }

    #[test]
    fn test_rules_from_toml() {
        let rules = PricingRules::from_toml(
            r#"
            fragile_surcharge_per_unit = "3"

            [[discount_tiers]]
            min_subtotal = "200"
            rate = "0.05"

            [[weight_bands]]
            max_weight = "20"
            multiplier = "1.5"

            [[weight_bands]]
            multiplier = "3"
            "#,
        )
        .unwrap();

        assert_eq!(rules.discount_rate(dec!(250)), dec!(0.05));
        assert_eq!(rules.weight_multiplier(dec!(20)).unwrap(), dec!(1.5));
        assert_eq!(rules.weight_multiplier(dec!(21)).unwrap(), dec!(3));
        assert_eq!(rules.fragile_surcharge_per_unit, dec!(3));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let mut unsorted = PricingRules::default();
        unsorted.discount_tiers.reverse();
        assert!(matches!(
            unsorted.validate(),
            Err(CheckoutError::Configuration(_))
        ));

        let mut bounded_tail = PricingRules::default();
        bounded_tail.weight_bands.pop();
        assert!(bounded_tail.validate().is_err());

        let mut no_bands = PricingRules::default();
        no_bands.weight_bands.clear();
        assert!(no_bands.validate().is_err());

        let mut bad_rate = PricingRules::default();
        bad_rate.discount_tiers[0].rate = dec!(1.5);
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn test_engine_rejects_bounded_last_band() {
        let mut rules = PricingRules::default();
        rules.weight_bands.pop();

        assert!(matches!(
            PricingEngine::new(rules.clone()),
            Err(CheckoutError::Configuration(_))
        ));
        // Heavier than every remaining band
        assert!(matches!(
            rules.weight_multiplier(dec!(60)),
            Err(CheckoutError::Configuration(_))
        ));
    }

    #[test]
    fn test_engine_accepts_default_rules() {
        let engine = PricingEngine::new(PricingRules::default()).unwrap();
        let cart = single(dec!(10), dec!(60), 1);

        let breakdown = engine
            .quote(&cart, Region::North, CustomerTier::Bronze)
            .unwrap();
        assert_eq!(breakdown.weight_multiplier, dec!(7));
        assert_eq!(breakdown.shipping, dec!(420));
    }
}

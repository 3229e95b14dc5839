use packmule_primitives::models::app_config::PricingInfo;
use packmule_primitives::models::dtos::booking_dto::Amounts;

pub struct PricingService;

impl PricingService {
    /// Pure quote arithmetic. No rounding happens here: currency rounding is
    /// deferred to the minor-unit conversion at the processor boundary.
    /// Inputs are not validated either: callers own validation, and
    /// negative inputs map through symmetrically.
    pub fn compute_amounts(
        weight_kg: f64,
        price_per_kg: f64,
        declared_value: f64,
        insurance_opted: bool,
        pricing: &PricingInfo,
    ) -> Amounts {
        let transport_price = weight_kg * price_per_kg;
        let commission_amount = transport_price * pricing.commission_rate;
        let insurance_premium = if insurance_opted {
            declared_value * pricing.insurance_rate + pricing.insurance_base_fee
        } else {
            0.0
        };
        let total_amount = transport_price + commission_amount + insurance_premium;

        Amounts {
            transport_price,
            commission_amount,
            insurance_premium,
            total_amount,
        }
    }

    /// Convert a major-unit amount to processor minor units, rounding
    /// half-up.
    pub fn to_minor_units(amount: f64) -> i64 {
        (amount * 100.0).round() as i64
    }

    /// Exact inverse of `to_minor_units` for any two-decimal amount.
    pub fn from_minor_units(minor: i64) -> f64 {
        minor as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricing() -> PricingInfo {
        PricingInfo {
            commission_rate: 0.12,
            insurance_rate: 0.03,
            insurance_base_fee: 0.0,
        }
    }

    #[test]
    fn quote_without_insurance() {
        // 5 kg at 10/kg, 12% commission, no insurance
        let amounts = PricingService::compute_amounts(5.0, 10.0, 100.0, false, &pricing());

        assert_eq!(amounts.transport_price, 50.0);
        assert_eq!(amounts.commission_amount, 6.0);
        assert_eq!(amounts.insurance_premium, 0.0);
        assert_eq!(amounts.total_amount, 56.0);
    }

    #[test]
    fn quote_with_insurance() {
        // 10 kg at 10/kg, declared value 100, 3% insurance, no base fee
        let amounts = PricingService::compute_amounts(10.0, 10.0, 100.0, true, &pricing());

        assert_eq!(amounts.transport_price, 100.0);
        assert_eq!(amounts.commission_amount, 12.0);
        assert_eq!(amounts.insurance_premium, 3.0);
        assert_eq!(amounts.total_amount, 115.0);
    }

    #[test]
    fn insurance_base_fee_applies_only_when_opted() {
        let with_base = PricingInfo {
            insurance_base_fee: 2.5,
            ..pricing()
        };

        let opted = PricingService::compute_amounts(1.0, 10.0, 200.0, true, &with_base);
        assert_eq!(opted.insurance_premium, 8.5);

        let skipped = PricingService::compute_amounts(1.0, 10.0, 200.0, false, &with_base);
        assert_eq!(skipped.insurance_premium, 0.0);
    }

    #[test]
    fn quote_is_deterministic() {
        let a = PricingService::compute_amounts(7.25, 12.5, 320.0, true, &pricing());
        let b = PricingService::compute_amounts(7.25, 12.5, 320.0, true, &pricing());

        assert_eq!(a.transport_price.to_bits(), b.transport_price.to_bits());
        assert_eq!(a.commission_amount.to_bits(), b.commission_amount.to_bits());
        assert_eq!(a.insurance_premium.to_bits(), b.insurance_premium.to_bits());
        assert_eq!(a.total_amount.to_bits(), b.total_amount.to_bits());
    }

    #[test]
    fn commission_invariant_holds() {
        let cfg = pricing();
        for (weight, price) in [(0.5, 3.0), (5.0, 10.0), (12.75, 8.4), (49.9, 22.1)] {
            let amounts = PricingService::compute_amounts(weight, price, 150.0, false, &cfg);
            let expected = amounts.transport_price * cfg.commission_rate;
            assert!((amounts.commission_amount - expected).abs() < 1e-9);
            assert!(
                (amounts.total_amount
                    - (amounts.transport_price
                        + amounts.commission_amount
                        + amounts.insurance_premium))
                    .abs()
                    < 1e-9
            );
        }
    }

    #[test]
    fn negative_inputs_map_through() {
        // documented edge: this layer reproduces negatives, it does not fix them
        let amounts = PricingService::compute_amounts(-5.0, 10.0, 100.0, false, &pricing());

        assert_eq!(amounts.transport_price, -50.0);
        assert_eq!(amounts.commission_amount, -6.0);
        assert_eq!(amounts.total_amount, -56.0);
    }

    #[test]
    fn minor_units_round_half_up() {
        assert_eq!(PricingService::to_minor_units(56.0), 5600);
        assert_eq!(PricingService::to_minor_units(12.344), 1234);
        // exact halves go up
        assert_eq!(PricingService::to_minor_units(0.125), 13);
        assert_eq!(PricingService::to_minor_units(0.29), 29);
    }

    #[test]
    fn minor_units_round_trip() {
        // every amount expressible to two decimals survives the round trip
        for minor in (0..=100_000).step_by(7) {
            let amount = minor as f64 / 100.0;
            assert_eq!(
                PricingService::from_minor_units(PricingService::to_minor_units(amount)),
                amount
            );
        }
    }
}

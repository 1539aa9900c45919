use crate::domain::config::PricingConfig;
use crate::domain::money::Money;
use crate::domain::quote::{AddOnLine, QuoteBreakdown, QuoteRequest, SquareFeet, Zipcode};

/// Computes itemized quotes against one configuration snapshot.
///
/// `PricingEngine` only borrows its configuration and keeps no other state, so any
/// number of engines may price requests concurrently over a shared snapshot.
/// Identical inputs always produce identical breakdowns.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine<'a> {
    config: &'a PricingConfig,
}

impl<'a> PricingEngine<'a> {
    pub fn new(config: &'a PricingConfig) -> Self {
        Self { config }
    }

    /// Prices a request.
    pub fn quote(&self, request: &QuoteRequest) -> QuoteBreakdown {
        let rates = &self.config.rates;

        let sqft_charge = self.sqft_charge(request.square_footage);
        let hvac_charge = self.hvac_charge(request.additional_hvac_systems);
        let zipcode_charge = self.zipcode_charge(request.zipcode.as_str());

        let subtotal = sqft_charge + hvac_charge + zipcode_charge;
        let discount = subtotal.percent_of(rates.partner_discount_percent);
        let total = subtotal.saturating_sub(discount);

        let clean_and_seal_price =
            self.clean_and_seal_price(request.square_footage, request.additional_hvac_systems);
        let clean_and_seal_discount =
            clean_and_seal_price.percent_of(rates.partner_discount_percent);
        let clean_and_seal_total =
            clean_and_seal_price.saturating_sub(clean_and_seal_discount);

        let add_ons = self.add_on_lines(&request.services);
        let add_on_total: Money = add_ons.iter().map(|line| line.price).sum();

        QuoteBreakdown {
            sqft_charge,
            hvac_charge,
            zipcode_charge,
            subtotal,
            discount,
            total,
            clean_and_seal_price,
            clean_and_seal_discount,
            clean_and_seal_total,
            add_ons,
            add_on_total,
        }
    }

    /// Square-footage charge from the first matching tier.
    pub fn sqft_charge(&self, square_footage: SquareFeet) -> Money {
        self.config.rates.sqft_tiers.price_for(square_footage.value())
    }

    pub fn hvac_charge(&self, additional_hvac_systems: u32) -> Money {
        self.config.rates.per_additional_hvac_charge * additional_hvac_systems
    }

    /// Surcharge for a zipcode, after stripping spaces and hyphens.
    ///
    /// Zipcodes missing from the table carry no surcharge.
    pub fn zipcode_charge(&self, zipcode: &str) -> Money {
        self.config
            .zipcode_charges
            .get(&Zipcode::normalize(zipcode))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    /// Clean & Seal price.
    ///
    /// With no additional systems the price comes from the Clean & Seal tier table.
    /// Otherwise every unit (additional systems plus the bundled one) is charged the
    /// per-unit rate, so the price jumps between zero and one additional system.
    pub fn clean_and_seal_price(
        &self,
        square_footage: SquareFeet,
        additional_hvac_systems: u32,
    ) -> Money {
        let rates = &self.config.rates;
        if additional_hvac_systems == 0 {
            rates.clean_and_seal_tiers.price_for(square_footage.value())
        } else {
            rates.clean_and_seal_per_unit * additional_hvac_systems.saturating_add(1)
        }
    }

    /// Lines for selected add-ons; unknown and hidden services are skipped.
    pub fn add_on_lines(&self, selected: &[String]) -> Vec<AddOnLine> {
        selected
            .iter()
            .filter_map(|key| self.config.add_on_services.get(key))
            .filter(|service| !service.hidden)
            .map(|service| AddOnLine {
                key: service.key.clone(),
                description: service.description.clone(),
                price: service.price,
            })
            .collect()
    }
}

/// Prices `request` against `config`.
pub fn compute_quote(request: &QuoteRequest, config: &PricingConfig) -> QuoteBreakdown {
    PricingEngine::new(config).quote(request)
}

/// Zipcode surcharge lookup; see [`PricingEngine::zipcode_charge`].
pub fn compute_zipcode_charge(zipcode: &str, config: &PricingConfig) -> Money {
    PricingEngine::new(config).zipcode_charge(zipcode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{AddOnService, PricingRates};
    use rust_decimal_macros::dec;

    fn config() -> PricingConfig {
        PricingConfig::new(PricingRates::standard().unwrap())
            .with_zipcode_charge("84101", Money::from(50))
            .with_zipcode_charge("84010", Money::from(100))
    }

    fn request(sqft: u32, hvac: u32, zip: &str) -> QuoteRequest {
        QuoteRequest::new(
            SquareFeet::new(sqft.into()).unwrap(),
            hvac,
            Zipcode::parse(zip).unwrap(),
        )
    }

    #[test]
    fn test_single_system_mid_tier() {
        let q = compute_quote(&request(1500, 0, "84003"), &config());
        assert_eq!(q.sqft_charge, Money::from(450));
        assert_eq!(q.hvac_charge, Money::ZERO);
        assert_eq!(q.zipcode_charge, Money::ZERO);
        assert_eq!(q.subtotal, Money::from(450));
        assert_eq!(q.discount, Money::from(90));
        assert_eq!(q.total, Money::from(360));
        assert_eq!(q.clean_and_seal_price, Money::from(2500));
    }

    #[test]
    fn test_additional_systems_with_surcharge() {
        let q = compute_quote(&request(2500, 2, "84101"), &config());
        assert_eq!(q.sqft_charge, Money::from(500));
        assert_eq!(q.hvac_charge, Money::from(600));
        assert_eq!(q.zipcode_charge, Money::from(50));
        assert_eq!(q.subtotal, Money::from(1150));
        assert_eq!(q.discount, Money::from(230));
        assert_eq!(q.total, Money::from(920));
        assert_eq!(q.clean_and_seal_price, Money::from(6000));
    }

    #[test]
    fn test_top_tier_and_unknown_zipcode() {
        let q = compute_quote(&request(12000, 0, "99999"), &config());
        assert_eq!(q.sqft_charge, Money::from(900));
        assert_eq!(q.zipcode_charge, Money::ZERO);
        assert_eq!(q.clean_and_seal_price, Money::from(3750));
    }

    #[test]
    fn test_zero_square_feet() {
        let q = compute_quote(&request(0, 0, "84010"), &config());
        assert_eq!(q.sqft_charge, Money::from(400));
        assert_eq!(q.zipcode_charge, Money::from(100));
        assert_eq!(q.subtotal, Money::from(500));
        assert_eq!(q.discount, Money::from(100));
        assert_eq!(q.total, Money::from(400));
    }

    #[test]
    fn test_clean_and_seal_discontinuity() {
        let cfg = config();
        let engine = PricingEngine::new(&cfg);
        let sqft = SquareFeet::new(dec!(1500)).unwrap();
        assert_eq!(engine.clean_and_seal_price(sqft, 0), Money::from(2500));
        assert_eq!(engine.clean_and_seal_price(sqft, 1), Money::from(4000));
        assert_eq!(engine.clean_and_seal_price(sqft, 4), Money::from(10000));
    }

    #[test]
    fn test_clean_and_seal_discount_uses_partner_percent() {
        let q = compute_quote(&request(1500, 0, "84003"), &config());
        assert_eq!(q.clean_and_seal_discount, Money::from(500));
        assert_eq!(q.clean_and_seal_total, Money::from(2000));

        let mut cfg = config();
        cfg.rates.partner_discount_percent =
            crate::domain::money::Percent::new(dec!(10)).unwrap();
        let q = compute_quote(&request(1500, 0, "84003"), &cfg);
        assert_eq!(q.discount, Money::from(45));
        assert_eq!(q.clean_and_seal_total, Money::from(2250));
    }

    #[test]
    fn test_zero_discount() {
        let mut cfg = config();
        cfg.rates.partner_discount_percent = crate::domain::money::Percent::ZERO;
        let q = compute_quote(&request(2500, 1, "84101"), &cfg);
        assert_eq!(q.discount, Money::ZERO);
        assert_eq!(q.total, q.subtotal);
    }

    #[test]
    fn test_zipcode_charge_normalizes_input() {
        let cfg = config();
        assert_eq!(compute_zipcode_charge("84-101", &cfg), Money::from(50));
        assert_eq!(compute_zipcode_charge(" 84010 ", &cfg), Money::from(100));
        assert_eq!(compute_zipcode_charge("00000", &cfg), Money::ZERO);
    }

    #[test]
    fn test_add_ons_are_listed_but_not_totalled() {
        let mut hidden = AddOnService::new("sanitize", Money::from(150), "Sanitizer fogging");
        hidden.hidden = true;
        let cfg = config()
            .with_service(AddOnService::new("dryer_vent", Money::from(99), "Dryer vent cleaning"))
            .with_service(hidden);

        let req = request(1500, 0, "84003").with_services(["dryer_vent", "sanitize", "unknown"]);
        let q = compute_quote(&req, &cfg);

        assert_eq!(q.add_ons.len(), 1);
        assert_eq!(q.add_ons[0].key, "dryer_vent");
        assert_eq!(q.add_on_total, Money::from(99));
        assert_eq!(q.subtotal, Money::from(450));
        assert_eq!(q.total, Money::from(360));
    }

    #[test]
    fn test_extreme_rates_do_not_panic() {
        let mut cfg = config();
        cfg.rates.clean_and_seal_per_unit = Money::MAX;
        cfg.rates.per_additional_hvac_charge = Money::MAX;

        let q = compute_quote(&request(2500, u32::MAX, "84101"), &cfg);
        assert_eq!(q.hvac_charge, Money::MAX * u32::MAX);
        assert!(q.total <= q.subtotal);
        assert!(q.clean_and_seal_total <= q.clean_and_seal_price);
    }

    #[test]
    fn test_config_is_not_mutated() {
        let cfg = config();
        let before = cfg.clone();
        let first = compute_quote(&request(2500, 2, "84101"), &cfg);
        let second = compute_quote(&request(2500, 2, "84101"), &cfg);
        assert_eq!(first, second);
        assert_eq!(cfg, before);
    }
}

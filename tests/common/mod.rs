use ductquote::domain::config::{AddOnService, PricingConfig, PricingRates};
use ductquote::domain::money::Money;
use ductquote::domain::quote::{QuoteRequest, SquareFeet, Zipcode};
use rust_decimal::Decimal;

/// Standard rates with the surcharges used across the integration tests.
pub fn standard_config() -> PricingConfig {
    PricingConfig::new(PricingRates::standard().unwrap())
        .with_zipcode_charge("84101", Money::from(50))
        .with_zipcode_charge("84010", Money::from(100))
        .with_service(AddOnService::new("dryer_vent", Money::from(99), "Dryer vent cleaning"))
}

pub fn request(sqft: Decimal, hvac: u32, zipcode: &str) -> QuoteRequest {
    QuoteRequest::new(
        SquareFeet::new(sqft).unwrap(),
        hvac,
        Zipcode::parse(zipcode).unwrap(),
    )
}

use super::money::{Money, Percent};
use super::quote::Zipcode;
use super::tier::{PriceTier, TierTable};
use crate::error::QuoteError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An optional line item offered alongside the main cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnService {
    pub key: String,
    pub price: Money,
    #[serde(default)]
    pub description: String,
    /// Hidden services stay in the catalog but cannot be selected.
    #[serde(default)]
    pub hidden: bool,
}

impl AddOnService {
    pub fn new(key: impl Into<String>, price: Money, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            price,
            description: description.into(),
            hidden: false,
        }
    }
}

/// The built-in part of the pricing configuration: tier tables and unit rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRates {
    pub sqft_tiers: TierTable,
    pub clean_and_seal_tiers: TierTable,
    pub clean_and_seal_per_unit: Money,
    pub per_additional_hvac_charge: Money,
    pub partner_discount_percent: Percent,
}

impl PricingRates {
    /// The business's standard rate card.
    pub fn standard() -> Result<Self, QuoteError> {
        let sqft_tiers = TierTable::new(vec![
            tier(0, Some(999), dec!(400))?,
            tier(1000, Some(1999), dec!(450))?,
            tier(2000, Some(2999), dec!(500))?,
            tier(3000, Some(3999), dec!(550))?,
            tier(4000, Some(4999), dec!(600))?,
            tier(5000, Some(5999), dec!(650))?,
            tier(6000, Some(6999), dec!(700))?,
            tier(7000, Some(7999), dec!(750))?,
            tier(8000, Some(8999), dec!(800))?,
            tier(9000, Some(9999), dec!(850))?,
            tier(10000, None, dec!(900))?,
        ])?;

        let clean_and_seal_tiers = TierTable::new(vec![
            tier(0, Some(1999), dec!(2500))?,
            tier(2000, Some(2999), dec!(2750))?,
            tier(3000, Some(3999), dec!(3000))?,
            tier(4000, Some(4999), dec!(3250))?,
            tier(5000, Some(5999), dec!(3500))?,
            tier(6000, None, dec!(3750))?,
        ])?;

        Ok(Self {
            sqft_tiers,
            clean_and_seal_tiers,
            clean_and_seal_per_unit: Money::new(dec!(2000))?,
            per_additional_hvac_charge: Money::new(dec!(300))?,
            partner_discount_percent: Percent::new(dec!(20))?,
        })
    }
}

fn tier(min: u32, max: Option<u32>, price: Decimal) -> Result<PriceTier, QuoteError> {
    Ok(PriceTier::new(min, max, Money::new(price)?))
}

/// Everything the pricing engine reads during one calculation.
///
/// Deserialization normalizes zipcode keys and rejects malformed or colliding
/// ones, and requires every add-on entry to be keyed by its own `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPricingConfig")]
pub struct PricingConfig {
    #[serde(flatten)]
    pub rates: PricingRates,
    /// Surcharge per normalized five-digit zipcode; absent zipcodes pay nothing.
    pub zipcode_charges: BTreeMap<String, Money>,
    pub add_on_services: BTreeMap<String, AddOnService>,
}

/// `PricingConfig` as written in a config file, before key validation.
#[derive(Deserialize)]
struct RawPricingConfig {
    #[serde(flatten)]
    rates: PricingRates,
    #[serde(default)]
    zipcode_charges: BTreeMap<String, Money>,
    #[serde(default)]
    add_on_services: BTreeMap<String, AddOnService>,
}

impl TryFrom<RawPricingConfig> for PricingConfig {
    type Error = QuoteError;

    fn try_from(raw: RawPricingConfig) -> Result<Self, Self::Error> {
        let mut config = PricingConfig::new(raw.rates);

        for (key, charge) in raw.zipcode_charges {
            let zipcode = Zipcode::parse(&key)?;
            if config.zipcode_charges.contains_key(zipcode.as_str()) {
                return Err(QuoteError::ValidationError(format!(
                    "Zipcode {zipcode} has more than one surcharge"
                )));
            }
            config.zipcode_charges.insert(zipcode.into(), charge);
        }

        for (key, service) in raw.add_on_services {
            if key != service.key {
                return Err(QuoteError::ValidationError(format!(
                    "Add-on service listed under {key:?} has key {:?}",
                    service.key
                )));
            }
            config.add_on_services.insert(key, service);
        }

        Ok(config)
    }
}

impl PricingConfig {
    pub fn new(rates: PricingRates) -> Self {
        Self {
            rates,
            zipcode_charges: BTreeMap::new(),
            add_on_services: BTreeMap::new(),
        }
    }

    /// Adds a surcharge; the key is normalized the same way lookups are.
    pub fn with_zipcode_charge(mut self, zipcode: &str, charge: Money) -> Self {
        self.zipcode_charges.insert(Zipcode::normalize(zipcode), charge);
        self
    }

    pub fn with_service(mut self, service: AddOnService) -> Self {
        self.add_on_services.insert(service.key.clone(), service);
        self
    }

    /// Logs tier tables that do not partition `[0, ∞)`.
    ///
    /// Such tables still price every input through the last-tier fallback.
    pub fn warn_on_coverage_issues(&self) {
        for (name, table) in [
            ("sqft_tiers", &self.rates.sqft_tiers),
            ("clean_and_seal_tiers", &self.rates.clean_and_seal_tiers),
        ] {
            for issue in table.coverage_issues() {
                tracing::warn!(table = name, %issue, "tier table does not cover all inputs");
            }
        }
    }
}

/// A fully populated configuration tagged with the version it was assembled at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub version: u64,
    pub config: Arc<PricingConfig>,
}

impl PricingSnapshot {
    pub fn new(version: u64, config: PricingConfig) -> Self {
        Self {
            version,
            config: Arc::new(config),
        }
    }
}

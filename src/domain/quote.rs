use super::money::Money;
use crate::error::QuoteError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized five-digit service-area zipcode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Zipcode(String);

impl Zipcode {
    /// Strips spaces and hyphens from raw user input.
    pub fn normalize(raw: &str) -> String {
        raw.chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect()
    }

    pub fn parse(raw: &str) -> Result<Self, QuoteError> {
        let normalized = Self::normalize(raw);
        if normalized.len() == 5 && normalized.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(normalized))
        } else {
            Err(QuoteError::ValidationError(format!(
                "Zipcode must be 5 digits, got {raw:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Zipcode {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Zipcode> for String {
    fn from(zipcode: Zipcode) -> Self {
        zipcode.0
    }
}

impl fmt::Display for Zipcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-negative floor area in square feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct SquareFeet(Decimal);

impl SquareFeet {
    pub fn new(value: Decimal) -> Result<Self, QuoteError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(QuoteError::ValidationError(format!(
                "Square footage must not be negative, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for SquareFeet {
    type Error = QuoteError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SquareFeet> for Decimal {
    fn from(sqft: SquareFeet) -> Self {
        sqft.0
    }
}

/// Inputs for a single quote calculation.
///
/// Field types carry the engine's preconditions: square footage cannot be negative,
/// the HVAC count is a non-negative integer, and the zipcode is already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub square_footage: SquareFeet,
    /// Systems beyond the first; `0` means the home has exactly one.
    pub additional_hvac_systems: u32,
    pub zipcode: Zipcode,
    /// Keys of selected add-on services.
    #[serde(default)]
    pub services: Vec<String>,
}

impl QuoteRequest {
    pub fn new(square_footage: SquareFeet, additional_hvac_systems: u32, zipcode: Zipcode) -> Self {
        Self {
            square_footage,
            additional_hvac_systems,
            zipcode,
            services: Vec::new(),
        }
    }

    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services.into_iter().map(Into::into).collect();
        self
    }

    /// Total HVAC units, counting the one bundled into square-footage pricing.
    pub fn total_hvac_units(&self) -> u32 {
        self.additional_hvac_systems.saturating_add(1)
    }
}

/// A selected add-on service, priced for display alongside the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnLine {
    pub key: String,
    pub description: String,
    pub price: Money,
}

/// Itemized result of a quote calculation.
///
/// `subtotal == sqft_charge + hvac_charge + zipcode_charge` and
/// `total == subtotal - discount`. Add-on lines are listed separately and never
/// enter the subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub sqft_charge: Money,
    pub hvac_charge: Money,
    pub zipcode_charge: Money,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub clean_and_seal_price: Money,
    pub clean_and_seal_discount: Money,
    pub clean_and_seal_total: Money,
    pub add_ons: Vec<AddOnLine>,
    pub add_on_total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zipcode_normalization() {
        assert_eq!(Zipcode::parse("84101").unwrap().as_str(), "84101");
        assert_eq!(Zipcode::parse(" 84 101 ").unwrap().as_str(), "84101");
        assert_eq!(Zipcode::parse("84-101").unwrap().as_str(), "84101");
    }

    #[test]
    fn test_zipcode_rejects_bad_input() {
        assert!(Zipcode::parse("8410").is_err());
        assert!(Zipcode::parse("841011").is_err());
        assert!(Zipcode::parse("84a01").is_err());
        assert!(Zipcode::parse("").is_err());
    }

    #[test]
    fn test_square_feet_rejects_negative() {
        assert!(SquareFeet::new(dec!(0)).is_ok());
        assert!(SquareFeet::new(dec!(1500.5)).is_ok());
        assert!(matches!(
            SquareFeet::new(dec!(-1)),
            Err(QuoteError::ValidationError(_))
        ));
    }

    #[test]
    fn test_request_deserialization() {
        let json = r#"{"square_footage": 1500, "additional_hvac_systems": 2, "zipcode": "84-101"}"#;
        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.square_footage.value(), dec!(1500));
        assert_eq!(request.total_hvac_units(), 3);
        assert_eq!(request.zipcode.as_str(), "84101");
        assert!(request.services.is_empty());
    }

    #[test]
    fn test_request_deserialization_rejects_out_of_contract_input() {
        let negative_sqft = r#"{"square_footage": -5, "additional_hvac_systems": 0, "zipcode": "84101"}"#;
        assert!(serde_json::from_str::<QuoteRequest>(negative_sqft).is_err());

        let negative_hvac = r#"{"square_footage": 5, "additional_hvac_systems": -1, "zipcode": "84101"}"#;
        assert!(serde_json::from_str::<QuoteRequest>(negative_hvac).is_err());

        let fractional_hvac = r#"{"square_footage": 5, "additional_hvac_systems": 1.5, "zipcode": "84101"}"#;
        assert!(serde_json::from_str::<QuoteRequest>(fractional_hvac).is_err());
    }
}

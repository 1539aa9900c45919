use super::quoting::Quote;
use crate::domain::money::Money;
use crate::domain::quote::{QuoteRequest, SquareFeet, Zipcode};
use crate::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAddress {
    pub street: String,
    pub city: String,
    pub state: String,
}

/// A technician's job intake: who, where, and what to price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    pub customer: Customer,
    pub address: ServiceAddress,
    #[serde(default)]
    pub notes: Option<String>,
    pub quote: QuoteRequest,
}

impl JobRequest {
    /// Checks the intake fields the pricing types do not already guarantee.
    pub fn validate(&self) -> Result<()> {
        if self.customer.name.trim().is_empty() {
            return Err(QuoteError::ValidationError(
                "Customer name is required".to_string(),
            ));
        }
        if self.customer.phone.as_deref().is_none_or(|p| p.trim().is_empty())
            && self.customer.email.as_deref().is_none_or(|e| e.trim().is_empty())
        {
            return Err(QuoteError::ValidationError(
                "A phone number or email is required".to_string(),
            ));
        }
        if self.address.street.trim().is_empty() || self.address.city.trim().is_empty() {
            return Err(QuoteError::ValidationError(
                "Street and city are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// The flat record handed to the CRM integration for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmission {
    pub customer_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: Zipcode,
    pub square_footage: SquareFeet,
    pub additional_hvac_systems: u32,
    pub services: Vec<String>,
    pub notes: Option<String>,
    pub sqft_charge: Money,
    pub hvac_charge: Money,
    pub zipcode_charge: Money,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub clean_and_seal_price: Money,
    pub clean_and_seal_total: Money,
    pub add_on_total: Money,
    pub config_version: u64,
}

impl JobSubmission {
    /// Builds the payload for `job` priced as `quote`.
    ///
    /// Fails if the job is incomplete or `quote` was priced for a different request.
    pub fn build(job: JobRequest, quote: Quote) -> Result<Self> {
        job.validate()?;
        if job.quote != quote.request {
            return Err(QuoteError::ValidationError(
                "Quote does not match the job request".to_string(),
            ));
        }

        let JobRequest {
            customer,
            address,
            notes,
            quote: request,
        } = job;
        let b = quote.breakdown;

        Ok(Self {
            customer_name: customer.name,
            phone: customer.phone,
            email: customer.email,
            street: address.street,
            city: address.city,
            state: address.state,
            zipcode: request.zipcode,
            square_footage: request.square_footage,
            additional_hvac_systems: request.additional_hvac_systems,
            services: b.add_ons.into_iter().map(|line| line.key).collect(),
            notes,
            sqft_charge: b.sqft_charge,
            hvac_charge: b.hvac_charge,
            zipcode_charge: b.zipcode_charge,
            subtotal: b.subtotal,
            discount: b.discount,
            total: b.total,
            clean_and_seal_price: b.clean_and_seal_price,
            clean_and_seal_total: b.clean_and_seal_total,
            add_on_total: b.add_on_total,
            config_version: quote.config_version,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

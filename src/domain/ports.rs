use super::config::{AddOnService, PricingSnapshot};
use super::money::Money;
use super::quote::Zipcode;
use crate::error::Result;
use async_trait::async_trait;

/// Zipcode surcharge records maintained by administrators.
#[async_trait]
pub trait ZipcodeStore: Send + Sync {
    async fn upsert(&self, zipcode: Zipcode, charge: Money) -> Result<()>;
    async fn get(&self, zipcode: &Zipcode) -> Result<Option<Money>>;
    /// Returns whether a record was removed.
    async fn remove(&self, zipcode: &Zipcode) -> Result<bool>;
    async fn get_all(&self) -> Result<Vec<(Zipcode, Money)>>;
}

/// Add-on service catalog records maintained by administrators.
#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn upsert(&self, service: AddOnService) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Option<AddOnService>>;
    async fn remove(&self, key: &str) -> Result<bool>;
    async fn get_all(&self) -> Result<Vec<AddOnService>>;
}

/// Version counter of the administrator catalog, kept next to the records it versions.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// The current version; a store that was never advanced reports 1.
    async fn current(&self) -> Result<u64>;
    /// Increments the version and returns the new value.
    async fn advance(&self) -> Result<u64>;
}

/// Produces the configuration snapshot a quote is calculated against.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<PricingSnapshot>;
}

pub type ZipcodeStoreBox = Box<dyn ZipcodeStore>;
pub type ServiceStoreBox = Box<dyn ServiceStore>;
pub type VersionStoreBox = Box<dyn VersionStore>;
pub type ConfigSourceBox = Box<dyn ConfigSource>;

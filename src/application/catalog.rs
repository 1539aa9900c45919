use crate::domain::config::{AddOnService, PricingConfig, PricingRates, PricingSnapshot};
use crate::domain::money::Money;
use crate::domain::ports::{ConfigSource, ServiceStoreBox, VersionStoreBox, ZipcodeStoreBox};
use crate::domain::quote::Zipcode;
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// The administrator-maintained pricing catalog.
///
/// Combines the built-in rate card with zipcode surcharges and add-on services
/// held in storage. Every effective mutation advances the stored catalog
/// version, and [`ConfigSource::load`] assembles a complete snapshot tagged
/// with it.
///
/// Mutations hold `guard` for writing while they change a record and advance
/// the version; loads hold it for reading, so a snapshot's version always
/// names exactly the data it was assembled from.
pub struct PricingCatalog {
    rates: PricingRates,
    zipcode_store: ZipcodeStoreBox,
    service_store: ServiceStoreBox,
    version_store: VersionStoreBox,
    guard: RwLock<()>,
}

impl PricingCatalog {
    /// Creates a new `PricingCatalog`.
    ///
    /// # Arguments
    ///
    /// * `rates` - Tier tables and unit rates.
    /// * `zipcode_store` - The store for zipcode surcharges.
    /// * `service_store` - The store for add-on services.
    /// * `version_store` - The catalog version counter, stored alongside the records.
    pub fn new(
        rates: PricingRates,
        zipcode_store: ZipcodeStoreBox,
        service_store: ServiceStoreBox,
        version_store: VersionStoreBox,
    ) -> Self {
        Self {
            rates,
            zipcode_store,
            service_store,
            version_store,
            guard: RwLock::new(()),
        }
    }

    pub async fn version(&self) -> Result<u64> {
        let _guard = self.guard.read().await;
        self.version_store.current().await
    }

    async fn bump(&self) -> Result<()> {
        let version = self.version_store.advance().await?;
        tracing::debug!(version, "catalog version advanced");
        Ok(())
    }

    pub async fn set_zipcode_charge(&self, zipcode: Zipcode, charge: Money) -> Result<()> {
        let _guard = self.guard.write().await;
        tracing::info!(%zipcode, %charge, "setting zipcode surcharge");
        self.zipcode_store.upsert(zipcode, charge).await?;
        self.bump().await
    }

    pub async fn remove_zipcode(&self, zipcode: &Zipcode) -> Result<bool> {
        let _guard = self.guard.write().await;
        let removed = self.zipcode_store.remove(zipcode).await?;
        if removed {
            tracing::info!(%zipcode, "removed zipcode surcharge");
            self.bump().await?;
        }
        Ok(removed)
    }

    pub async fn zipcode_charges(&self) -> Result<Vec<(Zipcode, Money)>> {
        let mut charges = self.zipcode_store.get_all().await?;
        charges.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(charges)
    }

    pub async fn upsert_service(&self, service: AddOnService) -> Result<()> {
        let _guard = self.guard.write().await;
        tracing::info!(key = %service.key, price = %service.price, "saving add-on service");
        self.service_store.upsert(service).await?;
        self.bump().await
    }

    pub async fn remove_service(&self, key: &str) -> Result<bool> {
        let _guard = self.guard.write().await;
        let removed = self.service_store.remove(key).await?;
        if removed {
            tracing::info!(key, "removed add-on service");
            self.bump().await?;
        }
        Ok(removed)
    }

    /// Shows or hides a service. Returns `false` when the key is unknown.
    pub async fn set_service_hidden(&self, key: &str, hidden: bool) -> Result<bool> {
        let _guard = self.guard.write().await;
        let Some(mut service) = self.service_store.get(key).await? else {
            return Ok(false);
        };
        if service.hidden != hidden {
            service.hidden = hidden;
            self.service_store.upsert(service).await?;
            self.bump().await?;
        }
        Ok(true)
    }

    pub async fn services(&self) -> Result<Vec<AddOnService>> {
        let mut services = self.service_store.get_all().await?;
        services.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(services)
    }
}

#[async_trait]
impl ConfigSource for PricingCatalog {
    async fn load(&self) -> Result<PricingSnapshot> {
        let _guard = self.guard.read().await;
        let version = self.version_store.current().await?;
        let mut config = PricingConfig::new(self.rates.clone());
        for (zipcode, charge) in self.zipcode_store.get_all().await? {
            config.zipcode_charges.insert(zipcode.into(), charge);
        }
        for service in self.service_store.get_all().await? {
            config.add_on_services.insert(service.key.clone(), service);
        }
        config.warn_on_coverage_issues();
        tracing::debug!(
            version,
            zipcodes = config.zipcode_charges.len(),
            services = config.add_on_services.len(),
            "assembled pricing snapshot"
        );
        Ok(PricingSnapshot::new(version, config))
    }
}

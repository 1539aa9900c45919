use crate::domain::config::AddOnService;
use crate::domain::money::Money;
use crate::domain::ports::{ServiceStore, VersionStore, ZipcodeStore};
use crate::domain::quote::Zipcode;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for zipcode surcharges.
///
/// Uses `Arc<RwLock<HashMap<Zipcode, Money>>>`; clones share the same map.
#[derive(Default, Clone)]
pub struct InMemoryZipcodeStore {
    charges: Arc<RwLock<HashMap<Zipcode, Money>>>,
}

impl InMemoryZipcodeStore {
    /// Creates a new, empty in-memory zipcode store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ZipcodeStore for InMemoryZipcodeStore {
    async fn upsert(&self, zipcode: Zipcode, charge: Money) -> Result<()> {
        let mut charges = self.charges.write().await;
        charges.insert(zipcode, charge);
        Ok(())
    }

    async fn get(&self, zipcode: &Zipcode) -> Result<Option<Money>> {
        let charges = self.charges.read().await;
        Ok(charges.get(zipcode).copied())
    }

    async fn remove(&self, zipcode: &Zipcode) -> Result<bool> {
        let mut charges = self.charges.write().await;
        Ok(charges.remove(zipcode).is_some())
    }

    async fn get_all(&self) -> Result<Vec<(Zipcode, Money)>> {
        let charges = self.charges.read().await;
        Ok(charges
            .iter()
            .map(|(zipcode, charge)| (zipcode.clone(), *charge))
            .collect())
    }
}

/// A thread-safe in-memory store for add-on services, keyed by service key.
#[derive(Default, Clone)]
pub struct InMemoryServiceStore {
    services: Arc<RwLock<HashMap<String, AddOnService>>>,
}

impl InMemoryServiceStore {
    /// Creates a new, empty in-memory service store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn upsert(&self, service: AddOnService) -> Result<()> {
        let mut services = self.services.write().await;
        services.insert(service.key.clone(), service);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<AddOnService>> {
        let services = self.services.read().await;
        Ok(services.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut services = self.services.write().await;
        Ok(services.remove(key).is_some())
    }

    async fn get_all(&self) -> Result<Vec<AddOnService>> {
        let services = self.services.read().await;
        Ok(services.values().cloned().collect())
    }
}

/// A thread-safe in-memory catalog version counter; clones share the counter.
#[derive(Clone)]
pub struct InMemoryVersionStore {
    version: Arc<RwLock<u64>>,
}

impl InMemoryVersionStore {
    /// Creates a counter at version 1.
    pub fn new() -> Self {
        Self {
            version: Arc::new(RwLock::new(1)),
        }
    }
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VersionStore for InMemoryVersionStore {
    async fn current(&self) -> Result<u64> {
        Ok(*self.version.read().await)
    }

    async fn advance(&self) -> Result<u64> {
        let mut version = self.version.write().await;
        *version += 1;
        Ok(*version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_zipcode_store() {
        let store = InMemoryZipcodeStore::new();
        let zip = Zipcode::parse("84101").unwrap();

        store.upsert(zip.clone(), Money::from(50)).await.unwrap();
        assert_eq!(store.get(&zip).await.unwrap(), Some(Money::from(50)));

        store.upsert(zip.clone(), Money::from(75)).await.unwrap();
        assert_eq!(store.get_all().await.unwrap(), vec![(zip.clone(), Money::from(75))]);

        assert!(store.remove(&zip).await.unwrap());
        assert!(!store.remove(&zip).await.unwrap());
        assert!(store.get(&zip).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_service_store() {
        let store = InMemoryServiceStore::new();
        let service = AddOnService::new("dryer_vent", Money::from(99), "Dryer vent cleaning");

        store.upsert(service.clone()).await.unwrap();
        assert_eq!(store.get("dryer_vent").await.unwrap(), Some(service));
        assert!(store.get("missing").await.unwrap().is_none());

        assert_eq!(store.get_all().await.unwrap().len(), 1);
        assert!(store.remove("dryer_vent").await.unwrap());
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_version_store() {
        let store = InMemoryVersionStore::new();
        let other = store.clone();
        assert_eq!(store.current().await.unwrap(), 1);
        assert_eq!(store.advance().await.unwrap(), 2);
        assert_eq!(other.current().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryZipcodeStore::new();
        let other = store.clone();
        let zip = Zipcode::parse("84010").unwrap();

        store.upsert(zip.clone(), Money::from(100)).await.unwrap();
        assert_eq!(other.get(&zip).await.unwrap(), Some(Money::from(100)));
    }
}

use crate::domain::config::AddOnService;
use crate::domain::money::Money;
use crate::domain::ports::{ServiceStore, VersionStore, ZipcodeStore};
use crate::domain::quote::Zipcode;
use crate::error::{QuoteError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for zipcode surcharges.
pub const CF_ZIPCODES: &str = "zipcodes";
/// Column Family for add-on services.
pub const CF_SERVICES: &str = "services";
/// Column Family for catalog metadata such as the version counter.
pub const CF_META: &str = "meta";

const VERSION_KEY: &[u8] = b"catalog_version";

/// A persistent store implementation using RocksDB.
///
/// Keeps zipcode surcharges and add-on services in separate Column Families,
/// keyed by zipcode and service key, with JSON values. The catalog version
/// lives in the `meta` Column Family so it survives restarts with the data.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("zipcodes", "services" and "meta") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_zipcodes = ColumnFamilyDescriptor::new(CF_ZIPCODES, Options::default());
        let cf_services = ColumnFamilyDescriptor::new(CF_SERVICES, Options::default());
        let cf_meta = ColumnFamilyDescriptor::new(CF_META, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_zipcodes, cf_services, cf_meta])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            QuoteError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put<T: Serialize>(&self, cf: &str, key: &[u8], value: &T) -> Result<()> {
        let handle = self.cf(cf)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(handle, key, bytes)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf: &str, key: &[u8]) -> Result<Option<T>> {
        let handle = self.cf(cf)?;
        match self.db.get_pinned_cf(handle, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn delete(&self, cf: &str, key: &[u8]) -> Result<bool> {
        let handle = self.cf(cf)?;
        let existed = self.db.get_pinned_cf(handle, key)?.is_some();
        if existed {
            self.db.delete_cf(handle, key)?;
        }
        Ok(existed)
    }

    fn scan<T: DeserializeOwned>(&self, cf: &str) -> Result<Vec<(Vec<u8>, T)>> {
        let handle = self.cf(cf)?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(handle, IteratorMode::Start) {
            let (key, value) = item?;
            rows.push((key.to_vec(), serde_json::from_slice(&value)?));
        }
        Ok(rows)
    }
}

#[async_trait]
impl ZipcodeStore for RocksDBStore {
    async fn upsert(&self, zipcode: Zipcode, charge: Money) -> Result<()> {
        self.put(CF_ZIPCODES, zipcode.as_str().as_bytes(), &charge)
    }

    async fn get(&self, zipcode: &Zipcode) -> Result<Option<Money>> {
        self.fetch(CF_ZIPCODES, zipcode.as_str().as_bytes())
    }

    async fn remove(&self, zipcode: &Zipcode) -> Result<bool> {
        self.delete(CF_ZIPCODES, zipcode.as_str().as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<(Zipcode, Money)>> {
        self.scan::<Money>(CF_ZIPCODES)?
            .into_iter()
            .map(|(key, charge)| {
                let raw = String::from_utf8_lossy(&key);
                Ok((Zipcode::parse(&raw)?, charge))
            })
            .collect()
    }
}

#[async_trait]
impl ServiceStore for RocksDBStore {
    async fn upsert(&self, service: AddOnService) -> Result<()> {
        self.put(CF_SERVICES, service.key.as_bytes(), &service)
    }

    async fn get(&self, key: &str) -> Result<Option<AddOnService>> {
        self.fetch(CF_SERVICES, key.as_bytes())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        self.delete(CF_SERVICES, key.as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<AddOnService>> {
        Ok(self
            .scan::<AddOnService>(CF_SERVICES)?
            .into_iter()
            .map(|(_key, service)| service)
            .collect())
    }
}

#[async_trait]
impl VersionStore for RocksDBStore {
    async fn current(&self) -> Result<u64> {
        Ok(self.fetch::<u64>(CF_META, VERSION_KEY)?.unwrap_or(1))
    }

    async fn advance(&self) -> Result<u64> {
        let next = self.current().await? + 1;
        self.put(CF_META, VERSION_KEY, &next)?;
        Ok(next)
    }
}

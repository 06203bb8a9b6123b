use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::models::Coordinates;
use crate::services::geocoder::{GeocodeError, GeocodeProvider};

/// Errors raised by a geocode store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Geocode store backend error: {0}")]
    Backend(String),
}

/// Persistent address -> coordinates table
///
/// Entries are written once per address and never updated.
#[async_trait]
pub trait GeocodeStore: Send + Sync {
    async fn get_location(&self, address: &str) -> Result<Option<Coordinates>, StoreError>;

    /// Insert unless the address is already stored
    ///
    /// Returns the coordinates that ended up persisted, which differ from
    /// `coordinates` when another writer got there first.
    async fn insert_location(
        &self,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<Coordinates, StoreError>;
}

/// Geocoder fronted by a persistent store and an in-memory L1
///
/// Lookup order is L1, then the store, then the provider. Only successful
/// resolutions are kept; a failed address is retried on the next call.
/// Addresses are used verbatim as keys.
pub struct GeocodeCache {
    store: Arc<dyn GeocodeStore>,
    provider: Arc<dyn GeocodeProvider>,
    l1_cache: moka::future::Cache<String, Coordinates>,
    provider_timeout: Duration,
}

impl GeocodeCache {
    pub fn new(
        store: Arc<dyn GeocodeStore>,
        provider: Arc<dyn GeocodeProvider>,
        l1_size: u64,
        ttl_secs: u64,
        provider_timeout: Duration,
    ) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            store,
            provider,
            l1_cache,
            provider_timeout,
        }
    }

    /// Resolve an address, or `None` if it cannot be geocoded right now
    pub async fn resolve(&self, address: &str) -> Option<Coordinates> {
        match self.try_resolve(address).await {
            Ok(coordinates) => Some(coordinates),
            Err(e) => {
                tracing::warn!("Could not geocode {:?}: {}", address, e);
                None
            }
        }
    }

    /// Resolve an address, surfacing why it failed
    pub async fn try_resolve(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if let Some(coordinates) = self.l1_cache.get(address).await {
            tracing::trace!("L1 geocode hit: {}", address);
            return Ok(coordinates);
        }

        match self.store.get_location(address).await {
            Ok(Some(coordinates)) => {
                tracing::trace!("Stored geocode hit: {}", address);
                self.l1_cache.insert(address.to_string(), coordinates).await;
                return Ok(coordinates);
            }
            Ok(None) => tracing::debug!("Geocode miss: {}", address),
            Err(e) => tracing::warn!("Geocode store lookup failed for {:?}, asking provider: {}", address, e),
        }

        let fetched = match tokio::time::timeout(self.provider_timeout, self.provider.fetch(address)).await {
            Ok(result) => result?,
            Err(_) => return Err(GeocodeError::Timeout(self.provider_timeout)),
        };

        // Stored entries are never rewritten
        if !fetched.is_valid() {
            return Err(GeocodeError::InvalidResponse(format!(
                "Coordinates out of range: {}, {}",
                fetched.latitude, fetched.longitude
            )));
        }

        match self.store.insert_location(address, fetched).await {
            Ok(stored) => {
                if stored != fetched {
                    tracing::debug!("Geocode for {:?} was stored concurrently, using stored value", address);
                }
                self.l1_cache.insert(address.to_string(), stored).await;
                Ok(stored)
            }
            Err(e) => {
                // Not persisted, so the next lookup asks the provider again
                tracing::warn!("Failed to store geocode for {:?}: {}", address, e);
                Ok(fetched)
            }
        }
    }

    /// Start a request-scoped session that asks about each address once
    pub fn session(&self, capacity: usize) -> GeocodeSession<'_> {
        GeocodeSession {
            cache: self,
            resolved: moka::future::Cache::new(capacity.max(1) as u64),
        }
    }
}

/// Memo over [`GeocodeCache`] for the duration of one run
///
/// Every distinct address is resolved at most once per session, failures
/// included. Concurrent lookups of the same address share one resolution.
pub struct GeocodeSession<'a> {
    cache: &'a GeocodeCache,
    resolved: moka::future::Cache<String, Option<Coordinates>>,
}

impl GeocodeSession<'_> {
    pub async fn resolve(&self, address: &str) -> Option<Coordinates> {
        self.resolved
            .get_with(address.to_string(), self.cache.resolve(address))
            .await
    }
}

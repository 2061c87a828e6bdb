//! Entity resolution and cached attribute metadata.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;

use super::provider::{MetadataProvider, ProviderError};
use super::types::{AttributeMap, EntityReference};
use crate::cache::AttributeMapCache;

/// Errors raised by [`AttributeMetadataResolver`].
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The provider knows no entity by this name.
    #[error("entity not found: '{input}' (check the table name)")]
    EntityNotFound {
        /// The identifier as the user typed it.
        input: String,
    },

    /// Provider failures pass through untouched.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound { .. })
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Resolver behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Collapse concurrent cache misses for the same entity into one
    /// provider call. When false every miss fetches and the last write wins.
    pub single_flight: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            single_flight: true,
        }
    }
}

impl ResolverOptions {
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }
}

/// Resolves table identifiers and serves cached attribute maps.
///
/// The cache is an explicit object: pass a shared one with
/// [`AttributeMetadataResolver::with_cache`] or let the resolver own a fresh
/// one.
///
/// # Example
///
/// ```ignore
/// use formscope::metadata::{AttributeMetadataResolver, CatalogProvider};
///
/// let provider = CatalogProvider::load("catalog.json").await?;
/// let resolver = AttributeMetadataResolver::new(Arc::new(provider));
///
/// let entity = resolver.resolve("accounts").await?;
/// let attrs = resolver.get_attr_map(&entity.logical_name).await?;
/// ```
pub struct AttributeMetadataResolver<P: MetadataProvider> {
    provider: Arc<P>,
    cache: Arc<AttributeMapCache>,
    /// Per-key fetch locks, only used with single-flight enabled.
    fetch_locks: DashMap<String, Arc<Mutex<()>>>,
    options: ResolverOptions,
}

impl<P: MetadataProvider> AttributeMetadataResolver<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_cache(provider, Arc::new(AttributeMapCache::new()))
    }

    /// Create a resolver over an existing (possibly shared) cache.
    pub fn with_cache(provider: Arc<P>, cache: Arc<AttributeMapCache>) -> Self {
        Self {
            provider,
            cache,
            fetch_locks: DashMap::new(),
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn cache(&self) -> &Arc<AttributeMapCache> {
        &self.cache
    }

    /// Resolve a user-typed table identifier (collection name or logical
    /// name) to its canonical names.
    pub async fn resolve(&self, input: &str) -> ResolveResult<EntityReference> {
        match self.provider.resolve_entity(input).await? {
            Some(descriptor) => {
                tracing::debug!(
                    input,
                    logical_name = %descriptor.logical_name,
                    entity_set = %descriptor.entity_set_name,
                    "resolved entity"
                );
                Ok(descriptor.into())
            }
            None => {
                tracing::debug!(input, "entity not found");
                Err(ResolveError::EntityNotFound {
                    input: input.to_string(),
                })
            }
        }
    }

    /// Get the attribute map for an entity, fetching it on a cache miss.
    pub async fn get_attr_map(&self, logical_name: &str) -> ResolveResult<Arc<AttributeMap>> {
        // Fast path: already cached
        if let Some(map) = self.cache.get(logical_name) {
            tracing::debug!(logical_name, "attribute map cache hit");
            return Ok(map);
        }

        if !self.options.single_flight {
            return self.fetch_and_store(logical_name).await;
        }

        let result = {
            let lock = self
                .fetch_locks
                .entry(logical_name.to_string())
                .or_default()
                .clone();
            let _guard = lock.lock().await;

            // Another caller may have filled the entry while we waited
            match self.cache.get(logical_name) {
                Some(map) => {
                    tracing::debug!(logical_name, "attribute map filled by concurrent fetch");
                    Ok(map)
                }
                None => self.fetch_and_store(logical_name).await,
            }
        };

        // Last holder out removes the lock
        self.fetch_locks
            .remove_if(logical_name, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Warm the cache for several entities in parallel.
    pub async fn prefetch(&self, logical_names: &[String]) -> ResolveResult<()> {
        let futures: Vec<_> = logical_names
            .iter()
            .map(|name| self.get_attr_map(name))
            .collect();

        for result in futures::future::join_all(futures).await {
            result?;
        }
        Ok(())
    }

    /// Drop the cached map for an entity. No-op if absent.
    ///
    /// Fetches already in flight are unaffected and will store their result.
    pub fn invalidate(&self, logical_name: &str) {
        let removed = self.cache.delete(logical_name);
        tracing::debug!(logical_name, removed, "invalidated attribute map");
    }

    async fn fetch_and_store(&self, logical_name: &str) -> ResolveResult<Arc<AttributeMap>> {
        tracing::debug!(logical_name, "fetching attribute map");
        let map = Arc::new(self.provider.get_attribute_map(logical_name).await?);
        self.cache.set(logical_name, Arc::clone(&map));
        Ok(map)
    }
}

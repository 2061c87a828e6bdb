//! MetadataProvider trait definition.
//!
//! The provider is the external collaborator that actually talks to the
//! platform's metadata endpoints. Transport, authentication, timeouts and
//! retries are its responsibility; the resolver only caches what it returns.

use std::io;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{AttributeMap, EntityDescriptor};

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised by a metadata provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Failed to read provider data.
    #[error("failed to read metadata: {0}")]
    Io(#[from] io::Error),

    /// Provider data could not be decoded.
    #[error("failed to decode metadata: {0}")]
    Parse(#[from] serde_json::Error),

    /// The remote metadata service returned an error.
    #[error("metadata service error: {message} (code: {code})")]
    Remote {
        /// Error code from the service.
        code: String,
        /// Error message from the service.
        message: String,
    },

    /// The provider cannot be reached.
    #[error("metadata provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Source of entity and attribute metadata.
///
/// # Example
///
/// ```ignore
/// use formscope::metadata::MetadataProvider;
///
/// async fn example(provider: &impl MetadataProvider) -> ProviderResult<()> {
///     if let Some(entity) = provider.resolve_entity("accounts").await? {
///         let attrs = provider.get_attribute_map(&entity.logical_name).await?;
///         println!("{} has {} attributes", entity.logical_name, attrs.len());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Look up an entity by either its collection name or logical name.
    ///
    /// Returns `Ok(None)` when nothing matches.
    async fn resolve_entity(&self, identifier: &str) -> ProviderResult<Option<EntityDescriptor>>;

    /// Fetch the full attribute-type map for an entity.
    ///
    /// Callers should treat this as expensive.
    async fn get_attribute_map(&self, logical_name: &str) -> ProviderResult<AttributeMap>;
}

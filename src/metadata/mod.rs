//! Entity and attribute metadata.
//!
//! This module turns user-typed table identifiers into canonical entity names
//! and serves attribute-type maps for the query compiler.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  AttributeMetadataResolver                      │
//! │  - resolve(input)          -> EntityReference                   │
//! │  - get_attr_map(logical)   -> Arc<AttributeMap>  (cached)       │
//! │  - invalidate(logical)                                          │
//! └─────────────────────────────────────────────────────────────────┘
//!              │                                 │
//!              ▼                                 ▼
//! ┌──────────────────────────┐    ┌──────────────────────────────────┐
//! │    AttributeMapCache     │    │   MetadataProvider (external)    │
//! │  (in-memory, per entity) │    │  - resolve_entity()              │
//! └──────────────────────────┘    │  - get_attribute_map()           │
//!                                 └──────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use formscope::metadata::{AttributeMetadataResolver, CatalogProvider};
//!
//! let provider = CatalogProvider::load("catalog.json").await?;
//! let resolver = AttributeMetadataResolver::new(Arc::new(provider));
//!
//! let entity = resolver.resolve("accounts").await?;
//! let attrs = resolver.get_attr_map(&entity.logical_name).await?;
//!
//! // After a schema customization
//! resolver.invalidate(&entity.logical_name);
//! ```

mod catalog;
mod provider;
mod resolver;
mod types;

pub use catalog::{CatalogEntity, CatalogProvider};
pub use provider::{MetadataProvider, ProviderError, ProviderResult};
pub use resolver::{AttributeMetadataResolver, ResolveError, ResolveResult, ResolverOptions};
pub use types::*;

//! # formscope
//!
//! Metadata-aware OData query compilation for form-runtime diagnostics.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          Table identifier ("accounts", "account")        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [AttributeMetadataResolver]
//! ┌─────────────────────────────────────────────────────────┐
//! │   EntityReference + AttributeMap (cached per entity)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [ODataQueryCompiler]
//! ┌─────────────────────────────────────────────────────────┐
//! │   ?$select=...&$filter=...&$top=...&$orderby=...         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The attribute map is resolved once and reused across many compile calls,
//! e.g. one per filter change in the UI.

pub mod cache;
pub mod config;
pub mod metadata;
pub mod odata;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::cache::AttributeMapCache;
    pub use crate::metadata::{
        AttributeMap, AttributeMetadata, AttributeMetadataResolver, AttributeType,
        EntityReference, MetadataProvider, ResolveError,
    };
    pub use crate::odata::{
        compile_query, CompileOptions, CompiledQuery, FilterCondition, FilterGroup,
        FilterOperator, GroupJoin, GroupKind, ODataQueryCompiler, QueryDefinition, SortDir,
    };
}

pub use metadata::{AttributeMetadataResolver, EntityReference};
pub use odata::{compile_query, ODataQueryCompiler, QueryDefinition};

//! CatalogProvider implementation.
//!
//! Serves entity and attribute metadata from a JSON catalog document, e.g. a
//! snapshot exported from the platform. Used by the CLI and for offline
//! diagnostics.
//!
//! ```json
//! {
//!   "entities": [
//!     {
//!       "logical_name": "account",
//!       "entity_set_name": "accounts",
//!       "attributes": [
//!         { "logical_name": "name", "attribute_type": "String" },
//!         { "logical_name": "primarycontactid", "attribute_type": "Lookup", "targets": ["contact"] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::{MetadataProvider, ProviderError, ProviderResult};
use super::types::{
    attribute_map_from_definitions, AttributeDefinition, AttributeMap, EntityDescriptor,
};

/// One entity in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub logical_name: String,
    pub entity_set_name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

impl CatalogEntity {
    fn matches(&self, identifier: &str) -> bool {
        self.logical_name.eq_ignore_ascii_case(identifier)
            || self.entity_set_name.eq_ignore_ascii_case(identifier)
    }

    fn descriptor(&self) -> EntityDescriptor {
        EntityDescriptor {
            entity_set_name: self.entity_set_name.clone(),
            logical_name: self.logical_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    entities: Vec<CatalogEntity>,
}

/// MetadataProvider backed by an in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogProvider {
    entities: Vec<CatalogEntity>,
}

impl CatalogProvider {
    pub fn new(entities: Vec<CatalogEntity>) -> Self {
        Self { entities }
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Ok(Self::new(doc.entities))
    }

    /// Load a catalog file.
    pub async fn load(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&content)
    }

    /// Add an entity, replacing any entry with the same logical name.
    pub fn with_entity(mut self, entity: CatalogEntity) -> Self {
        self.entities
            .retain(|e| !e.logical_name.eq_ignore_ascii_case(&entity.logical_name));
        self.entities.push(entity);
        self
    }

    pub fn entities(&self) -> &[CatalogEntity] {
        &self.entities
    }

    fn find(&self, identifier: &str) -> Option<&CatalogEntity> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        self.entities.iter().find(|e| e.matches(identifier))
    }
}

#[async_trait]
impl MetadataProvider for CatalogProvider {
    async fn resolve_entity(&self, identifier: &str) -> ProviderResult<Option<EntityDescriptor>> {
        Ok(self.find(identifier).map(CatalogEntity::descriptor))
    }

    async fn get_attribute_map(&self, logical_name: &str) -> ProviderResult<AttributeMap> {
        self.entities
            .iter()
            .find(|e| e.logical_name.eq_ignore_ascii_case(logical_name.trim()))
            .map(|e| attribute_map_from_definitions(&e.attributes))
            .ok_or_else(|| {
                ProviderError::remote(
                    "NOT_FOUND",
                    format!("no attribute metadata for entity: {}", logical_name),
                )
            })
    }
}

//! Metadata types shared between providers, the resolver and the compiler.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How an attribute is treated when building queries.
///
/// Adding a variant here forces every dispatch site in the compiler to
/// handle it (exhaustive matching).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
    Boolean,
    Date,
    Optionset,
    Lookup,
    Unknown,
}

impl AttributeType {
    /// Map a platform attribute type name (e.g. `"Picklist"`, `"Money"`)
    /// to the query-level type.
    ///
    /// Matching is case-insensitive and ignores a trailing `Type` suffix,
    /// so both `"Lookup"` and `"LookupType"` map to [`AttributeType::Lookup`].
    pub fn from_definition(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let name = lowered.strip_suffix("type").unwrap_or(&lowered);

        match name {
            "string" | "memo" | "entityname" => Self::String,
            "integer" | "bigint" | "decimal" | "double" | "money" => Self::Number,
            "boolean" => Self::Boolean,
            "datetime" => Self::Date,
            "picklist" | "state" | "status" | "multiselectpicklist" => Self::Optionset,
            "lookup" | "customer" | "owner" => Self::Lookup,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Optionset => "optionset",
            Self::Lookup => "lookup",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query-relevant metadata for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,

    /// Entity types a lookup may point to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
}

impl AttributeMetadata {
    pub fn new(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            targets: None,
        }
    }

    pub fn lookup<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attr_type: AttributeType::Lookup,
            targets: Some(targets.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_lookup(&self) -> bool {
        self.attr_type == AttributeType::Lookup
    }
}

/// Attribute logical name -> metadata.
pub type AttributeMap = HashMap<String, AttributeMetadata>;

/// Raw attribute definition as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    #[serde(alias = "LogicalName")]
    pub logical_name: String,

    #[serde(alias = "AttributeType")]
    pub attribute_type: String,

    #[serde(default, alias = "Targets")]
    pub targets: Option<Vec<String>>,
}

impl AttributeDefinition {
    /// Convert to query-level metadata.
    ///
    /// Targets are only kept for lookups.
    pub fn to_metadata(&self) -> AttributeMetadata {
        let attr_type = AttributeType::from_definition(&self.attribute_type);
        let targets = match attr_type {
            AttributeType::Lookup => self.targets.clone(),
            _ => None,
        };
        AttributeMetadata { attr_type, targets }
    }
}

/// Build an [`AttributeMap`] from raw definitions. Later duplicates win.
pub fn attribute_map_from_definitions<'a, I>(definitions: I) -> AttributeMap
where
    I: IntoIterator<Item = &'a AttributeDefinition>,
{
    definitions
        .into_iter()
        .map(|d| (d.logical_name.clone(), d.to_metadata()))
        .collect()
}

/// Entity descriptor returned by a metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    #[serde(rename = "EntitySetName", alias = "entity_set_name")]
    pub entity_set_name: String,

    #[serde(rename = "LogicalName", alias = "logical_name")]
    pub logical_name: String,
}

/// Canonical names for a resolved table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityReference {
    /// Plural collection name used in REST paths (e.g. `accounts`).
    pub entity_set: String,
    /// Stable internal name (e.g. `account`).
    pub logical_name: String,
}

impl From<EntityDescriptor> for EntityReference {
    fn from(desc: EntityDescriptor) -> Self {
        Self {
            entity_set: desc.entity_set_name,
            logical_name: desc.logical_name,
        }
    }
}

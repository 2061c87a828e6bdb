//! Declarative query definition collected from the filter builder.
//!
//! A [`QueryDefinition`] is built fresh for every compile call. Attribute
//! names are always bare logical names; the compiler adds `_<name>_value`
//! for lookups.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::metadata::AttributeMap;

// ============================================================================
// Operators
// ============================================================================

/// Condition operator.
///
/// Deserializes through [`FromStr`], so case and inner whitespace are
/// normalized (`"Not  Contains"` reads as `not contains`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum FilterOperator {
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "ne")]
    Ne,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "ge")]
    Ge,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "le")]
    Le,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "startswith")]
    StartsWith,
    #[serde(rename = "endswith")]
    EndsWith,
    #[serde(rename = "not contains")]
    NotContains,
    #[serde(rename = "eq null")]
    EqNull,
    #[serde(rename = "ne null")]
    NeNull,
}

/// OData string function backing a string operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFunction {
    Contains,
    StartsWith,
    EndsWith,
}

impl StringFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
        }
    }
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 12] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Ge,
        Self::Lt,
        Self::Le,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::NotContains,
        Self::EqNull,
        Self::NeNull,
    ];

    /// Operator text as written in the query.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::NotContains => "not contains",
            Self::EqNull => "eq null",
            Self::NeNull => "ne null",
        }
    }

    /// Null tests take no value.
    pub fn is_null_test(&self) -> bool {
        self.as_str().contains("null")
    }

    /// The string function behind this operator and whether it is negated.
    pub fn string_function(&self) -> Option<(StringFunction, bool)> {
        match self {
            Self::Contains => Some((StringFunction::Contains, false)),
            Self::StartsWith => Some((StringFunction::StartsWith, false)),
            Self::EndsWith => Some((StringFunction::EndsWith, false)),
            Self::NotContains => Some((StringFunction::Contains, true)),
            Self::Eq
            | Self::Ne
            | Self::Gt
            | Self::Ge
            | Self::Lt
            | Self::Le
            | Self::EqNull
            | Self::NeNull => None,
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized operator text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter operator: '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for FilterOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for FilterOperator {
    type Error = UnknownOperator;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ============================================================================
// Conditions and groups
// ============================================================================

/// A single `attr op value` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub attr: String,
    pub op: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FilterCondition {
    pub fn new(attr: impl Into<String>, op: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            attr: attr.into(),
            op,
            value: Some(value.into()),
        }
    }

    /// Condition without a value (null tests).
    pub fn bare(attr: impl Into<String>, op: FilterOperator) -> Self {
        Self {
            attr: attr.into(),
            op,
            value: None,
        }
    }
}

/// How a group combines its own conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    #[default]
    And,
    Or,
    /// Negated conjunction.
    Not,
}

/// How a group combines with the group before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupJoin {
    #[default]
    And,
    Or,
}

impl GroupJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// A boolean combination of conditions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    #[serde(default)]
    pub filter_type: GroupKind,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    /// Ignored on the first group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inter_group_operator: Option<GroupJoin>,
}

impl FilterGroup {
    pub fn new(filter_type: GroupKind, filters: Vec<FilterCondition>) -> Self {
        Self {
            filter_type,
            filters,
            inter_group_operator: None,
        }
    }

    pub fn and(filters: Vec<FilterCondition>) -> Self {
        Self::new(GroupKind::And, filters)
    }

    pub fn or(filters: Vec<FilterCondition>) -> Self {
        Self::new(GroupKind::Or, filters)
    }

    pub fn not(filters: Vec<FilterCondition>) -> Self {
        Self::new(GroupKind::Not, filters)
    }

    /// Set the operator joining this group to the previous one.
    pub fn joined_with(mut self, join: GroupJoin) -> Self {
        self.inter_group_operator = Some(join);
        self
    }
}

// ============================================================================
// Query definition
// ============================================================================

/// Sort direction for `$orderby`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Everything needed to compile one OData query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefinition {
    #[serde(default)]
    pub select: Vec<String>,

    #[serde(default)]
    pub filter_groups: Vec<FilterGroup>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_attr: Option<String>,

    /// Defaults to ascending when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_dir: Option<SortDir>,

    /// Row cap. Zero means no cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,

    /// Attribute metadata; types are inferred from values when absent.
    #[serde(skip)]
    pub attr_map: Option<Arc<AttributeMap>>,
}

impl QueryDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter_group(mut self, group: FilterGroup) -> Self {
        self.filter_groups.push(group);
        self
    }

    pub fn order_by(mut self, attr: impl Into<String>, dir: SortDir) -> Self {
        self.order_attr = Some(attr.into());
        self.order_dir = Some(dir);
        self
    }

    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_attr_map(mut self, attr_map: Arc<AttributeMap>) -> Self {
        self.attr_map = Some(attr_map);
        self
    }
}

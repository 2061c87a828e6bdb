//! Compilation from [`QueryDefinition`] to an OData query string.
//!
//! ```text
//! QueryDefinition → select parts
//!                 → conditions → groups → chain → $filter
//!                 → $top, $orderby
//!                 → "?$select=..&$filter=..&$top=..&$orderby=.."
//! ```
//!
//! Compilation never fails. Conditions that cannot be expressed are dropped;
//! [`ODataQueryCompiler::compile_with_diagnostics`] reports which ones and why.
//!
//! # Example
//!
//! ```ignore
//! use formscope::odata::{FilterCondition, FilterGroup, FilterOperator, QueryDefinition};
//!
//! let query = QueryDefinition::new()
//!     .select(["name"])
//!     .filter_group(FilterGroup::and(vec![FilterCondition::new(
//!         "statecode",
//!         FilterOperator::Eq,
//!         "0",
//!     )]))
//!     .top(10);
//!
//! assert_eq!(
//!     formscope::odata::compile_query(&query),
//!     "?$select=name&$filter=statecode eq 0&$top=10"
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::filter::FilterExpr;
use super::infer::{effective_type, js_number, parse_date};
use super::literal::Literal;
use super::query::{FilterCondition, FilterOperator, GroupJoin, QueryDefinition, SortDir};
use crate::metadata::{AttributeMap, AttributeType};

// ============================================================================
// Options
// ============================================================================

/// What to do with a non-numeric value on a number attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NanLiteral {
    /// Emit the literal `NaN`.
    #[default]
    Emit,
    /// Drop the condition.
    Drop,
}

/// Options for compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub nan_literal: NanLiteral,
}

impl CompileOptions {
    pub fn with_nan_literal(mut self, nan_literal: NanLiteral) -> Self {
        self.nan_literal = nan_literal;
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Why a condition produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// String function on an attribute of another type.
    FunctionOnNonString(AttributeType),
    /// Value on a date attribute is not a date.
    UnparseableDate,
    /// Value on a number attribute is not a number and NaN emission is off.
    NotANumber,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FunctionOnNonString(ty) => {
                write!(f, "string function applied to {} attribute", ty)
            }
            Self::UnparseableDate => f.write_str("value is not a date"),
            Self::NotANumber => f.write_str("value is not a number"),
        }
    }
}

/// A condition left out of the compiled filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedClause {
    /// Index of the group in the definition.
    pub group: usize,
    /// Index of the condition within its group.
    pub condition: usize,
    pub attr: String,
    pub op: FilterOperator,
    pub reason: DropReason,
}

/// Compiled query plus the conditions that were dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledQuery {
    /// `?`-prefixed query string, or empty.
    pub query: String,
    pub dropped: Vec<DroppedClause>,
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles query definitions into OData query strings.
///
/// Stateless apart from its options; share freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ODataQueryCompiler {
    options: CompileOptions,
}

impl ODataQueryCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn compile(&self, query: &QueryDefinition) -> String {
        self.compile_with_diagnostics(query).query
    }

    pub fn compile_with_diagnostics(&self, query: &QueryDefinition) -> CompiledQuery {
        let attr_map = query.attr_map.as_deref();
        let mut dropped = Vec::new();
        let mut params = Vec::with_capacity(4);

        let select = compile_select(&query.select, attr_map);
        if !select.is_empty() {
            params.push(format!("$select={}", select.join(",")));
        }

        if let Some(filter) = self.compile_filter(query, attr_map, &mut dropped) {
            params.push(format!("$filter={}", filter));
        }

        if let Some(top) = query.top.filter(|&n| n > 0) {
            params.push(format!("$top={}", top));
        }

        if let Some(attr) = query.order_attr.as_deref().filter(|a| !a.is_empty()) {
            let dir = query.order_dir.unwrap_or(SortDir::Asc);
            params.push(format!("$orderby={} {}", attr, dir.as_str()));
        }

        let query = if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        };

        CompiledQuery { query, dropped }
    }

    fn compile_filter(
        &self,
        query: &QueryDefinition,
        attr_map: Option<&AttributeMap>,
        dropped: &mut Vec<DroppedClause>,
    ) -> Option<FilterExpr> {
        let mut groups = Vec::with_capacity(query.filter_groups.len());

        for (group_idx, group) in query.filter_groups.iter().enumerate() {
            let mut conditions = Vec::with_capacity(group.filters.len());

            for (cond_idx, cond) in group.filters.iter().enumerate() {
                match self.compile_condition(cond, attr_map) {
                    Ok(expr) => conditions.push(expr),
                    Err(reason) => {
                        tracing::debug!(
                            attr = %cond.attr,
                            op = %cond.op,
                            %reason,
                            "dropped filter condition"
                        );
                        dropped.push(DroppedClause {
                            group: group_idx,
                            condition: cond_idx,
                            attr: cond.attr.clone(),
                            op: cond.op,
                            reason,
                        });
                    }
                }
            }

            // Empty groups are skipped along with their join operator
            if let Some(expr) = FilterExpr::group(group.filter_type, conditions) {
                let join = group.inter_group_operator.unwrap_or(GroupJoin::And);
                groups.push((join, expr));
            }
        }

        FilterExpr::chain(groups)
    }

    fn compile_condition(
        &self,
        cond: &FilterCondition,
        attr_map: Option<&AttributeMap>,
    ) -> Result<FilterExpr, DropReason> {
        if cond.op.is_null_test() {
            return Ok(FilterExpr::NullTest {
                field: cond.attr.clone(),
                op: cond.op,
            });
        }

        let raw = cond.value.as_deref().unwrap_or("");
        let attr_type = effective_type(&cond.attr, raw, attr_map);

        if let Some((func, negated)) = cond.op.string_function() {
            return match attr_type {
                AttributeType::String => Ok(FilterExpr::Function {
                    func,
                    field: cond.attr.clone(),
                    value: raw.to_string(),
                    negated,
                }),
                AttributeType::Number
                | AttributeType::Boolean
                | AttributeType::Date
                | AttributeType::Optionset
                | AttributeType::Lookup
                | AttributeType::Unknown => Err(DropReason::FunctionOnNonString(attr_type)),
            };
        }

        let (field, value) = match attr_type {
            AttributeType::Boolean => (cond.attr.clone(), Literal::Raw(raw.to_lowercase())),
            AttributeType::Number => {
                let n = js_number(raw);
                if n.is_nan() && self.options.nan_literal == NanLiteral::Drop {
                    return Err(DropReason::NotANumber);
                }
                (cond.attr.clone(), Literal::Number(n))
            }
            AttributeType::Date => {
                let instant = parse_date(raw).ok_or(DropReason::UnparseableDate)?;
                (cond.attr.clone(), Literal::Instant(instant))
            }
            AttributeType::Optionset => {
                let n = js_number(raw);
                let value = if n.is_nan() {
                    Literal::Text(raw.to_string())
                } else {
                    Literal::Number(n)
                };
                (cond.attr.clone(), value)
            }
            AttributeType::Lookup => (lookup_value_field(&cond.attr), Literal::Raw(raw.to_string())),
            AttributeType::String | AttributeType::Unknown => {
                (cond.attr.clone(), Literal::Text(raw.to_string()))
            }
        };

        Ok(FilterExpr::Comparison {
            field,
            op: cond.op,
            value,
        })
    }
}

/// Navigation-value field name for a lookup attribute.
pub fn lookup_value_field(attr: &str) -> String {
    format!("_{}_value", attr)
}

/// Map select columns to their query names, lookups to `_<name>_value`.
///
/// Order and duplicates are preserved.
pub fn compile_select(columns: &[String], attr_map: Option<&AttributeMap>) -> Vec<String> {
    columns
        .iter()
        .map(|col| {
            let is_lookup = attr_map
                .and_then(|map| map.get(col))
                .is_some_and(|meta| meta.is_lookup());
            if is_lookup {
                lookup_value_field(col)
            } else {
                col.clone()
            }
        })
        .collect()
}

/// Compile with default options.
pub fn compile_query(query: &QueryDefinition) -> String {
    ODataQueryCompiler::default().compile(query)
}

//! Metadata-aware OData query compilation.
//!
//! Pure and side-effect free: no I/O, no caching. The attribute map travels
//! inside the [`QueryDefinition`], typically straight from
//! [`AttributeMetadataResolver::get_attr_map`](crate::metadata::AttributeMetadataResolver::get_attr_map).
//!
//! | Type       | Filter literal                         |
//! |------------|----------------------------------------|
//! | boolean    | `attr op true`                         |
//! | number     | `attr op 42` (`NaN` when not numeric)  |
//! | date       | `attr op '2024-03-01T00:00:00.000Z'`   |
//! | optionset  | `attr op 1` or `attr op 'label'`       |
//! | lookup     | `_attr_value op <guid>`                |
//! | string     | `attr op 'it''s'`                      |

mod compile;
mod filter;
mod infer;
mod literal;
mod query;

pub use compile::{
    compile_query, compile_select, lookup_value_field, CompileOptions, CompiledQuery, DropReason,
    DroppedClause, NanLiteral, ODataQueryCompiler,
};
pub use filter::FilterExpr;
pub use infer::{effective_type, infer_type, is_guid, js_number, parse_date};
pub use literal::{format_number, quote_string, Literal};
pub use query::{
    FilterCondition, FilterGroup, FilterOperator, GroupJoin, GroupKind, QueryDefinition, SortDir,
    StringFunction, UnknownOperator,
};

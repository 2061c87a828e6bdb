//! `$filter` expression tree.
//!
//! Conditions are compiled into [`FilterExpr`] nodes, grouped, then chained
//! left to right. Rendering is plain [`Display`](std::fmt::Display); the
//! chain adds no parentheses of its own, so `a or b and c` is emitted as-is.

use std::fmt;

use super::literal::{quote_string, Literal};
use super::query::{FilterOperator, GroupJoin, GroupKind, StringFunction};

/// A compiled `$filter` fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// `field op value`
    Comparison {
        field: String,
        op: FilterOperator,
        value: Literal,
    },
    /// `field eq null`
    NullTest { field: String, op: FilterOperator },
    /// `[not ]func(field,'value')`
    Function {
        func: StringFunction,
        field: String,
        value: String,
        negated: bool,
    },
    /// Conditions of one group. Never empty.
    Group {
        kind: GroupKind,
        conditions: Vec<FilterExpr>,
    },
    /// Groups joined left to right. Never empty.
    Chain {
        first: Box<FilterExpr>,
        rest: Vec<(GroupJoin, FilterExpr)>,
    },
}

impl FilterExpr {
    /// Build a group node. Returns `None` when no condition survived.
    pub fn group(kind: GroupKind, conditions: Vec<FilterExpr>) -> Option<Self> {
        if conditions.is_empty() {
            None
        } else {
            Some(Self::Group { kind, conditions })
        }
    }

    /// Chain group expressions. The first join operator is ignored.
    pub fn chain<I>(groups: I) -> Option<Self>
    where
        I: IntoIterator<Item = (GroupJoin, FilterExpr)>,
    {
        let mut groups = groups.into_iter();
        let (_, first) = groups.next()?;
        let rest: Vec<_> = groups.collect();

        if rest.is_empty() {
            Some(first)
        } else {
            Some(Self::Chain {
                first: Box::new(first),
                rest,
            })
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison { field, op, value } => write!(f, "{} {} {}", field, op, value),
            Self::NullTest { field, op } => write!(f, "{} {}", field, op),
            Self::Function {
                func,
                field,
                value,
                negated,
            } => {
                if *negated {
                    f.write_str("not ")?;
                }
                write!(f, "{}({},{})", func.as_str(), field, quote_string(value))
            }
            Self::Group { kind, conditions } => {
                let joined = |sep: &str| {
                    conditions
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(sep)
                };
                match kind {
                    // Negation always needs an explicit operand
                    GroupKind::Not => write!(f, "not ({})", joined(" and ")),
                    GroupKind::And | GroupKind::Or if conditions.len() == 1 => {
                        write!(f, "{}", conditions[0])
                    }
                    GroupKind::And => write!(f, "({})", joined(" and ")),
                    GroupKind::Or => write!(f, "({})", joined(" or ")),
                }
            }
            Self::Chain { first, rest } => {
                write!(f, "{}", first)?;
                for (join, expr) in rest {
                    write!(f, " {} {}", join.as_str(), expr)?;
                }
                Ok(())
            }
        }
    }
}

//! OData literal rendering.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

/// A value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Emitted verbatim (booleans, lookup GUIDs).
    Raw(String),
    /// Unquoted number, JavaScript formatting.
    Number(f64),
    /// Single-quoted string.
    Text(String),
    /// Quoted ISO-8601 UTC instant.
    Instant(DateTime<Utc>),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(&quote_string(s)),
            Self::Instant(dt) => write!(
                f,
                "'{}'",
                dt.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
        }
    }
}

/// Quote string with single quotes, doubling embedded quotes.
///
/// This is the only escaping applied to string literals.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Format a number the way JavaScript's `String(number)` does.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }

    n.to_string()
}

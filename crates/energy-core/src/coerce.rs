//! Lenient numeric coercion of user-entered values.
//!
//! Every malformed input degrades to `0.0`; nothing here can fail. Charts
//! and cost tables are computed from coerced values only, while the raw
//! input is stored untouched so the form shows exactly what was typed.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A loosely-typed quantity as stored in the document: text typed in the
/// form, a number returned by the backend, or an explicit null.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Number(f64),
    Text(String),
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Text(String::new())
    }
}

impl RawValue {
    /// Numeric value of this raw input, see [`coerce`].
    pub fn coerced(&self) -> f64 {
        coerce(self)
    }

    /// True for null, empty text and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Number(_) => false,
            RawValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Text to show in an input field.
    pub fn as_input(&self) -> Cow<'_, str> {
        match self {
            RawValue::Null => Cow::Borrowed(""),
            RawValue::Text(s) => Cow::Borrowed(s.as_str()),
            RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Cow::Owned(format!("{n:.0}"))
            }
            RawValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_input())
    }
}

/// Convert any raw value to a finite number, defaulting to `0.0`.
pub fn coerce(value: &RawValue) -> f64 {
    match value {
        RawValue::Null => 0.0,
        RawValue::Number(n) if n.is_finite() => *n,
        RawValue::Number(_) => 0.0,
        RawValue::Text(s) => coerce_str(s),
    }
}

/// Parse user text: strip space separators, turn the first decimal comma
/// into a period, and fall back to `0.0` on anything unparseable.
pub fn coerce_str(input: &str) -> f64 {
    let compact: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect();
    if compact.is_empty() {
        return 0.0;
    }
    let normalized = compact.replacen(',', ".", 1);
    match normalized.parse::<f64>() {
        Ok(x) if x.is_finite() => x,
        _ => 0.0,
    }
}

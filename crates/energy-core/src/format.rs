//! Number formatting for chart labels and tables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placeholder shown instead of a zero or missing value.
pub const PLACEHOLDER: &str = "—";

/// The two supported display locales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Belgian French (the default).
    #[default]
    Fr,
    En,
}

impl Locale {
    fn group_separator(self) -> char {
        match self {
            Locale::Fr => '\u{202f}',
            Locale::En => ',',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Locale::Fr => ',',
            Locale::En => '.',
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-be" => Ok(Locale::Fr),
            "en" | "en-gb" | "en-us" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

/// Format with locale grouping: no decimals from 100 upwards, otherwise up
/// to two decimals with trailing zeros dropped. Non-finite input yields an
/// empty string.
pub fn format_number(x: f64, locale: Locale) -> String {
    if !x.is_finite() {
        return String::new();
    }
    let decimals = if x.abs() >= 100.0 { 0 } else { 2 };
    let fixed = format!("{:.*}", decimals, x.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + 4);
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(locale.group_separator());
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push(locale.decimal_separator());
        out.push_str(frac_part);
    }
    if x < 0.0 && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }
    out
}

/// Like [`format_number`], but zero and non-finite values become
/// [`PLACEHOLDER`].
pub fn format_or_placeholder(x: f64, locale: Locale) -> String {
    if x == 0.0 || !x.is_finite() {
        PLACEHOLDER.to_string()
    } else {
        format_number(x, locale)
    }
}

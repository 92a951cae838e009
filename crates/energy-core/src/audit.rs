//! Audit documents: per-year consumption entered row by row in several
//! sections, which the import-from-audit action folds into year totals.
//!
//! Documents are keyed `year<label>` (e.g. `year2023`). Each year block
//! holds row lists per section plus the utility headers naming the two
//! generic utility slots.

use crate::coerce::{coerce, RawValue};
use crate::store::YearTotals;
use crate::vector::Vector;
use serde_json::Value;

/// Row sections summed into totals, in display order.
pub const SECTIONS: [&str; 4] = ["operational", "buildings", "transport", "utility"];

/// Key of a year block inside an audit document.
pub fn year_key(year: &str) -> String {
    format!("year{year}")
}

/// Sum every section row for `year` into totals. `None` when the document
/// has no block for that year.
pub fn audit_totals(doc: &Value, year: &str) -> Option<YearTotals> {
    let block = doc.get(year_key(year))?.as_object()?;
    let mut sums = [0.0_f64; 7];
    for section in SECTIONS {
        let Some(rows) = block.get(section).and_then(Value::as_array) else {
            continue;
        };
        for row in rows {
            for (i, v) in Vector::ALL.iter().enumerate() {
                sums[i] += row.get(v.key()).map(raw_of).map_or(0.0, |r| coerce(&r));
            }
        }
    }
    let mut totals = YearTotals::default();
    for (v, sum) in Vector::ALL.iter().zip(sums) {
        totals.set(*v, RawValue::Number(sum));
    }
    Some(totals)
}

/// Utility slot names declared in the year block's headers, blank names
/// skipped.
pub fn utility_names(doc: &Value, year: &str) -> (Option<String>, Option<String>) {
    let headers = doc
        .get(year_key(year))
        .and_then(|b| b.get("utility_headers"));
    let name = |key: &str| {
        headers
            .and_then(|h| h.get(key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    (name("util1_name"), name("util2_name"))
}

fn raw_of(v: &Value) -> RawValue {
    match v {
        Value::Number(n) => n.as_f64().map_or(RawValue::Null, RawValue::Number),
        Value::String(s) => RawValue::Text(s.clone()),
        _ => RawValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "year2023": {
                "utility_headers": { "util1_name": "Vapeur", "util2_name": "  " },
                "operational": [
                    { "name": "Four", "electricity": "1 200,5", "gas": "300" },
                    { "name": "Presse", "electricity": 99.5, "fuel": "abc" }
                ],
                "buildings": [{ "name": "Bureaux", "gas": "100", "util1": "7" }],
                "transport": [],
                "influence_factors": [{ "description": "DJU", "value": "2400" }]
            }
        })
    }

    #[test]
    fn rows_are_summed_per_vector() {
        let totals = audit_totals(&doc(), "2023").unwrap();
        assert_eq!(totals.value(Vector::Electricity), 1300.0);
        assert_eq!(totals.value(Vector::Gas), 400.0);
        assert_eq!(totals.value(Vector::Fuel), 0.0);
        assert_eq!(totals.value(Vector::Util1), 7.0);
        assert_eq!(totals.process, RawValue::Number(0.0));
    }

    #[test]
    fn missing_year_block_is_none() {
        assert!(audit_totals(&doc(), "2022").is_none());
        assert!(audit_totals(&Value::Null, "2023").is_none());
    }

    #[test]
    fn blank_utility_names_are_skipped() {
        assert_eq!(
            utility_names(&doc(), "2023"),
            (Some("Vapeur".to_string()), None)
        );
    }
}

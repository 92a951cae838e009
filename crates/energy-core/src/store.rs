//! The per-project energy-accounting document: a year store keyed by
//! free-form year labels.
//!
//! Updates never mutate in place. Each `update_*` returns a new store that
//! shares every untouched record with the old one (records live behind
//! [`Arc`]), so callers can detect changes by identity and keep the
//! previous value around unchanged.

use crate::coerce::RawValue;
use crate::format::Locale;
use crate::vector::Vector;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

static EMPTY_RAW: RawValue = RawValue::Text(String::new());

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Raw totals for the seven vectors. Missing keys read as empty text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YearTotals {
    #[serde(default)]
    pub electricity: RawValue,
    #[serde(default)]
    pub gas: RawValue,
    #[serde(default)]
    pub fuel: RawValue,
    #[serde(default)]
    pub biogas: RawValue,
    #[serde(default)]
    pub util1: RawValue,
    #[serde(default)]
    pub util2: RawValue,
    #[serde(default)]
    pub process: RawValue,
}

impl YearTotals {
    pub fn get(&self, vector: Vector) -> &RawValue {
        match vector {
            Vector::Electricity => &self.electricity,
            Vector::Gas => &self.gas,
            Vector::Fuel => &self.fuel,
            Vector::Biogas => &self.biogas,
            Vector::Util1 => &self.util1,
            Vector::Util2 => &self.util2,
            Vector::Process => &self.process,
        }
    }

    pub fn set(&mut self, vector: Vector, value: RawValue) {
        let slot = match vector {
            Vector::Electricity => &mut self.electricity,
            Vector::Gas => &mut self.gas,
            Vector::Fuel => &mut self.fuel,
            Vector::Biogas => &mut self.biogas,
            Vector::Util1 => &mut self.util1,
            Vector::Util2 => &mut self.util2,
            Vector::Process => &mut self.process,
        };
        *slot = value;
    }

    /// Coerced value of one vector.
    pub fn value(&self, vector: Vector) -> f64 {
        self.get(vector).coerced()
    }
}

/// One year of energy accounting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Year label, mirrors the key in [`YearStore`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub totals: YearTotals,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    /// Fields owned by the backend (e.g. per-section breakdowns).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl YearRecord {
    /// A record with every total empty and no notes.
    pub fn empty(year: &str) -> Self {
        Self {
            year: year.to_string(),
            ..Self::default()
        }
    }
}

/// Year label → record, iterated in lexicographic label order.
///
/// Ordering is plain string comparison, so `"10"` sorts before `"9"`.
/// Stored documents may carry non-numeric labels, which is why labels are
/// not parsed as numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YearStore {
    #[serde(default, deserialize_with = "null_as_default")]
    years: BTreeMap<String, Arc<YearRecord>>,
    /// Custom legend label for the first utility slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub util1_name: Option<String>,
    /// Custom legend label for the second utility slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub util2_name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl YearStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a fetched document. Anything that is not a JSON object is
    /// treated as an empty store.
    pub fn from_document(doc: Value) -> Result<Self, serde_json::Error> {
        if !doc.is_object() {
            return Ok(Self::default());
        }
        serde_json::from_value(doc)
    }

    /// Fill read-time defaults after a load: record labels mirror their
    /// keys and `active_year` exists.
    pub fn normalize(&self, active_year: &str) -> Self {
        if !self.contains_year(active_year) {
            debug!(year = active_year, "adding empty active year");
        }
        let mut next = self.ensure_year(active_year);
        for (label, rec) in next.years.iter_mut() {
            if rec.year != *label {
                Arc::make_mut(rec).year = label.clone();
            }
        }
        next
    }

    /// Insert an empty record for `label` if absent. Idempotent.
    pub fn ensure_year(&self, label: &str) -> Self {
        let mut next = self.clone();
        next.years
            .entry(label.to_string())
            .or_insert_with(|| Arc::new(YearRecord::empty(label)));
        next
    }

    /// Set one raw total for `year`, creating the year if needed. The raw
    /// value is stored as given; coercion happens only on read.
    pub fn update_total(&self, year: &str, vector: Vector, raw: impl Into<RawValue>) -> Self {
        let mut next = self.clone();
        next.record_mut(year).totals.set(vector, raw.into());
        next
    }

    /// Set the notes of `year`, creating the year if needed.
    pub fn update_notes(&self, year: &str, text: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.record_mut(year).notes = text.into();
        next
    }

    /// Replace all seven totals of `year`, keeping its notes.
    pub fn replace_totals(&self, year: &str, totals: YearTotals) -> Self {
        let mut next = self.clone();
        next.record_mut(year).totals = totals;
        next
    }

    fn record_mut(&mut self, year: &str) -> &mut YearRecord {
        let rec = self
            .years
            .entry(year.to_string())
            .or_insert_with(|| Arc::new(YearRecord::empty(year)));
        Arc::make_mut(rec)
    }

    /// Year labels in display order (lexicographic).
    pub fn list_years(&self) -> Vec<String> {
        self.years.keys().cloned().collect()
    }

    pub fn contains_year(&self, year: &str) -> bool {
        self.years.contains_key(year)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &YearRecord)> {
        self.years.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn record(&self, year: &str) -> Option<&YearRecord> {
        self.years.get(year).map(|r| r.as_ref())
    }

    /// The stored record, or an empty one for unknown labels.
    pub fn record_or_empty(&self, year: &str) -> Cow<'_, YearRecord> {
        match self.record(year) {
            Some(rec) => Cow::Borrowed(rec),
            None => Cow::Owned(YearRecord::empty(year)),
        }
    }

    /// True when both stores hold the very same record allocation for
    /// `year`, i.e. it was not touched between them.
    pub fn shares_record(&self, other: &YearStore, year: &str) -> bool {
        match (self.years.get(year), other.years.get(year)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Raw input for one cell; empty text when the year is unknown.
    pub fn raw_total(&self, year: &str, vector: Vector) -> &RawValue {
        self.years
            .get(year)
            .map(|r| r.totals.get(vector))
            .unwrap_or(&EMPTY_RAW)
    }

    /// Coerced value for one cell; `0.0` when absent or malformed.
    pub fn total(&self, year: &str, vector: Vector) -> f64 {
        self.raw_total(year, vector).coerced()
    }

    pub fn notes(&self, year: &str) -> &str {
        self.years.get(year).map(|r| r.notes.as_str()).unwrap_or("")
    }

    /// Coerced values of `vector`, aligned with [`YearStore::list_years`].
    pub fn series(&self, vector: Vector) -> Vec<f64> {
        self.years
            .values()
            .map(|r| r.totals.value(vector))
            .collect()
    }

    /// Legend label for `vector`, honouring the custom utility names.
    pub fn series_label(&self, vector: Vector, locale: Locale) -> String {
        let custom = match vector {
            Vector::Util1 => self.util1_name.as_deref(),
            Vector::Util2 => self.util2_name.as_deref(),
            _ => None,
        };
        match custom {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => vector.label(locale).to_string(),
        }
    }
}

#![deny(warnings)]

//! Cost models for energy accounting.
//!
//! This crate provides:
//! - A unit price table for the four priced vectors, with hard-coded defaults
//! - The cost calculator: per-year and per-vector costs, grand total, and
//!   the most expensive year/vector
//! - Conversions of entered quantities to kWh

use energy_core::{PricedVector, RawValue, Vector, YearStore};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

static MISSING_PRICE: RawValue = RawValue::Null;

/// Unit prices (currency per unit) keyed by priced vector.
///
/// Prices are raw user input and are coerced like consumption totals. The
/// table lives only in page state and is reset to defaults on reload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    prices: BTreeMap<PricedVector, RawValue>,
}

impl Default for PriceTable {
    fn default() -> Self {
        let prices = PricedVector::ALL
            .into_iter()
            .map(|v| (v, RawValue::from(default_price(v))))
            .collect();
        Self { prices }
    }
}

/// Hard-coded default unit price for a vector.
pub fn default_price(vector: PricedVector) -> &'static str {
    match vector {
        PricedVector::Electricity => "0.25",
        PricedVector::Gas => "0.08",
        PricedVector::Fuel => "1.10",
        PricedVector::Biogas => "0.09",
    }
}

impl PriceTable {
    /// Raw price as entered.
    pub fn get(&self, vector: PricedVector) -> &RawValue {
        self.prices.get(&vector).unwrap_or(&MISSING_PRICE)
    }

    pub fn set(&mut self, vector: PricedVector, raw: impl Into<RawValue>) {
        self.prices.insert(vector, raw.into());
    }

    /// Builder-style [`PriceTable::set`].
    pub fn with_price(mut self, vector: PricedVector, raw: impl Into<RawValue>) -> Self {
        self.set(vector, raw);
        self
    }

    /// Coerced unit price.
    pub fn unit_price(&self, vector: PricedVector) -> Decimal {
        to_decimal(self.get(vector).coerced())
    }
}

/// Convert a coerced quantity to `Decimal` through its shortest decimal
/// representation, so `0.08` stays exactly `0.08`. Values outside the
/// decimal range degrade to zero.
pub fn to_decimal(x: f64) -> Decimal {
    x.to_string().parse::<Decimal>().unwrap_or_else(|_| {
        warn!(value = x, "quantity outside decimal range, using 0");
        Decimal::ZERO
    })
}

fn mul_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        warn!(%a, %b, "cost overflow, using 0");
        Decimal::ZERO
    })
}

/// Costs of one year, indexed like [`PricedVector::ALL`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YearCost {
    pub year: String,
    pub by_vector: [Decimal; 4],
    pub total: Decimal,
}

impl YearCost {
    pub fn cost(&self, vector: PricedVector) -> Decimal {
        self.by_vector[vector.index()]
    }
}

/// Derived cost tables; never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CostReport {
    /// One entry per requested year label, in the given order.
    pub years: Vec<YearCost>,
    /// Sum over years, indexed like [`PricedVector::ALL`].
    pub per_vector_total: [Decimal; 4],
    pub grand_total: Decimal,
    /// `None` when the grand total is zero.
    pub most_expensive_year: Option<String>,
    /// `None` when the grand total is zero.
    pub most_expensive_vector: Option<PricedVector>,
}

impl CostReport {
    pub fn per_year_total(&self) -> Vec<Decimal> {
        self.years.iter().map(|y| y.total).collect()
    }

    pub fn vector_total(&self, vector: PricedVector) -> Decimal {
        self.per_vector_total[vector.index()]
    }

    /// Share of the grand total spent on `vector`, in [0, 1] for
    /// non-negative data; `0.0` when nothing was spent.
    pub fn share(&self, vector: PricedVector) -> f64 {
        if self.grand_total.is_zero() {
            return 0.0;
        }
        (self.vector_total(vector) / self.grand_total)
            .to_f64()
            .unwrap_or(0.0)
    }
}

/// Index of the first maximum. Ties keep the earliest entry.
fn first_max(values: &[Decimal]) -> Option<usize> {
    let mut best: Option<(usize, Decimal)> = None;
    for (i, v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if *v <= b => {}
            _ => best = Some((i, *v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Compute every cost aggregate for `years` (normally
/// [`YearStore::list_years`]). Only the four priced vectors contribute;
/// labels missing from the store count as all-zero years.
pub fn compute_costs(store: &YearStore, prices: &PriceTable, years: &[String]) -> CostReport {
    let unit: [Decimal; 4] = PricedVector::ALL.map(|v| prices.unit_price(v));

    let mut per_vector_total = [Decimal::ZERO; 4];
    let mut rows = Vec::with_capacity(years.len());
    for year in years {
        let mut by_vector = [Decimal::ZERO; 4];
        for v in PricedVector::ALL {
            let qty = to_decimal(store.total(year, v.vector()));
            let cost = mul_or_zero(qty, unit[v.index()]);
            by_vector[v.index()] = cost;
            per_vector_total[v.index()] = per_vector_total[v.index()].saturating_add(cost);
        }
        let total = by_vector
            .iter()
            .fold(Decimal::ZERO, |acc, c| acc.saturating_add(*c));
        rows.push(YearCost {
            year: year.clone(),
            by_vector,
            total,
        });
    }

    let year_totals: Vec<Decimal> = rows.iter().map(|r| r.total).collect();
    let grand_total = year_totals
        .iter()
        .fold(Decimal::ZERO, |acc, c| acc.saturating_add(*c));

    let (most_expensive_year, most_expensive_vector) = if grand_total.is_zero() {
        (None, None)
    } else {
        (
            first_max(&year_totals).map(|i| rows[i].year.clone()),
            first_max(&per_vector_total).map(|i| PricedVector::ALL[i]),
        )
    };

    CostReport {
        years: rows,
        per_vector_total,
        grand_total,
        most_expensive_year,
        most_expensive_vector,
    }
}

/// kWh per entered unit; `None` for vectors that are not energy
/// quantities (the utility slots and process emissions).
pub fn kwh_factor(vector: Vector) -> Option<f64> {
    match vector {
        Vector::Electricity | Vector::Gas | Vector::Biogas => Some(1.0),
        // light heating oil, litres
        Vector::Fuel => Some(10.0),
        Vector::Util1 | Vector::Util2 | Vector::Process => None,
    }
}

pub fn to_kwh(vector: Vector, quantity: f64) -> Option<f64> {
    kwh_factor(vector).map(|f| f * quantity)
}

/// Final energy per year in kWh over the convertible vectors, aligned
/// with `years`.
pub fn yearly_energy_kwh(store: &YearStore, years: &[String]) -> Vec<f64> {
    years
        .iter()
        .map(|y| {
            Vector::ALL
                .into_iter()
                .filter_map(|v| to_kwh(v, store.total(y, v)))
                .sum()
        })
        .collect()
}

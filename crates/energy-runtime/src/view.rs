//! Read-only view model: everything the energy screen displays, derived
//! from the year store and the price table.

use energy_charts::{
    bar_chart, donut_chart, stacked_bars, stacked_series_chart, BarChart, ChartSeries, DonutChart,
    DonutSlice, StackedBars, StackedChart,
};
use energy_core::{Locale, PricedVector, Vector, YearRecord, YearStore};
use energy_econ::{compute_costs, yearly_energy_kwh, CostReport, PriceTable};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Vectors that get their own per-year bar chart.
pub const DETAIL_VECTORS: [Vector; 3] = [Vector::Electricity, Vector::Gas, Vector::Process];

const COST_COLOR: &str = "#111827";

#[derive(Clone, Debug, Serialize)]
pub struct VectorBars {
    pub vector: Vector,
    pub title: String,
    pub chart: BarChart,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnergyView {
    pub project_name: Option<String>,
    pub years: Vec<String>,
    pub active_year: String,
    /// The active year's record, empty when the year does not exist yet.
    pub active: YearRecord,
    pub costs: CostReport,
    /// Convertible consumption per year, in kWh.
    pub energy_kwh: Vec<f64>,
    /// All vectors per year as stacked columns.
    pub breakdown: StackedBars,
    pub overview: StackedChart,
    pub vector_bars: Vec<VectorBars>,
    pub cost_by_year: BarChart,
    /// Spend per priced vector over all years.
    pub cost_mix: DonutChart,
}

/// One chart series per vector, values aligned with `store.list_years()`.
pub fn chart_series(store: &YearStore, locale: Locale) -> Vec<ChartSeries> {
    Vector::ALL
        .iter()
        .map(|&v| {
            ChartSeries::new(
                v.key(),
                store.series_label(v, locale),
                v.color(),
                store.series(v),
            )
        })
        .collect()
}

fn per_year_title(label: &str, locale: Locale) -> String {
    match locale {
        Locale::Fr => format!("{label} par année"),
        Locale::En => format!("{label} per year"),
    }
}

fn as_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

pub fn build_view(
    store: &YearStore,
    prices: &PriceTable,
    active_year: &str,
    project_name: Option<&str>,
    locale: Locale,
) -> EnergyView {
    let years = store.list_years();
    let series = chart_series(store, locale);
    let costs = compute_costs(store, prices, &years);

    let vector_bars = DETAIL_VECTORS
        .iter()
        .map(|&v| {
            let label = store.series_label(v, locale);
            VectorBars {
                vector: v,
                title: per_year_title(&label, locale),
                chart: bar_chart(&years, &store.series(v), v.color(), locale),
            }
        })
        .collect();

    let year_costs: Vec<f64> = costs.per_year_total().into_iter().map(as_f64).collect();
    let cost_mix = donut_chart(
        &PricedVector::ALL
            .iter()
            .map(|&pv| {
                let v = pv.vector();
                let spent = as_f64(costs.vector_total(pv));
                DonutSlice::new(v.key(), v.label(locale), v.color(), spent)
            })
            .collect::<Vec<_>>(),
        locale,
    );

    EnergyView {
        project_name: project_name.map(str::to_string),
        active_year: active_year.to_string(),
        active: store.record_or_empty(active_year).into_owned(),
        energy_kwh: yearly_energy_kwh(store, &years),
        breakdown: stacked_bars(&years, &series, locale),
        overview: stacked_series_chart(&years, &series, locale),
        vector_bars,
        cost_by_year: bar_chart(&years, &year_costs, COST_COLOR, locale),
        cost_mix,
        costs,
        years,
    }
}

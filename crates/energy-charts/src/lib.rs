#![deny(warnings)]

//! Chart geometry for the energy-accounting page.
//!
//! Every builder is a pure function from numeric series to drawable
//! primitives (rectangles, polygons, arc paths, text labels). Inputs are
//! assumed to be coerced already; non-finite values are still read as zero.
//! Output order always follows the caller's series order, so identical
//! input renders identically.
//!
//! Chart kinds:
//! - [`bar_chart`]: one bar per label
//! - [`stacked_bars`]: one stacked column per year
//! - [`stacked_series_chart`]: grouped bars for a single year, stacked
//!   area across several years
//! - [`grouped_bars`]: one cluster of bars per year
//! - [`donut_chart`]: share of a total as ring slices
//!
//! [`ToSvg`] paints the geometry through plotters' SVG backend.

pub mod bar;
pub mod donut;
pub mod geometry;
pub mod stacked;
pub mod svg;

pub use bar::{bar_chart, BarChart, BarGlyph};
pub use donut::{donut_chart, Donut, DonutArc, DonutChart, DonutSlice};
pub use geometry::{Anchor, Label, LegendEntry, Line, Point, Rect};
pub use stacked::{
    active_series, grouped_bars, stacked_area, stacked_bars, stacked_series_chart, AreaBand,
    BarGroup, GroupedBars, SeriesBar, StackColumn, StackedArea, StackedBars, StackedChart,
};
pub use svg::ToSvg;

use serde::Serialize;
use thiserror::Error;

/// Failure while painting a chart through the SVG backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("svg backend error: {0}")]
    Backend(String),
}

/// A named numeric series aligned with a year-label sequence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSeries {
    pub key: String,
    pub label: String,
    pub color: String,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            color: color.into(),
            values,
        }
    }

    /// Value at `i`, zero when missing or non-finite.
    pub fn value(&self, i: usize) -> f64 {
        finite_or_zero(self.values.get(i).copied().unwrap_or(0.0))
    }

    /// True when at least one value is strictly positive.
    pub fn is_active(&self) -> bool {
        self.values.iter().any(|v| v.is_finite() && *v > 0.0)
    }

    pub fn legend_entry(&self) -> LegendEntry {
        LegendEntry {
            key: self.key.clone(),
            label: self.label.clone(),
            color: self.color.clone(),
        }
    }
}

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

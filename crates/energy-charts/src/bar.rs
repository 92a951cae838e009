//! Single-series bar chart: one bar per label, scaled against the largest
//! value.

use energy_core::{format_or_placeholder, Locale};
use serde::Serialize;

use crate::finite_or_zero;
use crate::geometry::{Label, Line, Rect};

pub const HEIGHT: f64 = 240.0;
pub const BASELINE_Y: f64 = 200.0;
pub const PLOT_HEIGHT: f64 = 160.0;
pub const MIN_WIDTH: f64 = 520.0;
pub const SLOT_WIDTH: f64 = 90.0;
pub const STEP: f64 = 80.0;
pub const LEFT: f64 = 60.0;
pub const BAR_WIDTH: f64 = 44.0;
pub const CORNER: f64 = 8.0;
const AXIS_X: f64 = 40.0;
const TOP_Y: f64 = 20.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarChart {
    pub width: f64,
    pub height: f64,
    pub axes: Vec<Line>,
    pub bars: Vec<BarGlyph>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarGlyph {
    pub label: String,
    pub value: f64,
    pub rect: Rect,
    pub value_label: Label,
    pub axis_label: Label,
}

/// Build one bar per label. Missing or non-finite values count as zero and
/// negative values draw no height.
pub fn bar_chart(labels: &[String], values: &[f64], color: &str, locale: Locale) -> BarChart {
    let n = labels.len();
    let width = MIN_WIDTH.max(n as f64 * SLOT_WIDTH);
    let values: Vec<f64> = (0..n)
        .map(|i| finite_or_zero(values.get(i).copied().unwrap_or(0.0)))
        .collect();
    let max = values.iter().copied().fold(1.0_f64, f64::max);

    let bars = labels
        .iter()
        .zip(&values)
        .enumerate()
        .map(|(i, (label, &v))| {
            let h = (v.max(0.0) / max * PLOT_HEIGHT).round();
            let x = LEFT + i as f64 * STEP;
            let y = BASELINE_Y - h;
            let mid = x + BAR_WIDTH / 2.0;
            BarGlyph {
                label: label.clone(),
                value: v,
                rect: Rect {
                    x,
                    y,
                    width: BAR_WIDTH,
                    height: h,
                    rx: CORNER,
                    fill: color.to_string(),
                },
                value_label: Label::value(mid, y - 8.0, format_or_placeholder(v, locale)),
                axis_label: Label::axis(mid, BASELINE_Y + 20.0, label.clone()),
            }
        })
        .collect();

    BarChart {
        width,
        height: HEIGHT,
        axes: vec![
            Line::axis(AXIS_X, BASELINE_Y, width, BASELINE_Y),
            Line::axis(AXIS_X, TOP_Y, AXIS_X, BASELINE_Y),
        ],
        bars,
    }
}

//! Multi-series charts over a sequence of years: stacked columns, grouped
//! bars and stacked areas.
//!
//! Series whose values are all zero (or negative) are dropped before
//! layout, so they appear neither in the geometry nor in the legend.

use energy_core::{format_number, format_or_placeholder, Locale};
use serde::Serialize;

use crate::geometry::{coord, Label, LegendEntry, Line, Point, Rect};
use crate::ChartSeries;

pub const LEFT: f64 = 50.0;
pub const TOP: f64 = 20.0;
pub const BASE_Y: f64 = 220.0;
pub const PLOT_HEIGHT: f64 = 180.0;
pub const SVG_HEIGHT: f64 = 260.0;
pub const MIN_WIDTH: f64 = 620.0;
pub const RIGHT_PAD: f64 = 40.0;

pub const COLUMN_WIDTH: f64 = 44.0;
pub const COLUMN_GAP: f64 = 28.0;

pub const GROUP_BAR_WIDTH: f64 = 18.0;
pub const GROUP_INNER_GAP: f64 = 4.0;
pub const GROUP_GAP: f64 = 28.0;

/// Width of the band drawn when an area chart has a single year.
pub const AREA_SINGLE_WIDTH: f64 = 60.0;
/// Horizontal inset of the first area point from the plot's left edge.
pub const AREA_INSET: f64 = 40.0;

const FIRST_SLOT: f64 = LEFT + 20.0;

/// A bar or stack segment belonging to one series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesBar {
    pub key: String,
    pub value: f64,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackColumn {
    pub year: String,
    pub total: f64,
    /// Bottom to top, in series order.
    pub segments: Vec<SeriesBar>,
    pub total_label: Label,
    pub axis_label: Label,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackedBars {
    pub width: f64,
    pub height: f64,
    pub axes: Vec<Line>,
    pub columns: Vec<StackColumn>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarGroup {
    pub year: String,
    pub bars: Vec<SeriesBar>,
    pub value_labels: Vec<Label>,
    pub axis_label: Label,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupedBars {
    pub width: f64,
    pub height: f64,
    pub axes: Vec<Line>,
    pub groups: Vec<BarGroup>,
    pub legend: Vec<LegendEntry>,
}

/// One filled band of a stacked area chart. Points run along the upper
/// edge left to right, then back along the lower edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AreaBand {
    pub key: String,
    pub label: String,
    pub color: String,
    pub points: Vec<Point>,
}

impl AreaBand {
    /// Closed SVG path through the band's points.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.points.iter().enumerate() {
            out.push_str(if i == 0 { "M " } else { " L " });
            out.push_str(&coord(p.x));
            out.push(' ');
            out.push_str(&coord(p.y));
        }
        if !out.is_empty() {
            out.push_str(" Z");
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackedArea {
    pub width: f64,
    pub height: f64,
    pub axes: Vec<Line>,
    pub bands: Vec<AreaBand>,
    pub year_labels: Vec<Label>,
    pub total_labels: Vec<Label>,
    pub legend: Vec<LegendEntry>,
}

/// Layout chosen by [`stacked_series_chart`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum StackedChart {
    /// No year or no series with a positive value.
    Empty,
    Grouped(GroupedBars),
    Area(StackedArea),
}

impl StackedChart {
    pub fn legend(&self) -> &[LegendEntry] {
        match self {
            StackedChart::Empty => &[],
            StackedChart::Grouped(g) => &g.legend,
            StackedChart::Area(a) => &a.legend,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StackedChart::Empty)
    }
}

/// Series with at least one strictly positive value, in input order.
pub fn active_series(series: &[ChartSeries]) -> Vec<&ChartSeries> {
    series.iter().filter(|s| s.is_active()).collect()
}

fn legend_of(active: &[&ChartSeries]) -> Vec<LegendEntry> {
    active.iter().map(|s| s.legend_entry()).collect()
}

fn positive(s: &ChartSeries, i: usize) -> f64 {
    s.value(i).max(0.0)
}

/// Sum that saturates at `f64::MAX` instead of overflowing to infinity.
fn capped_add(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum.is_finite() {
        sum
    } else {
        f64::MAX
    }
}

fn column_totals(active: &[&ChartSeries], n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| active.iter().fold(0.0, |acc, s| capped_add(acc, positive(s, i))))
        .collect()
}

fn frame(width: f64) -> Vec<Line> {
    vec![
        Line::axis(LEFT, BASE_Y, width - 20.0, BASE_Y),
        Line::axis(LEFT, TOP, LEFT, BASE_Y),
    ]
}

/// Pick the layout for a year range: grouped bars for a single year,
/// stacked area for several, nothing when no series has data.
pub fn stacked_series_chart(
    years: &[String],
    series: &[ChartSeries],
    locale: Locale,
) -> StackedChart {
    if years.is_empty() || active_series(series).is_empty() {
        return StackedChart::Empty;
    }
    if years.len() == 1 {
        StackedChart::Grouped(grouped_bars(years, series, locale))
    } else {
        StackedChart::Area(stacked_area(years, series, locale))
    }
}

/// One column per year with the active series stacked bottom-up.
pub fn stacked_bars(years: &[String], series: &[ChartSeries], locale: Locale) -> StackedBars {
    let active = active_series(series);
    let n = years.len();
    let slot = COLUMN_WIDTH + COLUMN_GAP;
    let width = MIN_WIDTH.max(LEFT + n as f64 * slot + RIGHT_PAD);
    let totals = column_totals(&active, n);
    let max_total = totals.iter().copied().fold(1.0_f64, f64::max);

    let columns = years
        .iter()
        .enumerate()
        .map(|(i, year)| {
            let x = FIRST_SLOT + i as f64 * slot;
            let mid = x + COLUMN_WIDTH / 2.0;
            let mut cursor = BASE_Y;
            let mut segments = Vec::new();
            for s in &active {
                let v = positive(s, i);
                if v <= 0.0 {
                    continue;
                }
                let h = v / max_total * PLOT_HEIGHT;
                cursor -= h;
                segments.push(SeriesBar {
                    key: s.key.clone(),
                    value: v,
                    rect: Rect {
                        x,
                        y: cursor,
                        width: COLUMN_WIDTH,
                        height: h,
                        rx: 0.0,
                        fill: s.color.clone(),
                    },
                });
            }
            StackColumn {
                year: year.clone(),
                total: totals[i],
                segments,
                total_label: Label::value(mid, cursor - 8.0, format_or_placeholder(totals[i], locale)),
                axis_label: Label::axis(mid, BASE_Y + 18.0, year.clone()),
            }
        })
        .collect();

    StackedBars {
        width,
        height: SVG_HEIGHT,
        axes: frame(width),
        columns,
        legend: legend_of(&active),
    }
}

/// One cluster per year, one bar per active series inside each cluster.
pub fn grouped_bars(years: &[String], series: &[ChartSeries], locale: Locale) -> GroupedBars {
    let active = active_series(series);
    let n = years.len();
    let k = active.len() as f64;
    let group_width = k * GROUP_BAR_WIDTH + (k - 1.0).max(0.0) * GROUP_INNER_GAP;
    let width = MIN_WIDTH.max(FIRST_SLOT + n as f64 * (group_width + GROUP_GAP) + RIGHT_PAD);
    let max = active
        .iter()
        .flat_map(|s| (0..n).map(move |i| positive(s, i)))
        .fold(1.0_f64, f64::max);

    let groups = years
        .iter()
        .enumerate()
        .map(|(i, year)| {
            let gx = FIRST_SLOT + i as f64 * (group_width + GROUP_GAP);
            let mut bars = Vec::new();
            let mut value_labels = Vec::new();
            for (j, s) in active.iter().enumerate() {
                let v = positive(s, i);
                if v <= 0.0 {
                    continue;
                }
                let h = v / max * PLOT_HEIGHT;
                let x = gx + j as f64 * (GROUP_BAR_WIDTH + GROUP_INNER_GAP);
                let y = BASE_Y - h;
                value_labels.push(Label::value(
                    x + GROUP_BAR_WIDTH / 2.0,
                    y - 6.0,
                    format_number(v, locale),
                ));
                bars.push(SeriesBar {
                    key: s.key.clone(),
                    value: v,
                    rect: Rect {
                        x,
                        y,
                        width: GROUP_BAR_WIDTH,
                        height: h,
                        rx: 4.0,
                        fill: s.color.clone(),
                    },
                });
            }
            BarGroup {
                year: year.clone(),
                bars,
                value_labels,
                axis_label: Label::axis(gx + group_width / 2.0, BASE_Y + 18.0, year.clone()),
            }
        })
        .collect();

    GroupedBars {
        width,
        height: SVG_HEIGHT,
        axes: frame(width),
        groups,
        legend: legend_of(&active),
    }
}

/// Year x-positions for an area chart of the given width.
fn area_positions(n: usize, width: f64) -> Vec<f64> {
    let first = LEFT + AREA_INSET;
    let last = width - RIGHT_PAD;
    match n {
        0 => Vec::new(),
        1 => vec![(first + last) / 2.0],
        _ => {
            let step = (last - first) / (n - 1) as f64;
            (0..n).map(|i| first + i as f64 * step).collect()
        }
    }
}

/// Cumulative stacked area across years. With a single year each band is
/// drawn as a fixed-width block centred on that year.
pub fn stacked_area(years: &[String], series: &[ChartSeries], locale: Locale) -> StackedArea {
    let active = active_series(series);
    let n = years.len();
    let width = MIN_WIDTH.max(LEFT + n as f64 * (COLUMN_WIDTH + COLUMN_GAP) + RIGHT_PAD);
    let xs = area_positions(n, width);
    let totals = column_totals(&active, n);
    let max_total = totals.iter().copied().fold(1.0_f64, f64::max);
    let y_of = |v: f64| BASE_Y - v / max_total * PLOT_HEIGHT;

    let mut lower = vec![0.0_f64; n];
    let mut bands = Vec::with_capacity(active.len());
    if n > 0 {
        for s in &active {
            let upper: Vec<f64> = (0..n).map(|i| capped_add(lower[i], positive(s, i))).collect();
            let points = if n == 1 {
                let half = AREA_SINGLE_WIDTH / 2.0;
                let (top, bottom) = (y_of(upper[0]), y_of(lower[0]));
                vec![
                    Point::new(xs[0] - half, top),
                    Point::new(xs[0] + half, top),
                    Point::new(xs[0] + half, bottom),
                    Point::new(xs[0] - half, bottom),
                ]
            } else {
                let top = (0..n).map(|i| Point::new(xs[i], y_of(upper[i])));
                let bottom = (0..n).rev().map(|i| Point::new(xs[i], y_of(lower[i])));
                top.chain(bottom).collect()
            };
            bands.push(AreaBand {
                key: s.key.clone(),
                label: s.label.clone(),
                color: s.color.clone(),
                points,
            });
            lower = upper;
        }
    }

    let year_labels = years
        .iter()
        .zip(&xs)
        .map(|(year, &x)| Label::axis(x, BASE_Y + 18.0, year.clone()))
        .collect();
    let total_labels = totals
        .iter()
        .zip(&xs)
        .map(|(&t, &x)| Label::value(x, y_of(t) - 8.0, format_or_placeholder(t, locale)))
        .collect();

    StackedArea {
        width,
        height: SVG_HEIGHT,
        axes: frame(width),
        bands,
        year_labels,
        total_labels,
        legend: legend_of(&active),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn years(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Vec<ChartSeries> {
        vec![
            ChartSeries::new("electricity", "Électricité", "#6d28d9", vec![100.0, 200.0]),
            ChartSeries::new("gas", "Gaz", "#2563eb", vec![0.0, 0.0]),
            ChartSeries::new("fuel", "Fioul", "#f59e0b", vec![50.0, 0.0]),
        ]
    }

    fn keys(legend: &[LegendEntry]) -> Vec<&str> {
        legend.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn all_zero_series_are_dropped_everywhere() {
        let chart = stacked_series_chart(&years(&["2022", "2023"]), &sample(), Locale::Fr);
        let StackedChart::Area(area) = &chart else {
            panic!("expected an area chart, got {chart:?}");
        };
        assert_eq!(keys(&area.legend), vec!["electricity", "fuel"]);
        assert!(area.bands.iter().all(|b| b.key != "gas"));

        let single = stacked_series_chart(&years(&["2023"]), &sample()[1..2], Locale::Fr);
        assert!(single.is_empty());
        assert!(single.legend().is_empty());
    }

    #[test]
    fn area_bands_stack_cumulatively() {
        let area = stacked_area(&years(&["2022", "2023"]), &sample(), Locale::En);
        assert_eq!(area.width, MIN_WIDTH);
        let elec = &area.bands[0];
        assert_eq!(
            elec.points,
            vec![
                Point::new(90.0, 130.0),
                Point::new(580.0, 40.0),
                Point::new(580.0, 220.0),
                Point::new(90.0, 220.0),
            ]
        );
        assert_eq!(elec.path(), "M 90 130 L 580 40 L 580 220 L 90 220 Z");
        let fuel = &area.bands[1];
        assert_eq!(fuel.points[0], Point::new(90.0, 85.0));
        // Lower edge of the second band is the upper edge of the first.
        assert_eq!(fuel.points[3], Point::new(90.0, 130.0));
        assert_eq!(fuel.points[2], Point::new(580.0, 40.0));
        assert_eq!(area.total_labels[1].text, "200");
    }

    #[test]
    fn single_year_area_is_a_centred_block() {
        let series = vec![ChartSeries::new("gas", "Gaz", "#2563eb", vec![10.0])];
        let area = stacked_area(&years(&["2023"]), &series, Locale::En);
        let p = &area.bands[0].points;
        let mid = (LEFT + AREA_INSET + area.width - RIGHT_PAD) / 2.0;
        assert_eq!(p[1].x - p[0].x, AREA_SINGLE_WIDTH);
        assert_eq!((p[0].x + p[1].x) / 2.0, mid);
        assert_eq!(p[0].y, BASE_Y - PLOT_HEIGHT);
        assert_eq!(p[3].y, BASE_Y);
    }

    #[test]
    fn overflowing_totals_keep_a_finite_scale() {
        let huge = vec![
            ChartSeries::new("electricity", "Électricité", "#6d28d9", vec![1e308, 1e308]),
            ChartSeries::new("gas", "Gaz", "#2563eb", vec![1e308, 1e308]),
        ];
        let area = stacked_area(&years(&["2022", "2023"]), &huge, Locale::En);
        let all = area.bands.iter().flat_map(|b| &b.points);
        assert!(all.clone().all(|p| p.y.is_finite()));
        // The lower band still has height; the upper one reaches the top.
        let elec = &area.bands[0].points;
        assert!(elec[0].y < BASE_Y);
        assert_eq!(area.bands[1].points[0].y, BASE_Y - PLOT_HEIGHT);

        let bars = stacked_bars(&years(&["2022", "2023"]), &huge, Locale::En);
        let seg = &bars.columns[0].segments[0].rect;
        assert!(seg.height > 0.0 && seg.height.is_finite());
    }

    #[test]
    fn one_year_uses_grouped_bars() {
        let series = vec![
            ChartSeries::new("electricity", "Élec", "#6d28d9", vec![300.0]),
            ChartSeries::new("biogas", "Biogaz", "#10b981", vec![0.0]),
            ChartSeries::new("process", "Process", "#ef4444", vec![150.0]),
        ];
        let chart = stacked_series_chart(&years(&["2023"]), &series, Locale::En);
        let StackedChart::Grouped(g) = chart else {
            panic!("expected grouped bars");
        };
        assert_eq!(keys(&g.legend), vec!["electricity", "process"]);
        let bars = &g.groups[0].bars;
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].rect.x, FIRST_SLOT);
        assert_eq!(bars[1].rect.x, FIRST_SLOT + GROUP_BAR_WIDTH + GROUP_INNER_GAP);
        assert_eq!(bars[0].rect.height, PLOT_HEIGHT);
        assert_eq!(bars[1].rect.height, PLOT_HEIGHT / 2.0);
    }

    #[test]
    fn stacked_columns_grow_upwards() {
        let chart = stacked_bars(&years(&["2022", "2023"]), &sample(), Locale::En);
        let first = &chart.columns[0];
        assert_eq!(first.total, 150.0);
        assert_eq!(first.segments.len(), 2);
        assert_eq!(first.segments[0].rect.y, 130.0);
        assert_eq!(first.segments[1].rect.y, 85.0);
        assert_eq!(first.segments[0].rect.x, FIRST_SLOT);
        assert_eq!(chart.columns[1].segments[0].rect.x, FIRST_SLOT + 72.0);
        assert_eq!(chart.columns[1].segments[0].rect.height, PLOT_HEIGHT);
        assert_eq!(keys(&chart.legend), vec!["electricity", "fuel"]);
    }

    #[test]
    fn no_years_is_empty() {
        assert!(stacked_series_chart(&[], &sample(), Locale::En).is_empty());
    }

    proptest! {
        #[test]
        fn layout_is_deterministic(values in proptest::collection::vec(0.0f64..1e6, 1..8)) {
            let labels: Vec<String> = (0..values.len()).map(|i| (2000 + i).to_string()).collect();
            let series = vec![
                ChartSeries::new("gas", "Gaz", "#2563eb", values.clone()),
                ChartSeries::new("fuel", "Fioul", "#f59e0b", values.iter().map(|v| v / 2.0).collect()),
            ];
            let a = stacked_series_chart(&labels, &series, Locale::Fr);
            let b = stacked_series_chart(&labels, &series, Locale::Fr);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn area_points_stay_inside_the_plot(values in proptest::collection::vec(0.0f64..1e9, 2..12)) {
            let labels: Vec<String> = (0..values.len()).map(|i| (2000 + i).to_string()).collect();
            let series = vec![ChartSeries::new("gas", "Gaz", "#2563eb", values)];
            let area = stacked_area(&labels, &series, Locale::En);
            for band in &area.bands {
                for p in &band.points {
                    prop_assert!(p.y >= TOP - 1e-9 && p.y <= BASE_Y + 1e-9);
                    prop_assert!(p.x >= LEFT && p.x <= area.width);
                }
            }
        }
    }
}

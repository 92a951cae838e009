//! Donut (ring) chart. Angles are radians measured clockwise from twelve
//! o'clock; the first slice starts at the top.

use std::f64::consts::{PI, TAU};

use energy_core::{format_number, Locale};
use serde::Serialize;

use crate::geometry::{coord, Label, LegendEntry, Point};

pub const SIZE: f64 = 220.0;
pub const CENTER: f64 = 110.0;
pub const OUTER_RADIUS: f64 = 90.0;
pub const INNER_RADIUS: f64 = 56.0;

const FULL_TURN_EPSILON: f64 = 1e-9;

/// Input slice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DonutSlice {
    pub key: String,
    pub label: String,
    pub color: String,
    pub value: f64,
}

impl DonutSlice {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            color: color.into(),
            value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DonutArc {
    pub key: String,
    pub label: String,
    pub color: String,
    pub value: f64,
    /// Fraction of the total, in `(0, 1]`.
    pub share: f64,
    pub start_angle: f64,
    pub sweep: f64,
    /// Closed ring-segment path; a full turn is drawn as two half arcs and
    /// needs `fill-rule="evenodd"`.
    pub path: String,
}

impl DonutArc {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    pub fn is_full_turn(&self) -> bool {
        self.sweep >= TAU - FULL_TURN_EPSILON
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Donut {
    pub size: f64,
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub total: f64,
    pub arcs: Vec<DonutArc>,
    pub center_label: Label,
    pub legend: Vec<LegendEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DonutChart {
    /// Nothing strictly positive to draw.
    NoData,
    Ready(Donut),
}

/// Point on a circle of radius `r` at `angle`.
pub fn polar(r: f64, angle: f64) -> Point {
    Point::new(CENTER + r * angle.sin(), CENTER - r * angle.cos())
}

fn pt(p: Point) -> String {
    format!("{} {}", coord(p.x), coord(p.y))
}

fn ring_path() -> String {
    let (ro, ri) = (coord(OUTER_RADIUS), coord(INNER_RADIUS));
    format!(
        "M {} A {ro} {ro} 0 1 1 {} A {ro} {ro} 0 1 1 {} M {} A {ri} {ri} 0 1 0 {} A {ri} {ri} 0 1 0 {} Z",
        pt(polar(OUTER_RADIUS, 0.0)),
        pt(polar(OUTER_RADIUS, PI)),
        pt(polar(OUTER_RADIUS, 0.0)),
        pt(polar(INNER_RADIUS, 0.0)),
        pt(polar(INNER_RADIUS, PI)),
        pt(polar(INNER_RADIUS, 0.0)),
    )
}

fn segment_path(start: f64, sweep: f64) -> String {
    if sweep >= TAU - FULL_TURN_EPSILON {
        return ring_path();
    }
    let end = start + sweep;
    let large = u8::from(sweep > PI);
    let (ro, ri) = (coord(OUTER_RADIUS), coord(INNER_RADIUS));
    format!(
        "M {} A {ro} {ro} 0 {large} 1 {} L {} A {ri} {ri} 0 {large} 0 {} Z",
        pt(polar(OUTER_RADIUS, start)),
        pt(polar(OUTER_RADIUS, end)),
        pt(polar(INNER_RADIUS, end)),
        pt(polar(INNER_RADIUS, start)),
    )
}

/// Lay out slices clockwise from the top, in input order. Slices that are
/// zero, negative or non-finite are dropped.
pub fn donut_chart(slices: &[DonutSlice], locale: Locale) -> DonutChart {
    let kept: Vec<&DonutSlice> = slices
        .iter()
        .filter(|s| s.value.is_finite() && s.value > 0.0)
        .collect();
    let total: f64 = kept.iter().map(|s| s.value).sum();
    if kept.is_empty() || !total.is_finite() {
        return DonutChart::NoData;
    }

    let mut start = 0.0_f64;
    let arcs: Vec<DonutArc> = kept
        .iter()
        .map(|s| {
            let share = s.value / total;
            let sweep = share * TAU;
            let arc = DonutArc {
                key: s.key.clone(),
                label: s.label.clone(),
                color: s.color.clone(),
                value: s.value,
                share,
                start_angle: start,
                sweep,
                path: segment_path(start, sweep),
            };
            start += sweep;
            arc
        })
        .collect();

    let legend = arcs
        .iter()
        .map(|a| LegendEntry {
            key: a.key.clone(),
            label: a.label.clone(),
            color: a.color.clone(),
        })
        .collect();

    DonutChart::Ready(Donut {
        size: SIZE,
        center: Point::new(CENTER, CENTER),
        outer_radius: OUTER_RADIUS,
        inner_radius: INNER_RADIUS,
        total,
        arcs,
        center_label: Label::value(CENTER, CENTER + 4.0, format_number(total, locale)),
        legend,
    })
}

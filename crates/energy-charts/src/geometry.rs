//! Drawable primitives shared by all chart kinds. Coordinates are SVG user
//! units with the origin at the top-left corner.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Corner radius.
    pub rx: f64,
    pub fill: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub anchor: Anchor,
    pub font_size: u32,
    pub fill: &'static str,
    pub bold: bool,
}

impl Label {
    /// Dark, bold, centred value label.
    pub fn value(x: f64, y: f64, text: String) -> Self {
        Self {
            x,
            y,
            text,
            anchor: Anchor::Middle,
            font_size: 12,
            fill: "#111827",
            bold: true,
        }
    }

    /// Grey, centred axis label.
    pub fn axis(x: f64, y: f64, text: String) -> Self {
        Self {
            x,
            y,
            text,
            anchor: Anchor::Middle,
            font_size: 12,
            fill: "#6b7280",
            bold: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: &'static str,
}

impl Line {
    /// Light grey axis line.
    pub fn axis(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke: "#e5e7eb",
        }
    }
}

/// A legend swatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub key: String,
    pub label: String,
    pub color: String,
}

/// Format a coordinate: integers without decimals, otherwise two decimals
/// with trailing zeros dropped.
pub(crate) fn coord(x: f64) -> String {
    if x.fract() == 0.0 {
        return format!("{x:.0}");
    }
    let s = format!("{x:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

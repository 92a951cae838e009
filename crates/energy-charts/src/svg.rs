//! SVG rendering of chart geometry through plotters' `SVGBackend`.
//!
//! Geometry is rounded to whole pixels when painted. Donut arcs are
//! approximated by polygons with a vertex every two degrees.

use std::f64::consts::PI;

use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, DrawingAreaErrorKind, IntoDrawingArea};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::bar::BarChart;
use crate::donut::{polar, Donut, DonutChart, INNER_RADIUS, OUTER_RADIUS, SIZE};
use crate::geometry::{Anchor, Label, LegendEntry, Line, Point, Rect};
use crate::stacked::{GroupedBars, StackedArea, StackedBars, StackedChart, MIN_WIDTH, SVG_HEIGHT};
use crate::RenderError;

const NO_DATA: &str = "Aucune donnée";
const FALLBACK: RGBColor = RGBColor(0x6b, 0x72, 0x80);
const LEGEND_TEXT: &str = "#374151";
const AREA_OPACITY: f64 = 0.85;
const ARC_STEP: f64 = PI / 90.0;

pub trait ToSvg {
    fn to_svg(&self) -> Result<String, RenderError>;
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Backend(e.to_string())
    }
}

/// `#rrggbb` to a plotters colour; anything else falls back to grey.
fn rgb(hex: &str) -> RGBColor {
    let h = hex.trim().trim_start_matches('#');
    let channel = |i: usize| h.get(i..i + 2).and_then(|s| u8::from_str_radix(s, 16).ok());
    match (h.len(), channel(0), channel(2), channel(4)) {
        (6, Some(r), Some(g), Some(b)) => RGBColor(r, g, b),
        _ => FALLBACK,
    }
}

fn px(v: f64) -> i32 {
    v.round() as i32
}

fn dim(v: f64) -> u32 {
    v.max(1.0).round() as u32
}

fn h_pos(anchor: Anchor) -> HPos {
    match anchor {
        Anchor::Start => HPos::Left,
        Anchor::Middle => HPos::Center,
        Anchor::End => HPos::Right,
    }
}

/// Ring segment outline: outer arc clockwise, then inner arc back.
fn ring_segment(start: f64, sweep: f64) -> Vec<Point> {
    let steps = ((sweep / ARC_STEP).ceil() as usize).max(1);
    let at = |i: usize| start + sweep * i as f64 / steps as f64;
    let outer = (0..=steps).map(|i| polar(OUTER_RADIUS, at(i)));
    let inner = (0..=steps).rev().map(|i| polar(INNER_RADIUS, at(i)));
    outer.chain(inner).collect()
}

struct Canvas<'a> {
    area: DrawingArea<SVGBackend<'a>, Shift>,
}

impl<'a> Canvas<'a> {
    fn new(buf: &'a mut String, width: f64, height: f64) -> Self {
        let backend = SVGBackend::with_string(buf, (dim(width), dim(height)));
        Self {
            area: backend.into_drawing_area(),
        }
    }

    fn line(&self, l: &Line) -> Result<(), RenderError> {
        let stroke = rgb(l.stroke);
        let points = vec![(px(l.x1), px(l.y1)), (px(l.x2), px(l.y2))];
        self.area
            .draw(&PathElement::new(points, stroke.stroke_width(1)))?;
        Ok(())
    }

    fn rect(&self, r: &Rect) -> Result<(), RenderError> {
        let corners = [
            (px(r.x), px(r.y)),
            (px(r.x + r.width), px(r.y + r.height)),
        ];
        self.area
            .draw(&Rectangle::new(corners, rgb(&r.fill).filled()))?;
        Ok(())
    }

    fn polygon(&self, points: &[Point], fill: &str, opacity: f64) -> Result<(), RenderError> {
        let vertices: Vec<(i32, i32)> = points.iter().map(|p| (px(p.x), px(p.y))).collect();
        let style = rgb(fill).mix(opacity).filled();
        self.area.draw(&Polygon::new(vertices, style))?;
        Ok(())
    }

    fn text(&self, l: &Label) -> Result<(), RenderError> {
        let color = rgb(l.fill);
        let weight = if l.bold {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        let font = FontDesc::new(FontFamily::SansSerif, f64::from(l.font_size), weight);
        let style = TextStyle::from(font)
            .color(&color)
            .pos(Pos::new(h_pos(l.anchor), VPos::Bottom));
        self.area
            .draw(&Text::new(l.text.as_str(), (px(l.x), px(l.y)), style))?;
        Ok(())
    }

    /// Swatches along the top-right corner.
    fn legend(&self, entries: &[LegendEntry], width: f64) -> Result<(), RenderError> {
        let mut x = width - 20.0 - entries.len() as f64 * 110.0;
        for e in entries {
            self.rect(&Rect {
                x,
                y: 4.0,
                width: 10.0,
                height: 10.0,
                rx: 2.0,
                fill: e.color.clone(),
            })?;
            self.text(&Label {
                x: x + 14.0,
                y: 13.0,
                text: e.label.clone(),
                anchor: Anchor::Start,
                font_size: 11,
                fill: LEGEND_TEXT,
                bold: false,
            })?;
            x += 110.0;
        }
        Ok(())
    }

    fn finish(self) -> Result<(), RenderError> {
        self.area.present()?;
        Ok(())
    }
}

fn no_data(width: f64, height: f64) -> Result<String, RenderError> {
    let mut buf = String::new();
    let canvas = Canvas::new(&mut buf, width, height);
    canvas.text(&Label::axis(width / 2.0, height / 2.0, NO_DATA.to_string()))?;
    canvas.finish()?;
    Ok(buf)
}

impl ToSvg for BarChart {
    fn to_svg(&self) -> Result<String, RenderError> {
        let mut buf = String::new();
        let canvas = Canvas::new(&mut buf, self.width, self.height);
        for l in &self.axes {
            canvas.line(l)?;
        }
        for bar in &self.bars {
            canvas.rect(&bar.rect)?;
            canvas.text(&bar.value_label)?;
            canvas.text(&bar.axis_label)?;
        }
        canvas.finish()?;
        Ok(buf)
    }
}

impl ToSvg for StackedBars {
    fn to_svg(&self) -> Result<String, RenderError> {
        let mut buf = String::new();
        let canvas = Canvas::new(&mut buf, self.width, self.height);
        for l in &self.axes {
            canvas.line(l)?;
        }
        for column in &self.columns {
            for segment in &column.segments {
                canvas.rect(&segment.rect)?;
            }
            canvas.text(&column.total_label)?;
            canvas.text(&column.axis_label)?;
        }
        canvas.legend(&self.legend, self.width)?;
        canvas.finish()?;
        Ok(buf)
    }
}

impl ToSvg for GroupedBars {
    fn to_svg(&self) -> Result<String, RenderError> {
        let mut buf = String::new();
        let canvas = Canvas::new(&mut buf, self.width, self.height);
        for l in &self.axes {
            canvas.line(l)?;
        }
        for group in &self.groups {
            for bar in &group.bars {
                canvas.rect(&bar.rect)?;
            }
            for label in &group.value_labels {
                canvas.text(label)?;
            }
            canvas.text(&group.axis_label)?;
        }
        canvas.legend(&self.legend, self.width)?;
        canvas.finish()?;
        Ok(buf)
    }
}

impl ToSvg for StackedArea {
    fn to_svg(&self) -> Result<String, RenderError> {
        let mut buf = String::new();
        let canvas = Canvas::new(&mut buf, self.width, self.height);
        for l in &self.axes {
            canvas.line(l)?;
        }
        for band in &self.bands {
            canvas.polygon(&band.points, &band.color, AREA_OPACITY)?;
        }
        for label in self.total_labels.iter().chain(&self.year_labels) {
            canvas.text(label)?;
        }
        canvas.legend(&self.legend, self.width)?;
        canvas.finish()?;
        Ok(buf)
    }
}

impl ToSvg for StackedChart {
    fn to_svg(&self) -> Result<String, RenderError> {
        match self {
            StackedChart::Empty => no_data(MIN_WIDTH, SVG_HEIGHT),
            StackedChart::Grouped(g) => g.to_svg(),
            StackedChart::Area(a) => a.to_svg(),
        }
    }
}

impl ToSvg for Donut {
    fn to_svg(&self) -> Result<String, RenderError> {
        let mut buf = String::new();
        let canvas = Canvas::new(&mut buf, self.size, self.size);
        for arc in &self.arcs {
            if arc.is_full_turn() {
                canvas.polygon(&ring_segment(arc.start_angle, PI), &arc.color, 1.0)?;
                canvas.polygon(&ring_segment(arc.start_angle + PI, PI), &arc.color, 1.0)?;
            } else {
                canvas.polygon(&ring_segment(arc.start_angle, arc.sweep), &arc.color, 1.0)?;
            }
        }
        canvas.text(&self.center_label)?;
        canvas.finish()?;
        Ok(buf)
    }
}

impl ToSvg for DonutChart {
    fn to_svg(&self) -> Result<String, RenderError> {
        match self {
            DonutChart::NoData => no_data(SIZE, SIZE),
            DonutChart::Ready(d) => d.to_svg(),
        }
    }
}

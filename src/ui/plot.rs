//! Time-series plots drawn with the egui painter.
//!
//! Y ticks use fixed major/minor steps per quantity, doubled while they
//! would be too close together. The X axis has a labelled major tick at
//! every midnight and unlabelled minor ticks every few hours.

use super::colors;
use chrono::{Datelike, Duration, NaiveDateTime};
use eframe::egui::{self, Color32, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};

/// Minimum distance between two ticks, in points.
const MIN_MAJOR_SPACING: f32 = 18.0;
const MIN_MINOR_SPACING: f32 = 5.0;

const LEFT_GUTTER: f32 = 36.0;
const BOTTOM_GUTTER: f32 = 14.0;

pub struct PlotSpec {
    pub title: &'static str,
    pub y_major: f64,
    pub y_minor: f64,
    pub x_minor_hours: i64,
    /// Horizontal reference line, e.g. standard pressure.
    pub reference: Option<f64>,
}

pub struct Series<'a> {
    pub points: &'a [(NaiveDateTime, f64)],
    pub color: Color32,
}

/// Doubles `step` until consecutive ticks are at least `min_spacing`
/// points apart.
pub fn coarsen_step(step: f64, points_per_unit: f32, min_spacing: f32) -> f64 {
    if step <= 0.0 || points_per_unit <= 0.0 || !points_per_unit.is_finite() {
        return step;
    }
    let mut step = step;
    while (step as f32) * points_per_unit < min_spacing {
        step *= 2.0;
    }
    step
}

/// Value range padded out to whole `major` steps. A flat series still
/// gets one step of height.
pub fn y_range(min: f64, max: f64, major: f64) -> (f64, f64) {
    let lo = (min / major).floor() * major;
    let mut hi = (max / major).ceil() * major;
    if hi <= lo {
        hi = lo + major;
    }
    (lo, hi)
}

/// Multiples of `step` within `[lo, hi]`.
pub fn value_ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 {
        return Vec::new();
    }
    let first = (lo / step).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Times within `[start, end]` that fall on multiples of `every_hours`
/// counted from midnight.
pub fn time_ticks(start: NaiveDateTime, end: NaiveDateTime, every_hours: i64) -> Vec<NaiveDateTime> {
    let Some(mut tick) = start.date().and_hms_opt(0, 0, 0) else {
        return Vec::new();
    };
    let step = Duration::hours(every_hours.max(1));

    let mut ticks = Vec::new();
    while tick <= end {
        if tick >= start {
            ticks.push(tick);
        }
        tick += step;
    }
    ticks
}

fn is_midnight(t: &NaiveDateTime) -> bool {
    t.time() == chrono::NaiveTime::MIN
}

pub fn render_plot(ui: &mut egui::Ui, size: Vec2, spec: &PlotSpec, series: &[Series<'_>]) {
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let outer = response.rect;

    painter.rect_filled(outer, 2.0, colors::plot::BACKGROUND);
    painter.rect_stroke(
        outer,
        2.0,
        Stroke::new(1.0, colors::plot::BORDER),
        StrokeKind::Inside,
    );
    painter.text(
        outer.left_top() + Vec2::new(LEFT_GUTTER + 4.0, 2.0),
        egui::Align2::LEFT_TOP,
        spec.title,
        egui::FontId::proportional(11.0),
        colors::ui::LABEL,
    );

    let all = || series.iter().flat_map(|s| s.points.iter());
    let (Some(t_min), Some(t_max)) = (all().map(|p| p.0).min(), all().map(|p| p.0).max()) else {
        painter.text(
            outer.center(),
            egui::Align2::CENTER_CENTER,
            "--",
            egui::FontId::proportional(14.0),
            colors::ui::DIM,
        );
        return;
    };

    let mut v_min = all().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let mut v_max = all().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if let Some(reference) = spec.reference {
        v_min = v_min.min(reference);
        v_max = v_max.max(reference);
    }
    let (lo, hi) = y_range(v_min, v_max, spec.y_major);

    let plot = Rect::from_min_max(
        Pos2::new(outer.left() + LEFT_GUTTER, outer.top() + 4.0),
        Pos2::new(outer.right() - 4.0, outer.bottom() - BOTTOM_GUTTER),
    );
    let span_secs = (t_max - t_min).num_seconds().max(1) as f32;
    let x_of = |t: NaiveDateTime| {
        plot.left() + (t - t_min).num_seconds() as f32 / span_secs * plot.width()
    };
    let y_of = |v: f64| plot.bottom() - ((v - lo) / (hi - lo)) as f32 * plot.height();

    // Horizontal grid
    let points_per_unit = plot.height() / (hi - lo) as f32;
    let major = coarsen_step(spec.y_major, points_per_unit, MIN_MAJOR_SPACING);
    let minor = coarsen_step(spec.y_minor, points_per_unit, MIN_MINOR_SPACING);
    for v in value_ticks(lo, hi, minor) {
        let y = y_of(v);
        painter.line_segment(
            [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            Stroke::new(1.0, colors::plot::GRID_MINOR),
        );
    }
    for v in value_ticks(lo, hi, major) {
        let y = y_of(v);
        painter.line_segment(
            [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            Stroke::new(1.0, colors::plot::GRID_MAJOR),
        );
        painter.text(
            Pos2::new(plot.left() - 4.0, y),
            egui::Align2::RIGHT_CENTER,
            format_value(v, major),
            egui::FontId::monospace(9.0),
            colors::plot::TICK_LABEL,
        );
    }

    // Vertical ticks: minor every few hours, major (labelled) at midnight
    for t in time_ticks(t_min, t_max, spec.x_minor_hours) {
        let x = x_of(t);
        let major = is_midnight(&t);
        let (height, color) = if major {
            (8.0, colors::plot::GRID_MAJOR)
        } else {
            (4.0, colors::plot::GRID_MINOR)
        };
        painter.line_segment(
            [Pos2::new(x, plot.bottom()), Pos2::new(x, plot.bottom() + height)],
            Stroke::new(1.0, color),
        );
        if major {
            painter.line_segment(
                [Pos2::new(x, plot.top()), Pos2::new(x, plot.bottom())],
                Stroke::new(1.0, colors::plot::GRID_MINOR),
            );
            painter.text(
                Pos2::new(x, outer.bottom() - 1.0),
                egui::Align2::CENTER_BOTTOM,
                t.day().to_string(),
                egui::FontId::monospace(9.0),
                colors::plot::TICK_LABEL,
            );
        }
    }

    if let Some(reference) = spec.reference {
        let y = y_of(reference);
        painter.line_segment(
            [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            Stroke::new(1.0, colors::plot::REFERENCE),
        );
    }

    for s in series {
        let line: Vec<Pos2> = s.points.iter().map(|&(t, v)| Pos2::new(x_of(t), y_of(v))).collect();
        if line.len() >= 2 {
            painter.add(egui::Shape::line(line, Stroke::new(1.5, s.color)));
        } else if let Some(&p) = line.first() {
            painter.circle_filled(p, 2.0, s.color);
        }
    }
}

fn format_value(v: f64, step: f64) -> String {
    if step.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

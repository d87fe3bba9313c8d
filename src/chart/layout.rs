//! Chart geometry: axis scales, legend placement and the plot area.
//!
//! Text is not measured; label widths use an average glyph width per font
//! size, which is enough to keep the plot clear of legend and tick labels.

use crate::chart::config::{AxisOptions, ChartSpec};
use crate::host::Rect;
use crate::profile_scope;

/// Average glyph width as a fraction of the font size
const GLYPH_WIDTH_RATIO: f32 = 0.56;

/// Gap between a legend swatch and its label
const SWATCH_GAP: f32 = 6.0;

/// Gap between tick labels and the plot edge
const TICK_GAP: f32 = 6.0;

/// Tick values this large are labelled in exponent form
const EXPONENT_LABEL_THRESHOLD: f64 = 1e9;

const MAX_TICK_DECIMALS: usize = 10;

pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO
}

/// Round `range` to a 1/2/5 multiple of a power of ten
pub fn nice_num(range: f64, round: bool) -> f64 {
    if range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    let exponent = range.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = range / magnitude;
    let nice = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Next larger 1/2/5 step
fn next_step(step: f64) -> f64 {
    let exponent = step.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = (step / magnitude * 1e9).round() / 1e9;
    if fraction < 2.0 {
        2.0 * magnitude
    } else if fraction < 5.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

/// A linear axis: bounds plus tick positions
#[derive(Clone, Debug, PartialEq)]
pub struct AxisScale {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub ticks: Vec<f64>,
}

impl AxisScale {
    /// Scale with fixed bounds; ticks at a nice step inside them.
    pub fn fixed(min: f64, max: f64, max_ticks: usize) -> Self {
        let max_ticks = max_ticks.max(2);
        if !(max - min).is_finite() {
            return Self::evenly_split(min, max, max_ticks);
        }
        let mut step = nice_num(nice_num(max - min, false) / (max_ticks - 1) as f64, true);
        while step.is_finite() && tick_count(min, max, step) > max_ticks {
            step = next_step(step);
        }
        let first = snap((min / step).ceil() * step);
        if !step.is_finite() || !first.is_finite() {
            return Self::evenly_split(min, max, max_ticks);
        }
        Self {
            min,
            max,
            step,
            ticks: ticks_between(first, max, step, max_ticks),
        }
    }

    /// Unpadded `[lo, hi]` with `max_ticks` evenly spaced ticks.
    ///
    /// Used when the span or a rounded bound does not fit in an `f64`.
    fn evenly_split(lo: f64, hi: f64, max_ticks: usize) -> Self {
        if hi <= lo {
            return Self {
                min: lo,
                max: hi,
                step: 0.0,
                ticks: vec![lo],
            };
        }
        let intervals = (max_ticks.max(2) - 1) as f64;
        let ticks = (0..=max_ticks.max(2) - 1)
            .map(|i| {
                let t = i as f64 / intervals;
                lo * (1.0 - t) + hi * t
            })
            .collect();
        Self {
            min: lo,
            max: hi,
            step: hi / intervals - lo / intervals,
            ticks,
        }
    }

    /// Scale covering `values`, with bounds widened to whole steps.
    ///
    /// No values gives `[0, 1]`; a single distinct value is padded by one.
    pub fn auto(values: impl IntoIterator<Item = f64>, max_ticks: usize) -> Self {
        let (mut lo, mut hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lo > hi {
            return Self::fixed(0.0, 1.0, max_ticks);
        }
        if lo == hi {
            lo -= 1.0;
            hi += 1.0;
        }

        let max_ticks = max_ticks.max(2);
        if !(hi - lo).is_finite() || hi == lo {
            return Self::evenly_split(lo, hi, max_ticks);
        }
        let mut step = nice_num(nice_num(hi - lo, false) / (max_ticks - 1) as f64, true);
        loop {
            let min = snap((lo / step).floor() * step);
            let max = snap((hi / step).ceil() * step);
            if !step.is_finite() || !(max - min).is_finite() {
                return Self::evenly_split(lo, hi, max_ticks);
            }
            if tick_count(min, max, step) <= max_ticks {
                return Self {
                    min,
                    max,
                    step,
                    ticks: ticks_between(min, max, step, max_ticks),
                };
            }
            step = next_step(step);
        }
    }

    /// Position of `value` in `[0, 1]` along the axis
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return 0.5;
        }
        let span = self.max - self.min;
        if span.is_finite() {
            (value - self.min) / span
        } else {
            // halves keep near-f64::MAX bounds finite
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        }
    }

    /// Tick label with as many decimals as the step needs
    pub fn format_tick(&self, value: f64) -> String {
        if value.abs() >= EXPONENT_LABEL_THRESHOLD {
            return format!("{:.2e}", value);
        }
        let decimals = if self.step >= 1.0 || self.step <= 0.0 || !self.step.is_finite() {
            0
        } else {
            ((-self.step.log10().floor()) as usize).min(MAX_TICK_DECIMALS)
        };
        let text = format!("{:.*}", decimals, value);
        if text.starts_with('-') && text.trim_start_matches(['-', '0', '.']).is_empty() {
            text[1..].to_string()
        } else {
            text
        }
    }
}

/// Drop float noise such as 0.6000000000000001
fn snap(value: f64) -> f64 {
    let scaled = value * 1e10;
    if scaled.is_finite() {
        scaled.round() / 1e10
    } else {
        value
    }
}

/// Ticks from `min` to `max`; saturates instead of overflowing.
fn tick_count(min: f64, max: f64, step: f64) -> usize {
    let intervals = ((max - min) / step) + 1e-9;
    if !intervals.is_finite() {
        return usize::MAX;
    }
    (intervals.floor().max(0.0) as usize).saturating_add(1)
}

fn ticks_between(first: f64, max: f64, step: f64, limit: usize) -> Vec<f64> {
    let count = tick_count(first, max, step).min(limit);
    (0..count)
        .map(|i| snap(first + i as f64 * step))
        .collect()
}

fn axis_scale(axis: &AxisOptions, values: impl IntoIterator<Item = f64>) -> AxisScale {
    match (axis.min, axis.max) {
        (Some(min), Some(max)) if max > min => AxisScale::fixed(min, max, axis.ticks.max_ticks_limit),
        _ => AxisScale::auto(values, axis.ticks.max_ticks_limit),
    }
}

/// Placement of one legend entry
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    pub dataset: usize,
    /// Center of the point-style swatch
    pub swatch: (f32, f32),
    /// Baseline start of the label
    pub text: (f32, f32),
}

/// Full chart geometry for one canvas size
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    pub width: f32,
    pub height: f32,
    pub plot: Rect,
    pub legend: Vec<LegendItem>,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
}

impl ChartLayout {
    pub fn compute(spec: &ChartSpec, width: f32, height: f32) -> Self {
        profile_scope!("compute_layout");
        let padding = spec.options.layout.padding;
        let scales = &spec.options.scales;
        let datasets = spec.datasets();

        let x_scale = axis_scale(&scales.x, datasets.iter().flat_map(|d| d.data.iter().map(|p| p.x)));
        let y_scale = axis_scale(&scales.y, datasets.iter().flat_map(|d| d.data.iter().map(|p| p.y)));

        let (legend, legend_height) = if spec.options.plugins.legend.display {
            layout_legend(spec, padding.left, padding.top, width - padding.left - padding.right)
        } else {
            (Vec::new(), 0.0)
        };

        let title_band = |axis: &AxisOptions| {
            if axis.title.display {
                axis.title.font.size + axis.title.padding.top + axis.title.padding.bottom
            } else {
                0.0
            }
        };
        let y_tick_width = y_scale
            .ticks
            .iter()
            .map(|t| text_width(&y_scale.format_tick(*t), scales.y.ticks.font.size))
            .fold(0.0, f32::max);

        let left = padding.left + title_band(&scales.y) + y_tick_width + TICK_GAP;
        let top = padding.top + legend_height;
        let right = width - padding.right - TICK_GAP;
        let bottom =
            height - padding.bottom - title_band(&scales.x) - scales.x.ticks.font.size - TICK_GAP;

        Self {
            width,
            height,
            plot: Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0)),
            legend,
            x_scale,
            y_scale,
        }
    }

    /// Pixel position of a data coordinate
    pub fn project(&self, x: f64, y: f64) -> (f32, f32) {
        let px = self.plot.x + (self.x_scale.normalize(x) as f32) * self.plot.width;
        let py = self.plot.bottom() - (self.y_scale.normalize(y) as f32) * self.plot.height;
        (px, py)
    }
}

/// Centered rows of legend entries; returns items and the band height.
fn layout_legend(spec: &ChartSpec, left: f32, top: f32, available: f32) -> (Vec<LegendItem>, f32) {
    let labels = &spec.options.plugins.legend.labels;
    let font = labels.font.size;
    let row_height = labels.box_height.max(font) + labels.padding;

    let widths: Vec<f32> = spec
        .datasets()
        .iter()
        .map(|d| labels.box_width + SWATCH_GAP + text_width(&d.label, font) + labels.padding)
        .collect();
    if widths.is_empty() {
        return (Vec::new(), 0.0);
    }

    let mut rows: Vec<Vec<usize>> = vec![Vec::new()];
    let mut row_width = 0.0;
    for (i, w) in widths.iter().enumerate() {
        if row_width + w > available && !rows.last().is_some_and(|r| r.is_empty()) {
            rows.push(Vec::new());
            row_width = 0.0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(i);
        }
        row_width += w;
    }

    let mut items = Vec::with_capacity(widths.len());
    for (r, row) in rows.iter().enumerate() {
        let total: f32 = row.iter().map(|&i| widths[i]).sum();
        let mut x = left + ((available - total) / 2.0).max(0.0);
        let center_y = top + labels.padding / 2.0 + r as f32 * row_height + row_height / 2.0;
        for &i in row {
            items.push(LegendItem {
                dataset: i,
                swatch: (x + labels.box_width / 2.0, center_y),
                text: (x + labels.box_width + SWATCH_GAP, center_y + font * 0.35),
            });
            x += widths[i];
        }
    }

    let band = rows.len() as f32 * row_height + labels.padding;
    (items, band)
}

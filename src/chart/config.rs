//! Chart configuration
//!
//! [`ChartSpec`] mirrors the Chart.js scatter configuration, so serializing it
//! with serde yields a config object a Chart.js page can consume directly.
//! Tooltip callbacks become [`tooltip_lines`] and [`tooltip_title`].

use crate::constants::*;
use crate::types::{Point, Rgba, Series};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartData {
    pub datasets: Vec<DatasetSpec>,
}

/// One plotted series
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSpec {
    pub label: String,
    pub data: Vec<Point>,
    pub background_color: Rgba,
    pub border_color: Rgba,
    pub point_radius: f32,
    pub point_hover_radius: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub layout: LayoutOptions,
    pub plugins: Plugins,
    pub scales: Scales,
    pub interaction: Interaction,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutOptions {
    pub padding: Padding,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: LegendOptions,
    pub tooltip: TooltipOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LegendOptions {
    pub display: bool,
    pub position: LegendPosition,
    pub labels: LegendLabels,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendLabels {
    pub use_point_style: bool,
    pub padding: f32,
    pub font: Font,
    pub box_width: f32,
    pub box_height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Font {
    pub size: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<&'static str>,
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self { size, weight: None }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            size,
            weight: Some("bold"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOptions {
    pub background_color: String,
    pub padding: f32,
    pub title_font: Font,
    pub body_font: Font,
    pub display_colors: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scales {
    pub x: AxisOptions,
    pub y: AxisOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisOptions {
    pub title: AxisTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub ticks: TickOptions,
    pub grid: GridOptions,
}

impl AxisOptions {
    fn titled(text: &str) -> Self {
        Self {
            title: AxisTitle {
                display: true,
                text: text.to_string(),
                font: Font::bold(AXIS_TITLE_FONT_SIZE),
                padding: VerticalPadding {
                    top: 5.0,
                    bottom: 5.0,
                },
            },
            min: None,
            max: None,
            ticks: TickOptions {
                font: Font::regular(TICK_FONT_SIZE),
                max_ticks_limit: MAX_TICKS,
            },
            grid: GridOptions {
                color: GRID_COLOR.to_string(),
            },
        }
    }

    fn clamped(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
    pub font: Font,
    pub padding: VerticalPadding,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VerticalPadding {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOptions {
    pub font: Font,
    pub max_ticks_limit: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridOptions {
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Interaction {
    pub intersect: bool,
    pub mode: &'static str,
}

impl DatasetSpec {
    pub fn from_series(series: &Series) -> Self {
        Self {
            label: series.label.clone(),
            data: series.points.clone(),
            background_color: series.fill,
            border_color: series.border,
            point_radius: POINT_RADIUS,
            point_hover_radius: POINT_HOVER_RADIUS,
        }
    }
}

impl ChartSpec {
    /// Scatter configuration with one dataset per series.
    ///
    /// X is clamped to `[0, 1]`; Y is left to auto-scale.
    pub fn scatter(series: &[Series], x_title: &str, y_title: &str) -> Self {
        Self {
            kind: ChartKind::Scatter,
            data: ChartData {
                datasets: series.iter().map(DatasetSpec::from_series).collect(),
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                layout: LayoutOptions {
                    padding: Padding::uniform(LAYOUT_PADDING),
                },
                plugins: Plugins {
                    legend: LegendOptions {
                        display: true,
                        position: LegendPosition::Top,
                        labels: LegendLabels {
                            use_point_style: true,
                            padding: LEGEND_PADDING,
                            font: Font::regular(LEGEND_FONT_SIZE),
                            box_width: LEGEND_BOX_SIZE,
                            box_height: LEGEND_BOX_SIZE,
                        },
                    },
                    tooltip: TooltipOptions {
                        background_color: TOOLTIP_BACKGROUND.to_string(),
                        padding: 10.0,
                        title_font: Font::bold(14.0),
                        body_font: Font::regular(12.0),
                        display_colors: false,
                    },
                },
                scales: Scales {
                    x: AxisOptions::titled(x_title).clamped(0.0, 1.0),
                    y: AxisOptions::titled(y_title),
                },
                interaction: Interaction {
                    intersect: false,
                    mode: "point",
                },
            },
        }
    }

    pub fn datasets(&self) -> &[DatasetSpec] {
        &self.data.datasets
    }

    pub fn point_count(&self) -> usize {
        self.data.datasets.iter().map(|d| d.data.len()).sum()
    }

    /// Chart.js JSON configuration
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Tooltip body for a hovered point
pub fn tooltip_lines(point: &Point) -> Vec<String> {
    vec![
        format!("English: {}", point.english_word),
        format!("Spanish: {}", point.spanish_word),
        format!("Similarity: {:.2}", point.x),
        format!("Complexity: {:.2}", point.y),
        format!(
            "Domain: {}",
            point
                .cultural_domain
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(MISSING_DOMAIN_LABEL)
        ),
    ]
}

/// Tooltip title, intentionally blank
pub fn tooltip_title(_point: &Point) -> String {
    String::new()
}

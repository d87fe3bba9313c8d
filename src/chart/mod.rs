//! Chart rendering
//!
//! - `config`: the Chart.js-compatible scatter configuration and tooltip text
//! - `layout`: axis scales, legend rows and the plot area for a canvas size
//! - `svg`: the drawing painted onto the canvas
//! - `renderer`: owner of the live [`ChartInstance`]

pub mod config;
pub mod layout;
pub mod renderer;
mod svg;

pub use config::{tooltip_lines, tooltip_title, ChartSpec, DatasetSpec};
pub use layout::{AxisScale, ChartLayout};
pub use renderer::{ChartInstance, ChartRenderer, Tooltip};

//! lexiscatter: bilingual lexical dataset explorer.
//!
//! Loads a delimited-text dataset of English/Spanish word pairs, drops rows
//! without usable scores, groups the rest by relationship type and renders a
//! scatter chart of similarity against complexity into a host page. Resize
//! and orientation signals are debounced into re-renders; failures replace
//! the chart container with a diagnostic block.
//!
//! [`pipeline::ExplorerPipeline`] ties the pieces together.

pub mod chart;
pub mod constants;
pub mod data;
pub mod error;
pub mod error_presenter;
pub mod host;
pub mod mobile_check;
pub mod perf;
pub mod pipeline;
pub mod resize;
pub mod settings;
pub mod spatial_index;
pub mod timers;
pub mod types;

pub use error::{ExplorerError, ExplorerResult};
pub use host::{HostPage, StaticPage};
pub use pipeline::{ExplorerPipeline, PipelineState};
pub use resize::ViewportSignal;
pub use settings::ExplorerSettings;

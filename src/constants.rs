//! Application-wide constants.
//!
//! Centralizes magic numbers, element identifiers and the column contract with
//! the data producer. Most of these are the defaults behind
//! [`ExplorerSettings`](crate::settings::ExplorerSettings).

// ============================================================================
// Resource Contract
// ============================================================================

/// Relative path of the dataset resource
pub const RESOURCE_PATH: &str = "language_analysis_masterframe25OCT.csv";

/// Header name of the English word column
pub const COLUMN_ENGLISH_WORD: &str = "english_word";

/// Header name of the Spanish word column
pub const COLUMN_SPANISH_WORD: &str = "spanish_word";

/// Header name of the categorical relationship column
pub const COLUMN_RELATIONSHIP_TYPE: &str = "relationship_type";

/// Header name of the cultural domain column
pub const COLUMN_CULTURAL_DOMAIN: &str = "cultural_domain";

/// Header name of the similarity score column (plotted on X)
pub const COLUMN_SIMILARITY: &str = "levenshtein_similarity";

/// Header name of the complexity score column (plotted on Y)
pub const COLUMN_COMPLEXITY: &str = "complexity_overall_complexity";

// ============================================================================
// Host Page Contract
// ============================================================================

/// Element id of the chart container
pub const CONTAINER_ID: &str = "chart-container";

/// Element id of the chart canvas
pub const CANVAS_ID: &str = "datasetChart";

/// Padding subtracted from the container box when sizing the canvas
pub const CONTAINER_PADDING: f32 = 60.0;

// ============================================================================
// Timing
// ============================================================================

/// Interval between container readiness checks in milliseconds
pub const CONTAINER_POLL_INTERVAL_MS: u64 = 100;

/// Readiness checks before giving up on the container (5 seconds at 100ms)
pub const MAX_CONTAINER_POLLS: u32 = 50;

/// Delay between container readiness and chart construction in milliseconds
pub const SETTLE_DELAY_MS: u64 = 50;

/// Resize debounce window in milliseconds
pub const RESIZE_DEBOUNCE_MS: u64 = 250;

/// Deferral applied to orientation changes before they count as a resize
pub const ORIENTATION_DELAY_MS: u64 = 500;

// ============================================================================
// Chart Styling
// ============================================================================

/// Radius of a plotted point in pixels
pub const POINT_RADIUS: f32 = 3.0;

/// Radius of a hovered point in pixels
pub const POINT_HOVER_RADIUS: f32 = 5.0;

/// X axis title
pub const X_AXIS_TITLE: &str = "Levenshtein Similarity";

/// Y axis title
pub const Y_AXIS_TITLE: &str = "Overall Complexity";

/// Upper bound on ticks per axis
pub const MAX_TICKS: usize = 8;

/// Legend swatch box size in pixels
pub const LEGEND_BOX_SIZE: f32 = 12.0;

/// Gap between legend entries in pixels
pub const LEGEND_PADDING: f32 = 12.0;

/// Legend label font size
pub const LEGEND_FONT_SIZE: f32 = 11.0;

/// Axis title font size
pub const AXIS_TITLE_FONT_SIZE: f32 = 13.0;

/// Tick label font size
pub const TICK_FONT_SIZE: f32 = 10.0;

/// Inner padding around the plot in pixels
pub const LAYOUT_PADDING: f32 = 10.0;

/// Grid line color
pub const GRID_COLOR: &str = "rgba(0, 0, 0, 0.05)";

/// Tooltip background color
pub const TOOLTIP_BACKGROUND: &str = "rgba(0, 0, 0, 0.8)";

/// Domain shown in tooltips when a row has none
pub const MISSING_DOMAIN_LABEL: &str = "N/A";

/// Grouping key used for rows without a relationship type
pub const UNKNOWN_CATEGORY: &str = "unknown";

// ============================================================================
// Data Loading
// ============================================================================

/// Maximum number of CSV rows to load
pub const MAX_CSV_ROWS: usize = 100_000;

/// Maximum CSV resource size in MB
pub const MAX_CSV_SIZE_MB: usize = 100;

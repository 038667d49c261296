//! kp-render: grid layout, render directives and the parallel panel renderer.
//!
//! Provides:
//! - Grid sizing from a metric count and the terminal size
//! - Settings directives (style, axis clamps, log scale, legend placement)
//! - Panel planning from a dataset, per-panel rasterization, grid compositing

pub mod directives;
pub mod grid;
pub mod layout;
pub mod panel;
pub mod plan;
pub mod theme;

// Re-exports for ergonomics
pub use directives::{AxisBounds, LegendLocation, RenderDirective, Style, parse_directives};
pub use grid::{GridOutput, GridRequest, RgbBitmap, render_grid};
pub use layout::{GridLayout, panel_size};
pub use plan::{Band, PanelSpec, SeriesSpec, panel_metrics, plan_panels};
pub use theme::Theme;

use std::path::PathBuf;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("no metrics")]
    EmptyMetricSet,

    #[error("Failed to draw panel '{metric}': {message}")]
    Draw { metric: String, message: String },

    #[error("Failed to write image {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

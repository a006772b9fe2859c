//! Diagnostic chart rendering.
//!
//! Charts draw through the pure-Rust `plotters` bitmap backend with a
//! bundled font, so output is identical across machines and never depends
//! on system font configuration.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::style::{FontStyle, RGBColor, register_font};
use thiserror::Error;

pub mod importance;
pub mod residuals;

/// Chart width in pixels (6.4 in at 120 DPI).
pub(crate) const CHART_WIDTH: u32 = 768;
/// Chart height in pixels (4.8 in at 120 DPI).
pub(crate) const CHART_HEIGHT: u32 = 576;
pub(crate) const TITLE_FONT_PX: u32 = 22;
pub(crate) const AXIS_FONT_PX: u32 = 18;
pub(crate) const TICK_FONT_PX: u32 = 14;
/// Fill color for bars and markers.
pub(crate) const SERIES_COLOR: RGBColor = RGBColor(76, 114, 176);

const FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Errors that may occur while rendering a chart.
#[derive(Debug, Error)]
pub enum PlotError {
    /// The bundled font bytes were rejected by the backend.
    #[error("Failed to register the bundled chart font")]
    Font,
    /// The series to draw had no points or rows.
    #[error("Nothing to plot for {path}")]
    EmptySeries { path: PathBuf },
    /// The backend failed while drawing or writing the chart file.
    #[error("Failed to render chart {path}: {message}")]
    Draw { path: PathBuf, message: String },
}

/// Register the bundled font with plotters exactly once.
pub(crate) fn ensure_font() -> Result<(), PlotError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = REGISTERED
        .get_or_init(|| register_font("sans-serif", FontStyle::Normal, FONT_BYTES).is_ok());
    if *ok { Ok(()) } else { Err(PlotError::Font) }
}

pub(crate) fn draw_error(path: &Path, err: impl std::fmt::Display) -> PlotError {
    PlotError::Draw {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

//! Scatter plot of predicted vs. true label values on the held-out rows.

use std::path::Path;

use plotters::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{
    AXIS_FONT_PX, CHART_HEIGHT, CHART_WIDTH, PlotError, SERIES_COLOR, TICK_FONT_PX,
    TITLE_FONT_PX, draw_error, ensure_font,
};

/// Standard deviation of the visual de-overlapping jitter.
pub const JITTER_STD_DEV: f32 = 0.25;
/// Both axes are pinned to this range.
const AXIS_MIN: f32 = 2.5;
const AXIS_MAX: f32 = 8.5;

/// One jittered `(true, predicted)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualPoint {
    /// Jittered true label value.
    pub true_value: f32,
    /// Jittered predicted label value.
    pub predicted_value: f32,
}

/// Build the residual table with Normal(0, 0.25) jitter on both coordinates.
///
/// The random source is caller-supplied so output stays reproducible when
/// the caller seeds it; jitter is presentation only and never feeds back
/// into the model. Predictions draw their jitter vector first, then the
/// true values draw theirs.
pub fn jittered_residuals(
    truth: &[f32],
    predicted: &[f32],
    rng: &mut impl Rng,
) -> Vec<ResidualPoint> {
    let jitter = Normal::new(0.0f32, JITTER_STD_DEV).expect("standard deviation is positive");
    let predicted_jittered: Vec<f32> = predicted
        .iter()
        .map(|&value| value + jitter.sample(rng))
        .collect();
    let true_jittered: Vec<f32> = truth
        .iter()
        .map(|&value| value + jitter.sample(rng))
        .collect();
    true_jittered
        .into_iter()
        .zip(predicted_jittered)
        .map(|(true_value, predicted_value)| ResidualPoint {
            true_value,
            predicted_value,
        })
        .collect()
}

/// Render the residual table as a scatter chart with a 1:1 diagonal.
///
/// Axis bounds are fixed to 2.5-8.5 on both axes; jittered points that
/// land outside the window are not drawn, matching how a clipped figure
/// displays them.
pub fn render_residual_chart(path: &Path, points: &[ResidualPoint]) -> Result<(), PlotError> {
    ensure_font()?;
    if points.is_empty() {
        return Err(PlotError::EmptySeries {
            path: path.to_path_buf(),
        });
    }

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|err| draw_error(path, err))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Residuals", ("sans-serif", TITLE_FONT_PX))
        .margin(12)
        .x_label_area_size(56)
        .y_label_area_size(72)
        .build_cartesian_2d(AXIS_MIN..AXIS_MAX, AXIS_MIN..AXIS_MAX)
        .map_err(|err| draw_error(path, err))?;

    chart
        .configure_mesh()
        .x_desc("True wine quality")
        .y_desc("Predicted wine quality")
        .axis_desc_style(("sans-serif", AXIS_FONT_PX))
        .label_style(("sans-serif", TICK_FONT_PX))
        .draw()
        .map_err(|err| draw_error(path, err))?;

    // Reference diagonal: perfect predictions land on this line.
    chart
        .draw_series(LineSeries::new(
            [(AXIS_MIN, AXIS_MIN), (AXIS_MAX, AXIS_MAX)],
            BLACK.stroke_width(1),
        ))
        .map_err(|err| draw_error(path, err))?;

    chart
        .draw_series(
            points
                .iter()
                .filter(|point| in_window(point))
                .map(|point| {
                    Circle::new(
                        (point.true_value, point.predicted_value),
                        4,
                        SERIES_COLOR.filled(),
                    )
                }),
        )
        .map_err(|err| draw_error(path, err))?;

    root.present().map_err(|err| draw_error(path, err))
}

fn in_window(point: &ResidualPoint) -> bool {
    (AXIS_MIN..=AXIS_MAX).contains(&point.true_value)
        && (AXIS_MIN..=AXIS_MAX).contains(&point.predicted_value)
}

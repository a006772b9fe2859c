//! Horizontal bar chart of per-feature importance weights.

use std::path::Path;

use plotters::prelude::*;

use super::{
    AXIS_FONT_PX, CHART_HEIGHT, CHART_WIDTH, PlotError, SERIES_COLOR, TICK_FONT_PX,
    TITLE_FONT_PX, draw_error, ensure_font,
};

/// One row of the importance table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    /// Feature column name.
    pub feature: String,
    /// Normalized importance weight.
    pub importance: f32,
}

/// Pair feature names with weights and sort descending by weight.
///
/// The sort is stable, so equal weights keep their input column order.
pub fn ranked_importances(names: &[String], weights: &[f32]) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = names
        .iter()
        .zip(weights.iter())
        .map(|(name, &weight)| FeatureImportance {
            feature: name.clone(),
            importance: weight,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Render the ranked importance table as a horizontal bar chart.
///
/// The highest-weight feature sits at the top. Axis labels and the title
/// are fixed; the x range grows with the largest weight.
pub fn render_importance_chart(
    path: &Path,
    ranked: &[FeatureImportance],
) -> Result<(), PlotError> {
    ensure_font()?;
    if ranked.is_empty() {
        return Err(PlotError::EmptySeries {
            path: path.to_path_buf(),
        });
    }

    let n = ranked.len();
    let x_max = ranked
        .iter()
        .map(|row| row.importance)
        .fold(0.0f32, f32::max)
        .max(1e-3)
        * 1.05;

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|err| draw_error(path, err))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Random forest feature importance",
            ("sans-serif", TITLE_FONT_PX),
        )
        .margin(12)
        .x_label_area_size(56)
        .y_label_area_size(170)
        .build_cartesian_2d(0f32..x_max, -0.5f32..(n as f32 - 0.5))
        .map_err(|err| draw_error(path, err))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Importance")
        .y_desc("Feature")
        .axis_desc_style(("sans-serif", AXIS_FONT_PX))
        .label_style(("sans-serif", TICK_FONT_PX))
        .y_labels(n)
        .y_label_formatter(&|value| y_tick_label(ranked, *value))
        .draw()
        .map_err(|err| draw_error(path, err))?;

    chart
        .draw_series(ranked.iter().enumerate().map(|(rank, row)| {
            // Rank 0 draws at the top of the axis.
            let y = (n - 1 - rank) as f32;
            Rectangle::new(
                [(0.0, y - 0.4), (row.importance, y + 0.4)],
                SERIES_COLOR.filled(),
            )
        }))
        .map_err(|err| draw_error(path, err))?;

    root.present().map_err(|err| draw_error(path, err))
}

/// Label integer ticks with the feature drawn at that height.
fn y_tick_label(ranked: &[FeatureImportance], value: f32) -> String {
    let nearest = value.round();
    if (value - nearest).abs() > 0.01 || nearest < 0.0 {
        return String::new();
    }
    let index = nearest as usize;
    if index >= ranked.len() {
        return String::new();
    }
    ranked[ranked.len() - 1 - index].feature.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn ranking_sorts_descending() {
        let ranked = ranked_importances(
            &names(&["acidity", "sugar", "sulphates"]),
            &[0.2, 0.5, 0.3],
        );
        let order: Vec<&str> = ranked.iter().map(|row| row.feature.as_str()).collect();
        assert_eq!(order, vec!["sugar", "sulphates", "acidity"]);
    }

    #[test]
    fn equal_weights_keep_column_order() {
        let ranked = ranked_importances(&names(&["a", "b", "c"]), &[0.25, 0.5, 0.25]);
        let order: Vec<&str> = ranked.iter().map(|row| row.feature.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn tick_labels_put_rank_zero_on_top() {
        let ranked = ranked_importances(&names(&["low", "high"]), &[0.1, 0.9]);
        assert_eq!(y_tick_label(&ranked, 1.0), "high");
        assert_eq!(y_tick_label(&ranked, 0.0), "low");
        assert_eq!(y_tick_label(&ranked, 0.5), "");
        assert_eq!(y_tick_label(&ranked, 7.0), "");
    }

    #[test]
    fn renders_a_nonempty_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("importance.png");
        let ranked = ranked_importances(&names(&["acidity", "sugar"]), &[0.7, 0.3]);
        render_importance_chart(&path, &ranked).unwrap();
        let bytes = std::fs::metadata(&path).unwrap().len();
        assert!(bytes > 0, "chart file should not be empty");
    }

    #[test]
    fn empty_table_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("importance.png");
        assert!(matches!(
            render_importance_chart(&path, &[]),
            Err(PlotError::EmptySeries { .. })
        ));
    }
}

//! Report assembly: decomposition, F-tests, verdicts, and chart data.
//!
//! [`analyze`] is the orchestration point: it runs the sum-of-squares
//! decomposition, turns each tested source into an F-ratio and p-value,
//! annotates significance at the 0.05 level, and collects the group
//! means for the mean-comparison chart. It is stateless — one call per
//! request, any failure aborts the whole computation.

use crate::decompose::{decompose, Partition};
use crate::error::Result;
use crate::grid::{Axis, Design, GridDataset};
use crate::stats::f_p_value;

/// Significance level for the hypothesis-test verdicts.
pub const ALPHA: f64 = 0.05;

/// One row of the ANOVA table.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// Variance source label as it appears in the report.
    pub label: &'static str,
    /// Sum of squares.
    pub ss: f64,
    /// Degrees of freedom.
    pub df: usize,
    /// Mean square, `ss / df`.
    pub ms: f64,
    /// F-ratio against the error mean square. `None` for the Error and
    /// Total rows, and for degenerate zero-variance data.
    pub f_ratio: Option<f64>,
    /// Upper-tail p-value; present exactly when `f_ratio` is.
    pub p_value: Option<f64>,
    /// `true` when `p_value < 0.05`; present exactly when `p_value` is.
    pub significant: Option<bool>,
}

/// One bar of the mean-comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Group label: `"G1"`, `"G2"`, ... in level order.
    pub label: String,
    /// Mean of the group's observations.
    pub mean: f64,
    /// Maximum of all group means, duplicated into every point so a
    /// renderer can normalize bar heights without a second pass.
    pub max: f64,
}

/// Finished ANOVA report: ordered source rows plus chart data.
#[derive(Debug, Clone)]
pub struct AnovaReport {
    /// Table rows in fixed order: tested sources, then Error, then Total.
    pub rows: Vec<SourceRow>,
    /// One point per group (one-way) or per Factor-A level (two-way).
    pub chart: Vec<ChartPoint>,
}

/// Compute the full ANOVA report for a validated grid.
///
/// # Errors
///
/// Propagates any [`crate::Error`] from the decomposition or the
/// F-distribution evaluation; there are no partial results.
///
/// # Examples
///
/// ```
/// use gridanova::{analyze, Axis, Design, GridBuilder};
///
/// let grid = GridBuilder::new()
///     .dimensions(2, 3)
///     .design(Design::OneWay(Axis::Cols))
///     .entry(0, 0, "2").entry(1, 0, "3")
///     .entry(0, 1, "5").entry(1, 1, "6")
///     .entry(0, 2, "8").entry(1, 2, "9")
///     .build()?;
///
/// let report = analyze(&grid)?;
/// assert_eq!(report.rows.len(), 3); // Between, Within, Total
/// assert!(report.rows[0].significant.unwrap());
/// # Ok::<(), gridanova::Error>(())
/// ```
pub fn analyze(grid: &GridDataset) -> Result<AnovaReport> {
    let parts = decompose(grid)?;

    let error_ms = parts.error.ss / parts.error.df as f64;
    let mut rows = Vec::with_capacity(parts.tested.len() + 2);
    for &(label, partition) in &parts.tested {
        rows.push(tested_row(label, partition, error_ms, parts.error.df)?);
    }
    rows.push(SourceRow {
        label: parts.error_label,
        ss: parts.error.ss,
        df: parts.error.df,
        ms: error_ms,
        f_ratio: None,
        p_value: None,
        significant: None,
    });
    rows.push(SourceRow {
        label: "TOTAL",
        ss: parts.total.ss,
        df: parts.total.df,
        ms: parts.total.ss / parts.total.df as f64,
        f_ratio: None,
        p_value: None,
        significant: None,
    });

    Ok(AnovaReport {
        rows,
        chart: chart_points(grid),
    })
}

/// Build one tested source row. The decomposer guarantees `df >= 1` for
/// every tested partition and for error.
fn tested_row(
    label: &'static str,
    partition: Partition,
    error_ms: f64,
    error_df: usize,
) -> Result<SourceRow> {
    let ms = partition.ss / partition.df as f64;

    // All observations identical: 0/0 has no defensible F-ratio, so the
    // row carries no test rather than a NaN.
    let (f_ratio, p_value) = if ms == 0.0 && error_ms == 0.0 {
        (None, None)
    } else {
        let f = ms / error_ms;
        let p = f_p_value(f, partition.df, error_df)?;
        (Some(f), Some(p))
    };

    Ok(SourceRow {
        label,
        ss: partition.ss,
        df: partition.df,
        ms,
        f_ratio,
        p_value,
        significant: p_value.map(|p| p < ALPHA),
    })
}

/// Per-group means for the chart: one point per group along the one-way
/// axis, or per Factor-A level (row) for two-way.
fn chart_points(grid: &GridDataset) -> Vec<ChartPoint> {
    let axis = match grid.design() {
        Design::OneWay(axis) => axis,
        Design::TwoWay => Axis::Rows,
    };

    let means: Vec<f64> = (0..grid.group_count(axis))
        .map(|g| grid.group_mean(axis, g))
        .collect();
    let max = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    means
        .into_iter()
        .enumerate()
        .map(|(g, mean)| ChartPoint {
            label: format!("G{}", g + 1),
            mean,
            max,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuilder;

    fn one_way_grid() -> GridDataset {
        GridBuilder::new()
            .dimensions(2, 3)
            .design(Design::OneWay(Axis::Cols))
            .entry(0, 0, "2")
            .entry(1, 0, "3")
            .entry(0, 1, "5")
            .entry(1, 1, "6")
            .entry(0, 2, "8")
            .entry(1, 2, "9")
            .build()
            .unwrap()
    }

    #[test]
    fn test_one_way_report() {
        let report = analyze(&one_way_grid()).unwrap();

        let labels: Vec<_> = report.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, ["Between Cols", "Within Groups (Error)", "TOTAL"]);

        let between = &report.rows[0];
        assert!((between.ms - 18.0).abs() < 1e-9);
        assert!((between.f_ratio.unwrap() - 36.0).abs() < 1e-9);
        assert!(between.p_value.unwrap() < ALPHA);
        assert_eq!(between.significant, Some(true));

        let within = &report.rows[1];
        assert!((within.ms - 0.5).abs() < 1e-9);
        assert_eq!(within.f_ratio, None);
        assert_eq!(within.significant, None);

        let total = &report.rows[2];
        assert_eq!(total.df, 5);
        assert_eq!(total.p_value, None);
    }

    #[test]
    fn test_two_way_report_order() {
        let grid = GridBuilder::new()
            .dimensions(2, 2)
            .design(Design::TwoWay)
            .entry(0, 0, "1, 2")
            .entry(0, 1, "3, 4")
            .entry(1, 0, "5, 6")
            .entry(1, 1, "7, 8")
            .build()
            .unwrap();
        let report = analyze(&grid).unwrap();

        let labels: Vec<_> = report.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, ["Rows", "Cols", "Interaction", "Error", "TOTAL"]);

        // Every tested row carries F, p, and a verdict; Error/Total do not.
        for row in &report.rows[..3] {
            assert!(row.f_ratio.is_some());
            assert!(row.p_value.is_some());
            assert!(row.significant.is_some());
        }
        for row in &report.rows[3..] {
            assert!(row.f_ratio.is_none());
            assert!(row.p_value.is_none());
            assert!(row.significant.is_none());
        }

        // Chart covers Factor-A levels.
        assert_eq!(report.chart.len(), 2);
        assert!((report.chart[0].mean - 2.5).abs() < 1e-12);
        assert!((report.chart[1].mean - 6.5).abs() < 1e-12);
        assert!((report.chart[0].max - 6.5).abs() < 1e-12);
    }

    #[test]
    fn test_equal_means_boundary() {
        // Two groups with identical means and spread: F = 0, p = 1.
        let grid = GridBuilder::new()
            .dimensions(2, 2)
            .design(Design::OneWay(Axis::Cols))
            .entry(0, 0, "1")
            .entry(1, 0, "2")
            .entry(0, 1, "1")
            .entry(1, 1, "2")
            .build()
            .unwrap();
        let report = analyze(&grid).unwrap();

        let between = &report.rows[0];
        assert!(between.f_ratio.unwrap().abs() < 1e-12);
        assert!((between.p_value.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(between.significant, Some(false));
    }

    #[test]
    fn test_degenerate_constant_data() {
        let grid = GridBuilder::new()
            .dimensions(2, 2)
            .design(Design::OneWay(Axis::Cols))
            .entry(0, 0, "4")
            .entry(1, 0, "4")
            .entry(0, 1, "4")
            .entry(1, 1, "4")
            .build()
            .unwrap();
        let report = analyze(&grid).unwrap();

        let between = &report.rows[0];
        assert_eq!(between.f_ratio, None);
        assert_eq!(between.p_value, None);
        assert_eq!(between.significant, None);
    }

    #[test]
    fn test_zero_error_variance_is_significant() {
        // Groups differ but replicates agree exactly: F is infinite and
        // the effect is as significant as it gets.
        let grid = GridBuilder::new()
            .dimensions(2, 2)
            .design(Design::OneWay(Axis::Cols))
            .entry(0, 0, "1")
            .entry(1, 0, "1")
            .entry(0, 1, "5")
            .entry(1, 1, "5")
            .build()
            .unwrap();
        let report = analyze(&grid).unwrap();

        let between = &report.rows[0];
        assert!(between.f_ratio.unwrap().is_infinite());
        assert_eq!(between.p_value, Some(0.0));
        assert_eq!(between.significant, Some(true));
    }

    #[test]
    fn test_chart_points_one_way() {
        let report = analyze(&one_way_grid()).unwrap();

        assert_eq!(report.chart.len(), 3);
        let labels: Vec<_> = report.chart.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["G1", "G2", "G3"]);

        let means: Vec<f64> = report.chart.iter().map(|p| p.mean).collect();
        assert!((means[0] - 2.5).abs() < 1e-12);
        assert!((means[1] - 5.5).abs() < 1e-12);
        assert!((means[2] - 8.5).abs() < 1e-12);
        for point in &report.chart {
            assert!((point.max - 8.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_axis_swap_yields_identical_numbers() {
        let transposed = GridBuilder::new()
            .dimensions(3, 2)
            .design(Design::OneWay(Axis::Rows))
            .entry(0, 0, "2")
            .entry(0, 1, "3")
            .entry(1, 0, "5")
            .entry(1, 1, "6")
            .entry(2, 0, "8")
            .entry(2, 1, "9")
            .build()
            .unwrap();

        let original = analyze(&one_way_grid()).unwrap();
        let flipped = analyze(&transposed).unwrap();

        assert_eq!(original.rows.len(), flipped.rows.len());
        for (a, b) in original.rows.iter().zip(&flipped.rows) {
            assert!((a.ss - b.ss).abs() < 1e-12);
            assert_eq!(a.df, b.df);
            assert!((a.ms - b.ms).abs() < 1e-12);
            assert_eq!(a.f_ratio.is_some(), b.f_ratio.is_some());
            if let (Some(fa), Some(fb)) = (a.f_ratio, b.f_ratio) {
                assert!((fa - fb).abs() < 1e-12);
            }
            assert_eq!(a.significant, b.significant);
        }
        for (a, b) in original.chart.iter().zip(&flipped.chart) {
            assert_eq!(a.label, b.label);
            assert!((a.mean - b.mean).abs() < 1e-12);
            assert!((a.max - b.max).abs() < 1e-12);
        }
    }
}

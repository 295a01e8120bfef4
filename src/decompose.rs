//! Sum-of-squares decomposition for one-way and two-way designs.
//!
//! Partitions the total squared deviation about the grand mean into
//! effect and error components:
//!
//! - **One-way**: `SS_total = SS_between + SS_within`, with
//!   `SS_between = Σ nᵢ(ȳᵢ - ȳ)²` over the groups of the chosen axis.
//! - **Two-way** (balanced, `n` replicates per cell):
//!   `SS_total = SS_A + SS_B + SS_AB + SS_error`, with marginal means for
//!   the factor terms and the cell-mean cross term for the interaction.
//!
//! Error components are accumulated directly from within-group (or
//! within-cell) deviations rather than by subtraction; the additivity
//! identity is checked by tests, not assumed by construction.

use crate::error::{Error, Result};
use crate::grid::{Axis, Design, GridDataset};

/// One variance source before F-testing: a sum of squares and its
/// degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition {
    /// Sum of squared deviations attributed to this source.
    pub ss: f64,
    /// Degrees of freedom.
    pub df: usize,
}

/// Full decomposition of total variance for one design.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Labeled effect sources in report order; each gets an F-ratio
    /// against `error`.
    pub tested: Vec<(&'static str, Partition)>,
    /// Label of the error row in the report.
    pub error_label: &'static str,
    /// Unexplained (error) variation.
    pub error: Partition,
    /// Total variation about the grand mean.
    pub total: Partition,
}

/// Decompose the grid's total variance according to its design.
///
/// # Errors
///
/// - [`Error::UnderpoweredDesign`] if the design leaves no degrees of
///   freedom to estimate error variance, or a factor has fewer than two
///   levels.
/// - [`Error::UnbalancedDesign`] if a two-way grid has unequal replicate
///   counts across cells.
pub fn decompose(grid: &GridDataset) -> Result<Decomposition> {
    match grid.design() {
        Design::OneWay(axis) => one_way(grid, axis),
        Design::TwoWay => two_way(grid),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn one_way(grid: &GridDataset, axis: Axis) -> Result<Decomposition> {
    let k = grid.group_count(axis);
    if k < 2 {
        return Err(Error::underpowered(format!(
            "one-way design needs at least 2 groups, got {k}"
        )));
    }

    let n_total = grid.total_count();
    if n_total <= k {
        return Err(Error::underpowered(format!(
            "{n_total} observation(s) in {k} groups leave no degrees of freedom for error"
        )));
    }

    let grand = grid.grand_mean();
    let ss_total: f64 = grid.all_values().map(|v| (v - grand).powi(2)).sum();

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in 0..k {
        let values = grid.group_values(axis, g);
        let group_mean = mean(&values);
        ss_between += values.len() as f64 * (group_mean - grand).powi(2);
        ss_within += values.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }

    let label = match axis {
        Axis::Rows => "Between Rows",
        Axis::Cols => "Between Cols",
    };

    Ok(Decomposition {
        tested: vec![(
            label,
            Partition {
                ss: ss_between,
                df: k - 1,
            },
        )],
        error_label: "Within Groups (Error)",
        error: Partition {
            ss: ss_within,
            df: n_total - k,
        },
        total: Partition {
            ss: ss_total,
            df: n_total - 1,
        },
    })
}

fn two_way(grid: &GridDataset) -> Result<Decomposition> {
    let a = grid.rows();
    let b = grid.cols();
    if a < 2 || b < 2 {
        return Err(Error::underpowered(format!(
            "two-way design needs at least 2 levels per factor, got {a}x{b}"
        )));
    }

    // The classical decomposition requires balance.
    let n = grid.cell_values(0, 0).len();
    for i in 0..a {
        for j in 0..b {
            let found = grid.cell_values(i, j).len();
            if found != n {
                return Err(Error::UnbalancedDesign {
                    row: i,
                    col: j,
                    expected: n,
                    found,
                });
            }
        }
    }
    if n < 2 {
        return Err(Error::underpowered(
            "two-way design needs at least 2 replicates per cell \
             to separate interaction from error",
        ));
    }

    let grand = grid.grand_mean();
    let n_f = n as f64;
    let a_f = a as f64;
    let b_f = b as f64;

    let row_means: Vec<f64> = (0..a).map(|i| grid.group_mean(Axis::Rows, i)).collect();
    let col_means: Vec<f64> = (0..b).map(|j| grid.group_mean(Axis::Cols, j)).collect();

    let ss_total: f64 = grid.all_values().map(|v| (v - grand).powi(2)).sum();
    let ss_a: f64 = b_f * n_f * row_means.iter().map(|m| (m - grand).powi(2)).sum::<f64>();
    let ss_b: f64 = a_f * n_f * col_means.iter().map(|m| (m - grand).powi(2)).sum::<f64>();

    let mut ss_ab = 0.0;
    let mut ss_error = 0.0;
    for i in 0..a {
        for j in 0..b {
            let cell = grid.cell_values(i, j);
            let cell_mean = mean(cell);
            ss_ab += n_f * (cell_mean - row_means[i] - col_means[j] + grand).powi(2);
            ss_error += cell.iter().map(|v| (v - cell_mean).powi(2)).sum::<f64>();
        }
    }

    Ok(Decomposition {
        tested: vec![
            ("Rows", Partition { ss: ss_a, df: a - 1 }),
            ("Cols", Partition { ss: ss_b, df: b - 1 }),
            (
                "Interaction",
                Partition {
                    ss: ss_ab,
                    df: (a - 1) * (b - 1),
                },
            ),
        ],
        error_label: "Error",
        error: Partition {
            ss: ss_error,
            df: a * b * (n - 1),
        },
        total: Partition {
            ss: ss_total,
            df: a * b * n - 1,
        },
    })
}

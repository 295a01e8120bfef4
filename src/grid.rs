//! Validated grid dataset: replicate measurements keyed by row and column.
//!
//! A [`GridDataset`] holds everything one analysis request needs: the
//! declared dimensions, the design to fit, and a `rows × cols` matrix of
//! replicate vectors. Construction goes through [`GridBuilder`], which
//! parses raw textual cell values and rejects any defect up front —
//! there is no partially valid grid.
//!
//! Raw values may carry several comma-separated numerals
//! (`"10.2, 11.5"`); each numeral becomes one replicate of that cell.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Grouping axis for a one-way design.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Each row is one group; columns are pure replication.
    Rows,
    /// Each column is one group; rows are pure replication.
    #[default]
    Cols,
}

impl Axis {
    /// Singular noun for messages and labels.
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            Self::Rows => "row",
            Self::Cols => "column",
        }
    }
}

/// The fixed-effects model to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Design {
    /// Single grouping factor along the given axis; the other dimension
    /// is treated as replication within a group.
    OneWay(Axis),
    /// Rows are Factor A, columns are Factor B; each `(row, col)` cell is
    /// one treatment combination.
    TwoWay,
}

/// Builder for [`GridDataset`].
///
/// Collects declared dimensions, the design, and `(row, col, raw)` cell
/// entries, then validates everything in [`GridBuilder::build`].
///
/// # Examples
///
/// ```
/// use gridanova::{Axis, Design, GridBuilder};
///
/// let grid = GridBuilder::new()
///     .dimensions(2, 3)
///     .design(Design::OneWay(Axis::Cols))
///     .entry(0, 0, "2").entry(1, 0, "3")
///     .entry(0, 1, "5").entry(1, 1, "6")
///     .entry(0, 2, "8").entry(1, 2, "9")
///     .build()
///     .unwrap();
///
/// assert_eq!(grid.total_count(), 6);
/// assert!((grid.grand_mean() - 5.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    rows: usize,
    cols: usize,
    design: Option<Design>,
    entries: Vec<(usize, usize, String)>,
}

impl GridBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the grid dimensions.
    #[must_use]
    pub fn dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Declare the design to fit.
    #[must_use]
    pub fn design(mut self, design: Design) -> Self {
        self.design = Some(design);
        self
    }

    /// Add one cell entry. `raw` may contain several comma-separated
    /// numerals, one per replicate.
    #[must_use]
    pub fn entry(mut self, row: usize, col: usize, raw: impl Into<String>) -> Self {
        self.entries.push((row, col, raw.into()));
        self
    }

    /// Validate and build the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if:
    /// - no design was declared, or no entries were added
    /// - either declared dimension is zero
    /// - an entry lies outside the declared grid
    /// - a raw value is empty or does not parse as a finite real number
    /// - (one-way) any group along the chosen axis has no replicates
    pub fn build(self) -> Result<GridDataset> {
        let design = self
            .design
            .ok_or_else(|| Error::validation("no design specified"))?;

        if self.entries.is_empty() {
            return Err(Error::validation("no data provided"));
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::validation(format!(
                "grid dimensions must be positive, got {}x{}",
                self.rows, self.cols
            )));
        }

        let mut cells: Array2<Vec<f64>> = Array2::from_elem((self.rows, self.cols), Vec::new());
        for (row, col, raw) in &self.entries {
            if *row >= self.rows || *col >= self.cols {
                return Err(Error::validation(format!(
                    "cell ({row}, {col}) is outside the declared {}x{} grid",
                    self.rows, self.cols
                )));
            }
            let values = parse_replicates(*row, *col, raw)?;
            cells[[*row, *col]].extend(values);
        }

        let grid = GridDataset {
            rows: self.rows,
            cols: self.cols,
            design,
            cells,
        };

        if let Design::OneWay(axis) = design {
            for g in 0..grid.group_count(axis) {
                if grid.group_values(axis, g).is_empty() {
                    return Err(Error::validation(format!(
                        "{} {} has no measurements",
                        axis.noun(),
                        g + 1
                    )));
                }
            }
        }

        Ok(grid)
    }
}

/// Parse one raw cell value into its replicates.
fn parse_replicates(row: usize, col: usize, raw: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for piece in raw.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let value: f64 = piece.parse().map_err(|_| {
            Error::validation(format!(
                "cell ({row}, {col}) has a non-numeric value: {piece:?}"
            ))
        })?;
        if !value.is_finite() {
            return Err(Error::validation(format!(
                "cell ({row}, {col}) has a non-finite value: {piece:?}"
            )));
        }
        values.push(value);
    }
    if values.is_empty() {
        return Err(Error::validation(format!("cell ({row}, {col}) is empty")));
    }
    Ok(values)
}

/// Validated in-memory grid for one analysis request.
///
/// Owns a `rows × cols` matrix of replicate vectors plus the design they
/// will be analyzed under. Created fresh per request and discarded after
/// formatting; the type carries no cross-request state.
#[derive(Debug, Clone)]
pub struct GridDataset {
    rows: usize,
    cols: usize,
    design: Design,
    cells: Array2<Vec<f64>>,
}

impl GridDataset {
    /// Number of declared rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of declared columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The design this grid was validated for.
    #[must_use]
    pub fn design(&self) -> Design {
        self.design
    }

    /// Replicates of one `(row, col)` treatment combination.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is outside the declared dimensions.
    #[must_use]
    pub fn cell_values(&self, row: usize, col: usize) -> &[f64] {
        self.cells[[row, col]].as_slice()
    }

    /// Number of groups along the given axis.
    #[must_use]
    pub fn group_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Rows => self.rows,
            Axis::Cols => self.cols,
        }
    }

    /// All replicates of one group along the given axis, concatenated
    /// across the other dimension.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the axis dimension.
    #[must_use]
    pub fn group_values(&self, axis: Axis, index: usize) -> Vec<f64> {
        let lane = match axis {
            Axis::Rows => self.cells.row(index),
            Axis::Cols => self.cells.column(index),
        };
        lane.iter().flat_map(|reps| reps.iter().copied()).collect()
    }

    /// Mean of one group along the given axis.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the axis dimension.
    #[must_use]
    pub fn group_mean(&self, axis: Axis, index: usize) -> f64 {
        let values = self.group_values(axis, index);
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Every observation in the grid, in row-major cell order.
    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flat_map(|reps| reps.iter().copied())
    }

    /// Total number of observations.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// Mean of every observation in the grid.
    #[must_use]
    pub fn grand_mean(&self) -> f64 {
        self.all_values().sum::<f64>() / self.total_count() as f64
    }
}

//! # gridanova
//!
//! One-way and two-way fixed-effects ANOVA over a rectangular grid of
//! replicate measurements.
//!
//! ## Overview
//!
//! A client submits a grid of observations grouped by row and/or column
//! factors; this crate decomposes the total variance into explained and
//! unexplained components and reports, per source, the sum of squares,
//! degrees of freedom, mean square, F-ratio, p-value, and a binary
//! significance verdict at the 0.05 level, plus the group means needed
//! for a mean-comparison chart.
//!
//! The pipeline is:
//!
//! 1. [`GridBuilder`](grid::GridBuilder) — parse and validate the raw
//!    grid (fail fast; no partially valid dataset).
//! 2. [`decompose`](decompose::decompose) — sums of squares and degrees
//!    of freedom for the chosen design.
//! 3. [`stats::f_p_value`] — upper tail of the F-distribution via the
//!    regularized incomplete beta function.
//! 4. [`analyze`](engine::analyze) — assemble the ordered report with
//!    verdicts and chart points.
//! 5. [`wire`] — project the report into the JSON wire shape (or an
//!    `{"error": ...}` document on any failure).
//!
//! Each request is computed synchronously and independently; nothing is
//! cached or shared between requests.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridanova::{analyze, Axis, Design, GridBuilder};
//!
//! // Three column groups with two replicates each.
//! let grid = GridBuilder::new()
//!     .dimensions(2, 3)
//!     .design(Design::OneWay(Axis::Cols))
//!     .entry(0, 0, "2").entry(1, 0, "3")
//!     .entry(0, 1, "5").entry(1, 1, "6")
//!     .entry(0, 2, "8").entry(1, 2, "9")
//!     .build()?;
//!
//! let report = analyze(&grid)?;
//! let between = &report.rows[0];
//! assert!((between.f_ratio.unwrap() - 36.0).abs() < 1e-9);
//! assert_eq!(between.significant, Some(true));
//! # Ok::<(), gridanova::Error>(())
//! ```
//!
//! Or go straight from a request body to a response body:
//!
//! ```rust
//! let body = r#"{
//!     "type": "1way", "axis": "cols",
//!     "data": [
//!         { "row": 0, "col": 0, "value": "2, 3" },
//!         { "row": 0, "col": 1, "value": "5, 6" },
//!         { "row": 0, "col": 2, "value": "8, 9" }
//!     ]
//! }"#;
//!
//! let response = gridanova::process_json(body);
//! assert!(response.contains("\"Rejected\""));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod decompose;
pub mod engine;
pub mod error;
pub mod grid;
pub mod stats;
pub mod wire;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::decompose::{decompose, Decomposition, Partition};
    pub use crate::engine::{analyze, AnovaReport, ChartPoint, SourceRow, ALPHA};
    pub use crate::error::{Error, Result};
    pub use crate::grid::{Axis, Design, GridBuilder, GridDataset};
    pub use crate::stats::{f_p_value, ln_gamma, regularized_incomplete_beta};
    pub use crate::wire::{
        format_report, process, process_json, AnalysisRequest, AnalysisResponse, CellEntry,
        DesignKind, ReportDocument,
    };
}

// Re-export commonly used items at crate root
pub use engine::{analyze, AnovaReport, ChartPoint, SourceRow, ALPHA};
pub use error::{Error, Result};
pub use grid::{Axis, Design, GridBuilder, GridDataset};
pub use wire::{process, process_json, AnalysisRequest, AnalysisResponse};

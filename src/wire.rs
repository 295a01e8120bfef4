//! Wire contract: JSON request parsing and response formatting.
//!
//! Shapes match the step-wizard client that posts to `/calculate`:
//!
//! ```json
//! { "type": "1way", "axis": "cols",
//!   "data": [ { "row": 0, "col": 0, "value": "10.2, 11.5" }, ... ] }
//! ```
//!
//! A successful response carries `results` (the ANOVA table, Total row
//! last) and `chartData` (group means). Any failure — malformed JSON
//! included — becomes a single `{ "error": string }` document whose
//! message the client surfaces verbatim. Transport framing (HTTP status,
//! headers) is the caller's concern.
//!
//! Formatting is pure projection: values are rounded to four decimal
//! places, and p-values below `0.0001` render as the string `"<0.0001"`
//! so significance near zero is never displayed as `0.0`.

use serde::{Deserialize, Serialize};

use crate::engine::{analyze, AnovaReport};
use crate::error::Result;
use crate::grid::{Axis, Design, GridBuilder, GridDataset};

/// Smallest p-value rendered numerically.
const P_DISPLAY_FLOOR: f64 = 1e-4;

/// Which model the client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignKind {
    /// One-way fixed-effects ANOVA.
    #[serde(rename = "1way")]
    OneWay,
    /// Two-way fixed-effects ANOVA.
    #[serde(rename = "2way")]
    TwoWay,
}

/// One submitted grid cell. `value` may hold several comma-separated
/// replicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellEntry {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub col: usize,
    /// Raw textual value(s), e.g. `"10.2, 11.5"`.
    pub value: String,
}

/// Analysis request as posted by the wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Requested design.
    #[serde(rename = "type")]
    pub kind: DesignKind,
    /// Grouping axis for one-way; ignored for two-way. Defaults to
    /// columns, the wizard's default.
    #[serde(default)]
    pub axis: Axis,
    /// Submitted cells.
    pub data: Vec<CellEntry>,
}

impl AnalysisRequest {
    /// Validate the request and build the grid it describes.
    ///
    /// The wire carries no declared dimensions, so they are inferred
    /// from the largest submitted indices.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Validation`] for any grid defect; see
    /// [`GridBuilder::build`].
    pub fn to_grid(&self) -> Result<GridDataset> {
        let rows = self.data.iter().map(|e| e.row + 1).max().unwrap_or(0);
        let cols = self.data.iter().map(|e| e.col + 1).max().unwrap_or(0);
        let design = match self.kind {
            DesignKind::OneWay => Design::OneWay(self.axis),
            DesignKind::TwoWay => Design::TwoWay,
        };

        let mut builder = GridBuilder::new().dimensions(rows, cols).design(design);
        for entry in &self.data {
            builder = builder.entry(entry.row, entry.col, entry.value.as_str());
        }
        builder.build()
    }
}

/// Rendered p-value: numeric at display precision, or a clamp marker
/// for values below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayP {
    /// p rounded to four decimal places.
    Value(f64),
    /// p below the display floor, rendered as `"<0.0001"`.
    Clamped(String),
}

/// One row of the wire ANOVA table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRow {
    /// Variance source label.
    pub source: String,
    /// Sum of squares, rounded.
    pub ss: f64,
    /// Degrees of freedom.
    pub df: usize,
    /// Mean square, rounded.
    pub ms: f64,
    /// F-ratio, rounded; `null` for Error/Total rows.
    pub f: Option<f64>,
    /// p-value; `null` for Error/Total rows.
    pub p: Option<DisplayP>,
    /// `"Rejected"` or `"Failed to Reject"`; `null` where no test ran.
    pub sig05: Option<String>,
}

/// One chart bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePoint {
    /// Group label.
    pub group: String,
    /// Group mean.
    pub mean: f64,
    /// Maximum of all group means, duplicated into every point.
    pub max: f64,
}

/// Successful response document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    /// ANOVA table rows, Total last.
    pub results: Vec<WireRow>,
    /// Mean-comparison chart points.
    #[serde(rename = "chartData")]
    pub chart_data: Vec<WirePoint>,
}

/// Top-level response: either a report or a single error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    /// Computation succeeded.
    Report(ReportDocument),
    /// Terminal failure; the message is surfaced verbatim by the client.
    Error {
        /// Human-readable failure description.
        error: String,
    },
}

fn round4(x: f64) -> f64 {
    (x * 1e4).round() / 1e4
}

fn display_p(p: f64) -> DisplayP {
    if p < P_DISPLAY_FLOOR {
        DisplayP::Clamped("<0.0001".to_string())
    } else {
        DisplayP::Value(round4(p))
    }
}

/// Project a finished report into the wire response shape.
#[must_use]
pub fn format_report(report: &AnovaReport) -> ReportDocument {
    let results = report
        .rows
        .iter()
        .map(|row| WireRow {
            source: row.label.to_string(),
            ss: round4(row.ss),
            df: row.df,
            ms: round4(row.ms),
            f: row.f_ratio.map(round4),
            p: row.p_value.map(display_p),
            sig05: row.significant.map(|s| {
                if s { "Rejected" } else { "Failed to Reject" }.to_string()
            }),
        })
        .collect();

    let chart_data = report
        .chart
        .iter()
        .map(|point| WirePoint {
            group: point.label.clone(),
            mean: point.mean,
            max: point.max,
        })
        .collect();

    ReportDocument {
        results,
        chart_data,
    }
}

/// Run the full pipeline for one parsed request.
#[must_use]
pub fn process(request: &AnalysisRequest) -> AnalysisResponse {
    match request.to_grid().and_then(|grid| analyze(&grid)) {
        Ok(report) => AnalysisResponse::Report(format_report(&report)),
        Err(err) => AnalysisResponse::Error {
            error: err.to_string(),
        },
    }
}

/// JSON-in, JSON-out entry point for one request body.
///
/// Any failure, including a body that does not parse as a request,
/// becomes the `{"error": ...}` document — never a partial result.
#[must_use]
pub fn process_json(body: &str) -> String {
    let response = match serde_json::from_str::<AnalysisRequest>(body) {
        Ok(request) => process(&request),
        Err(err) => AnalysisResponse::Error {
            error: format!("malformed request: {err}"),
        },
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"error":"response serialization failed"}"#.to_string())
}

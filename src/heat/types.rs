//! Data types flowing through the heat pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A row of the location table: geometry text and display label.
///
/// `row` is the 0-based table position and the join key to measurement
/// rows; it is carried on every derived value so a dropped row never shifts
/// the alignment of the ones after it.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRow {
    pub row: usize,
    pub geometry_text: String,
    pub label: String,
}

/// One raw or normalized score, keyed to its location row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowScore {
    pub row: usize,
    pub value: f64,
}

/// A renderable heat sample. All three coordinates are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub site_row: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub intensity: f64,
}

/// Per-site classification derived from the location label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteFlag {
    Flagged,
    Unflagged,
}

/// A classified marker on the without-filter layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteMarker {
    pub site_row: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub intensity: f64,
    pub label: String,
    pub flag: SiteFlag,
}

/// The assembled heat data for one measurement dataset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeatLayer {
    pub points: Vec<HeatPoint>,
    /// Location rows excluded for unparseable geometry or non-finite values.
    pub dropped: usize,
    /// Points emitted with intensity 0 because no score row matched them.
    pub unscored: usize,
    /// True when the measurement table was unreadable and every score was
    /// substituted with 0.
    pub zero_filled: bool,
}

/// Everything one heatmap request produces.
#[derive(Debug, Clone, Serialize)]
pub struct HeatBundle {
    pub with_filter: HeatLayer,
    pub without_filter: HeatLayer,
    pub markers: Vec<SiteMarker>,
    pub report: RunReport,
}

/// Flat per-request record of what the pipeline absorbed, appended to the
/// CSV run log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub site_rows: usize,

    pub with_rows_scored: usize,
    pub with_points: usize,
    pub with_dropped: usize,
    pub with_unscored: usize,
    pub with_zero_filled: bool,
    pub with_zero_fill_reason: Option<String>,

    pub without_rows_scored: usize,
    pub without_points: usize,
    pub without_dropped: usize,
    pub without_unscored: usize,
    pub without_zero_filled: bool,
    pub without_zero_fill_reason: Option<String>,

    pub markers: usize,
    pub flagged_markers: usize,
}

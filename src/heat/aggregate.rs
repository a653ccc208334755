//! Per-row aggregation of survey measurement tables.
//!
//! Survey exports carry dozens of answer columns; only a fixed span of them
//! describes symptoms. The offsets differ between the with-filter and
//! without-filter exports, so the span is configuration handed in by the
//! caller.

use thiserror::Error;

use crate::decode::Table;
use crate::heat::types::RowScore;

/// A contiguous run of measurement columns: `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub start: usize,
    pub len: usize,
}

impl ColumnSpan {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("table is {width} columns wide, span needs columns {start}..{end}")]
pub struct SpanError {
    pub width: usize,
    pub start: usize,
    pub end: usize,
}

/// Sums the span's cells for every data row of a measurement table.
///
/// The first row is the export's header and is skipped; data row `i` gets
/// `RowScore { row: i, .. }`, matching the location table's row keys. A cell
/// that does not parse as a number turns that row's sum into NaN so exactly
/// that row drops out downstream.
///
/// # Errors
///
/// Returns [`SpanError`] when the table is too narrow to contain the span at
/// all. Callers substitute a zero score for every expected row in that case.
pub fn sum_span(table: &Table, span: ColumnSpan) -> Result<Vec<RowScore>, SpanError> {
    if table.width() < span.end() {
        return Err(SpanError {
            width: table.width(),
            start: span.start,
            end: span.end(),
        });
    }

    let scores = table
        .rows()
        .iter()
        .skip(1)
        .enumerate()
        .map(|(row, cells)| {
            let value = (span.start..span.end()).fold(0.0_f64, |sum, col| {
                match cells.get(col).map(String::as_str).unwrap_or("").parse::<f64>() {
                    Ok(v) => sum + v,
                    Err(_) => f64::NAN,
                }
            });
            RowScore { row, value }
        })
        .collect();

    Ok(scores)
}

//! Tabular decoding of uploaded bytes.
//!
//! Uploads arrive as raw bytes with a declared format and are decoded into a
//! plain grid of text cells. No numeric interpretation happens here; the
//! scoring side decides what a cell means.

use std::io::Cursor;

use calamine::{DataType, Reader};
use csv::ReaderBuilder;
use thiserror::Error;

/// Declared format of an uploaded table, inferred from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Csv,
    Excel,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Csv => "csv",
            TableKind::Excel => "excel",
        }
    }

    /// Infers the kind from a filename: `.xlsx`/`.xls` are excel, everything
    /// else is treated as csv.
    pub fn for_name(name: &str) -> TableKind {
        let ext = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("xlsx") | Some("xls") => TableKind::Excel,
            _ => TableKind::Csv,
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("csv decode failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet decode failed: {0}")]
    Excel(#[from] calamine::Error),

    #[error("workbook contains no worksheets")]
    NoWorksheet,
}

/// A decoded table: rows of text cells, possibly ragged.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row in the table. Ragged csv rows make this a maximum, not an
    /// every-row guarantee.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Decodes uploaded bytes into a [`Table`] according to the declared kind.
///
/// Every line of a csv is a row (no header handling here) and ragged rows
/// are allowed. For excel the first worksheet is read and each cell is
/// stringified, empty cells becoming empty strings.
pub fn decode_table(bytes: &[u8], kind: TableKind) -> Result<Table, DecodeError> {
    match kind {
        TableKind::Csv => decode_csv(bytes),
        TableKind::Excel => decode_excel(bytes),
    }
}

fn decode_csv(bytes: &[u8]) -> Result<Table, DecodeError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }

    Ok(Table { rows })
}

fn decode_excel(bytes: &[u8]) -> Result<Table, DecodeError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DecodeError::NoWorksheet)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or(DecodeError::NoWorksheet)??;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(Table { rows })
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        _ => cell.to_string().trim().to_string(),
    }
}

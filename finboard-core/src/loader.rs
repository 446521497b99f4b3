//! Spreadsheet ingestion for statement tables.
//!
//! The format is sniffed from the bytes: zip and OLE2 containers go through
//! calamine (first worksheet), UTF-8 text is read as CSV. The first row is the
//! header; every `Metric` column plus `UserID` must be present. Workbook error
//! cells (`#DIV/0!`, `#N/A`, ...) load as missing values.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use thiserror::Error;

use crate::record::{FinancialRecord, FinancialTable, Metric, USER_ID_COLUMN};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Errors from parsing an uploaded statement file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized spreadsheet format (expected xlsx, xls, ods or csv)")]
    UnrecognizedFormat,

    #[error("workbook could not be read: {0}")]
    Workbook(String),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("csv could not be read: {0}")]
    Csv(#[from] csv::Error),

    #[error("file has no header row")]
    MissingHeader,

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: missing UserID")]
    MissingUserId { row: usize },

    #[error("row {row}, column '{column}': expected a number, found '{value}'")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
}

/// Spreadsheet container detected from leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

/// Sniff the container format of an uploaded file.
pub fn detect_format(bytes: &[u8]) -> Result<SourceFormat, ParseError> {
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        Ok(SourceFormat::Workbook)
    } else if std::str::from_utf8(bytes).is_ok() {
        Ok(SourceFormat::Csv)
    } else {
        Err(ParseError::UnrecognizedFormat)
    }
}

/// Parse a statement file into a `FinancialTable`.
pub fn load_table(bytes: &[u8]) -> Result<FinancialTable, ParseError> {
    let format = detect_format(bytes)?;
    let sheet = match format {
        SourceFormat::Workbook => workbook_sheet(bytes)?,
        SourceFormat::Csv => csv_sheet(bytes)?,
    };
    let table = build_table(sheet)?;

    tracing::debug!(?format, rows = table.len(), "parsed statement table");
    let dupes = table.duplicate_ids();
    if !dupes.is_empty() {
        tracing::warn!(ids = ?dupes, "statement table contains duplicate UserID values");
    }
    Ok(table)
}

/// A cell normalized across formats.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// Raw rows plus the 1-based source row number of the first one.
struct Sheet {
    rows: Vec<Vec<Cell>>,
    first_row: usize,
}

fn workbook_sheet(bytes: &[u8]) -> Result<Sheet, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ParseError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::NoWorksheet)?
        .map_err(|e| ParseError::Workbook(e.to_string()))?;

    // The range begins at the first used cell, not at A1.
    let first_row = range.start().map_or(1, |(row, _)| row as usize + 1);
    let rows = range
        .rows()
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();
    Ok(Sheet { rows, first_row })
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Error(e) => {
            tracing::debug!(error = %e, "workbook error cell read as missing");
            Cell::Empty
        }
        other => Cell::Text(other.to_string()),
    }
}

fn csv_sheet(bytes: &[u8]) -> Result<Sheet, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(Sheet { rows, first_row: 1 })
}

/// Column positions of the required fields.
struct ColumnMap {
    user_id: usize,
    metrics: [usize; Metric::COUNT],
}

impl ColumnMap {
    fn from_header(header: &[Cell]) -> Result<Self, ParseError> {
        let positions: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell.render().trim().to_string(), i))
            .rev()
            .collect();

        let mut missing = Vec::new();
        let user_id = positions.get(USER_ID_COLUMN).copied();
        if user_id.is_none() {
            missing.push(USER_ID_COLUMN.to_string());
        }
        let mut metrics = [0usize; Metric::COUNT];
        for (slot, metric) in metrics.iter_mut().zip(Metric::ALL) {
            match positions.get(metric.column_name()) {
                Some(&i) => *slot = i,
                None => missing.push(metric.column_name().to_string()),
            }
        }

        match user_id {
            Some(user_id) if missing.is_empty() => Ok(Self { user_id, metrics }),
            _ => Err(ParseError::MissingColumns(missing)),
        }
    }
}

fn build_table(sheet: Sheet) -> Result<FinancialTable, ParseError> {
    let mut rows = sheet.rows.into_iter();
    let header = rows.next().ok_or(ParseError::MissingHeader)?;
    let columns = ColumnMap::from_header(&header)?;

    let mut records = Vec::new();
    // Row numbers are 1-based source rows; data starts below the header.
    for (offset, row) in rows.enumerate() {
        let row_number = sheet.first_row + offset + 1;
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        let cell = |i: usize| row.get(i).unwrap_or(&Cell::Empty);

        let user_id = parse_user_id(cell(columns.user_id))
            .ok_or(ParseError::MissingUserId { row: row_number })?;

        let mut values = [f64::NAN; Metric::COUNT];
        for ((value, &index), metric) in values.iter_mut().zip(&columns.metrics).zip(Metric::ALL) {
            *value = parse_number(cell(index)).ok_or_else(|| ParseError::InvalidCell {
                row: row_number,
                column: metric.column_name().to_string(),
                value: cell(index).render(),
            })?;
        }
        records.push(FinancialRecord::from_values(user_id, values));
    }

    Ok(FinancialTable::new(records))
}

fn parse_user_id(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Number(v) => Some(integral_id(*v).unwrap_or_else(|| v.to_string())),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            // "1001.0" names the same user as the numeric cell 1001.
            let integral = s
                .contains('.')
                .then(|| s.parse::<f64>().ok())
                .flatten()
                .and_then(integral_id);
            Some(integral.unwrap_or_else(|| s.to_string()))
        }
    }
}

fn integral_id(v: f64) -> Option<String> {
    (v.fract() == 0.0 && v.abs() < 1e15).then(|| format!("{}", v as i64))
}

/// `Some(NaN)` for blank cells, `None` when the cell is not numeric.
fn parse_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => Some(f64::NAN),
        Cell::Number(v) => Some(*v),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(f64::NAN)
            } else {
                s.parse::<f64>().ok()
            }
        }
    }
}

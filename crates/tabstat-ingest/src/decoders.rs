//! Built-in table decoders

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tabstat_core::{Cell, Column, Error, Result, Table};

use crate::{FileFormat, TableDecoder};

/// Field sentinels treated as missing, lowercase
const NULL_SENTINELS: &[&str] = &["", "na", "n/a", "nan", "null"];

/// Parse one text field into a cell: numbers become numeric cells, missing
/// sentinels become nulls, everything else stays text.
fn parse_field(field: &str) -> Cell {
    let trimmed = field.trim();
    if NULL_SENTINELS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        return Cell::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => Cell::Number(v),
        Err(_) => Cell::Text(trimmed.to_string()),
    }
}

/// CSV decoder: header row becomes column names
#[derive(Debug, Default, Clone)]
pub struct CsvDecoder;

impl TableDecoder for CsvDecoder {
    fn formats(&self) -> &[FileFormat] {
        &[FileFormat::Csv]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::Computation(format!("failed to read CSV header: {e}")))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record =
                record.map_err(|e| Error::Computation(format!("failed to read CSV row: {e}")))?;
            for (i, field) in record.iter().enumerate() {
                cells[i].push(parse_field(field));
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Table::new(columns)
    }
}

/// Excel decoder for `.xlsx` and `.xls` workbooks; reads the first sheet
#[derive(Debug, Default, Clone)]
pub struct ExcelDecoder;

fn header_name(cell: Option<&Data>, index: usize) -> String {
    match cell {
        Some(Data::Empty) | None => format!("column_{index}"),
        Some(data) => data.to_string().trim().to_string(),
    }
}

fn excel_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::String(s) => parse_field(s),
        other => Cell::Text(other.to_string()),
    }
}

impl TableDecoder for ExcelDecoder {
    fn formats(&self) -> &[FileFormat] {
        &[FileFormat::Xlsx, FileFormat::Xls]
    }

    fn decode(&self, bytes: &[u8]) -> Result<Table> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::Computation(format!("failed to open workbook: {e}")))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::computation("workbook has no sheets"))?
            .map_err(|e| Error::Computation(format!("failed to read worksheet: {e}")))?;

        let mut rows = range.rows();
        let header_row = rows.next();
        let width = header_row.map_or(0, <[Data]>::len);
        let headers: Vec<String> = (0..width)
            .map(|i| header_name(header_row.and_then(|r| r.get(i)), i))
            .collect();

        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); width];
        for row in rows {
            for i in 0..width {
                cells[i].push(row.get(i).map_or(Cell::Null, excel_cell));
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();
        Table::new(columns)
    }
}

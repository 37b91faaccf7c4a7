//! Tabular sources – reads product rows into a validated [`RecordSet`].
//!
//! The format is chosen from the file extension:
//! - spreadsheets (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) via calamine, first
//!   worksheet, first row as header
//! - `csv` via the csv crate, header row required; `true`/`false` cells are
//!   read as booleans, everything else as text
//! - `json`: an array of flat objects

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{CatalogError, Result};
use crate::record::{Record, RecordSet, Value, REQUIRED_FIELDS};

/// Load the records stored at `path`.
pub fn load_records(path: impl AsRef<Path>) -> Result<RecordSet> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    log::info!("Reading product data: {}", path.display());
    let (columns, records) = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path)?,
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        other => {
            return Err(source_error(
                path,
                format!("unsupported file type '{other}' (expected xlsx, xls, ods, csv or json)"),
            ))
        }
    };

    let set = RecordSet::new(columns, records)?;
    log::info!("Successfully read {} products", set.len());
    Ok(set)
}

fn source_error(path: &Path, message: impl Into<String>) -> CatalogError {
    CatalogError::Source {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn read_spreadsheet(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| source_error(path, format!("cannot open workbook: {e}")))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| source_error(path, "workbook has no worksheets"))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| source_error(path, format!("cannot read sheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => Vec::new(),
    };

    let records = rows
        .filter(|row| !row.iter().all(|c| matches!(c, Data::Empty)))
        .map(|row| {
            let mut record = Record::new();
            for (i, column) in columns.iter().enumerate() {
                if column.is_empty() {
                    continue;
                }
                record.insert(column.as_str(), row.get(i).map(cell_value).unwrap_or_default());
            }
            record
        })
        .collect();

    Ok((columns.into_iter().filter(|c| !c.is_empty()).collect(), records))
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) if s.trim().is_empty() => Value::Empty,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Bool(*b),
        Data::Error(e) => {
            log::warn!("Spreadsheet cell error {e:?}; treating as empty");
            Value::Empty
        }
        other => Value::Text(other.to_string()),
    }
}

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| source_error(path, e.to_string()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| source_error(path, format!("cannot read header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| source_error(path, format!("failed to read CSV record: {e}")))?;
        let mut record = Record::new();
        for (column, field) in columns.iter().zip(row.iter()) {
            record.insert(column.as_str(), csv_value(field));
        }
        records.push(record);
    }
    Ok((columns, records))
}

fn csv_value(field: &str) -> Value {
    if field.is_empty() {
        Value::Empty
    } else if field.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if field.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else {
        Value::Text(field.to_string())
    }
}

fn read_json(path: &Path) -> Result<(Vec<String>, Vec<Record>)> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .map_err(|e| source_error(path, format!("expected an array of flat objects: {e}")))?;

    // An empty array is a valid, empty catalog.
    if records.is_empty() {
        let columns = REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect();
        return Ok((columns, records));
    }

    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for (field, _) in record.fields() {
            if !columns.iter().any(|c| c == field) {
                columns.push(field.to_string());
            }
        }
    }
    Ok((columns, records))
}

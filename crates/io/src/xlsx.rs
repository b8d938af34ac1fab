// Excel import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: cells are flattened to canonical strings so the engine sees one
// textual representation whether the data arrived as CSV or as a workbook.
// Export: a single plain sheet of the cleaned rows. No index column.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook as XlsxWorkbook;

use resift_recon::Dataset;

/// Import one worksheet as a dataset. `sheet` selects by name (the report
/// export ships its data on a sheet called `Data`); `None` takes the first
/// sheet. First row is the header.
///
/// `timestamp_format` renders date-typed cells back into the textual form
/// the engine parses, so a workbook that stores `Created On` as real Excel
/// datetimes reconciles the same as one that stores it as text.
pub fn import(
    path: &Path,
    name: &str,
    sheet: Option<&str>,
    timestamp_format: &str,
) -> Result<Dataset, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("cannot open {}: {e}", path.display()))?;

    let sheet_name = match sheet {
        Some(s) => s.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| format!("{} has no sheets", path.display()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("cannot read sheet '{sheet_name}': {e}"))?;

    let mut rows_iter = range.rows();
    let columns: Vec<String> = match rows_iter.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell_to_string(cell, timestamp_format).trim().to_string())
            .collect(),
        None => {
            return Ok(Dataset::new(name, Vec::new(), Vec::new()));
        }
    };

    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| {
            let mut cells: Vec<String> = row
                .iter()
                .map(|cell| cell_to_string(cell, timestamp_format))
                .collect();
            while cells.len() < columns.len() {
                cells.push(String::new());
            }
            cells
        })
        .collect();

    Ok(Dataset::new(name, columns, rows))
}

/// Flatten a calamine cell to its canonical string form.
fn cell_to_string(cell: &Data, timestamp_format: &str) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals, so a ParentID stored as 4711.0
            // compares equal to "4711" from a CSV
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => format!("{n}"),
        Data::Bool(b) => format!("{b}"),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => naive.format(timestamp_format).to_string(),
            // Out-of-range serial; surface the raw number rather than blank
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Export a dataset to XLSX: one sheet, header row, then data rows.
pub fn export(dataset: &Dataset, path: &Path, sheet_name: &str) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| format!("cannot create sheet '{sheet_name}': {e}"))?;

    for (col, header) in dataset.columns.iter().enumerate() {
        worksheet
            .write(0, col as u16, header)
            .map_err(|e| format!("cannot write header: {e}"))?;
    }
    for (r, row) in dataset.rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write(r as u32 + 1, col as u16, value)
                .map_err(|e| format!("cannot write row {}: {e}", r + 1))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| format!("cannot save {}: {e}", path.display()))?;
    Ok(())
}

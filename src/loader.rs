use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::schema::{self, HEADER_ROW_INDEX};
use crate::table::{Cell, Row, Table};

/// Loads the first worksheet of an export into a [`Table`]: the two banner
/// rows are skipped, the third row supplies the column names, and the schema
/// is validated before any data row is converted.
pub fn load_table(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("workbook {} contains no sheets", path.display()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| anyhow::anyhow!("failed loading sheet '{}': {}", sheet, e))?;

    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    if start_row > HEADER_ROW_INDEX {
        bail!(
            "unrecognized file format: no header row at sheet row {}",
            HEADER_ROW_INDEX + 1
        );
    }

    let mut columns = Vec::new();
    let mut rows = Vec::new();
    for (offset, sheet_row) in range.rows().enumerate() {
        let absolute = start_row + offset;
        if absolute < HEADER_ROW_INDEX {
            continue;
        }
        if absolute == HEADER_ROW_INDEX {
            columns = sheet_row
                .iter()
                .map(|cell| convert_cell(cell).as_trimmed_str())
                .collect();
            schema::validate_columns(&columns)?;
            continue;
        }
        rows.push(Row::new(sheet_row.iter().map(convert_cell).collect()));
    }

    if columns.is_empty() {
        bail!(
            "unrecognized file format: {} has no header row",
            path.display()
        );
    }
    Ok(Table::new(columns, rows))
}

fn convert_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Cell::DateTime(datetime),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(err) => Cell::Text(format!("#ERROR:{:?}", err)),
    }
}

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use crate::schema::DATE_COLUMNS;
use crate::table::{Cell, Highlight, Table};

/// Light blue marking the last original row before a sub-item block.
const MARKER_COLOR: Color = Color::RGB(0xADD8E6);
/// Light yellow marking completed continuation rows.
const FILLED_COLOR: Color = Color::RGB(0xFFFF99);

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// How many name candidates to try before giving up on the output directory.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Picks a non-colliding sibling of the input named `<stem>_procesado.xlsx`,
/// appending ` (1)`, ` (2)`, … while the candidate already exists. Existing
/// results are never overwritten.
pub fn resolve_output_path(input: &Path) -> Result<PathBuf> {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("input path {} has no file name", input.display()))?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = dir.join(candidate_name(stem, attempt));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    bail!(
        "no free output name for {} after {} attempts",
        input.display(),
        MAX_NAME_ATTEMPTS
    )
}

fn candidate_name(stem: &str, attempt: usize) -> String {
    if attempt == 0 {
        format!("{}_procesado.xlsx", stem)
    } else {
        format!("{}_procesado ({}).xlsx", stem, attempt)
    }
}

/// Serializes the filtered table: header row from the schema, then one row
/// per surviving data row. Column A gets the highlight fill, and date cells
/// in the three named date columns are displayed as `yyyy-mm-dd`.
pub fn write_workbook(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let marker_fill = Format::new().set_background_color(MARKER_COLOR);
    let filled_fill = Format::new().set_background_color(FILLED_COLOR);
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    let is_date_column: Vec<bool> = table
        .columns
        .iter()
        .map(|name| DATE_COLUMNS.contains(&name.as_str()))
        .collect();

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let out_row = (r + 1) as u32;
        let highlight = match row.highlight {
            Highlight::Marker => Some(&marker_fill),
            Highlight::Filled => Some(&filled_fill),
            Highlight::None => None,
        };
        for (c, cell) in row.cells.iter().enumerate() {
            let fill = if c == 0 { highlight } else { None };
            let date = if is_date_column.get(c).copied().unwrap_or(false) {
                &date_format
            } else {
                &datetime_format
            };
            write_cell(worksheet, out_row, c as u16, cell, fill, date)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    fill: Option<&Format>,
    date_format: &Format,
) -> Result<()> {
    match (cell, fill) {
        (Cell::Empty, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (Cell::Empty, None) => {}
        (Cell::Text(s), Some(format)) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        (Cell::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (Cell::Number(n), Some(format)) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        (Cell::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
        (Cell::Bool(b), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        (Cell::Bool(b), None) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        (Cell::DateTime(dt), Some(format)) => {
            worksheet.write_datetime_with_format(row, col, dt, format)?;
        }
        (Cell::DateTime(dt), None) => {
            worksheet.write_datetime_with_format(row, col, dt, date_format)?;
        }
    }
    Ok(())
}
